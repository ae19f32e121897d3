//! Staging of Ableton Live projects: an in-memory model of tracks, scenes
//! and a grid of audio clips, serialized into a Live Set document and
//! packaged with its samples into a project archive.

pub mod color;
pub mod config;
pub mod export;
pub mod ids;
pub mod project;
