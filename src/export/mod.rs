pub mod archive;
pub mod xml;

use std::time::{SystemTime, UNIX_EPOCH};

use failure::{Error, Fail};

use log::{debug, info};

use rand::Rng;

use crate::project::clip::AudioSource;
use crate::project::Project;

pub const PROJECT_INFO_DIR: &str = "Ableton Project Info";
pub const SAMPLES_DIR: &str = "Samples/Imported";
pub const PROJECT_FILE_EXTENSION: &str = "als";

#[derive(Debug, Fail, PartialEq)]
pub enum ExportError {
  #[fail(display = "Project has no clips to export")]
  EmptyProject,

  #[fail(display = "Grid has {} rows but the project has {} scenes", rows, scenes)]
  GridRowsMismatch { rows: usize, scenes: usize },

  #[fail(
    display = "Grid row {} has {} cells but the project has {} tracks",
    row, cells, tracks
  )]
  GridColumnsMismatch {
    row: usize,
    cells: usize,
    tracks: usize,
  },

  #[fail(display = "No audio data for clip '{}'", name)]
  MissingAudio { name: String },
}

/// Default per-export folder name, unique per invocation.
pub fn timestamped_name() -> String {
  let millis = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_millis())
    .unwrap_or(0);
  format!("Project-{}", millis)
}

/// Exports the project under a timestamped folder name.
pub fn export_project(project: &mut Project) -> Result<Vec<u8>, Error> {
  export_project_named(project, &timestamped_name())
}

/// Builds the live set document for the project and packages it, together
/// with every distinct audio asset the grid references, into a single
/// in-memory archive. Triggering a download or writing to disk is up to the
/// caller.
pub fn export_project_named(project: &mut Project, name: &str) -> Result<Vec<u8>, Error> {
  if project.num_clips() == 0 {
    return Err(ExportError::EmptyProject.into());
  }

  let assets = collect_assets(project)?;
  debug!("Collected {} distinct audio assets", assets.len());

  let overwrite_protection = rand::thread_rng().gen_range(1..=4000);
  let document = xml::live_set_xml(project, overwrite_protection)?;
  debug!("Live set document: {} bytes", document.len());

  let bytes = archive::package(name, &document, &assets)?;
  info!(
    "Exported project '{}': {} clips, {} assets, {} bytes",
    name,
    project.num_clips(),
    assets.len(),
    bytes.len()
  );
  Ok(bytes)
}

/// Walks the grid in row-major order and collects one audio source per
/// distinct clip name, first occurrence wins. A clip with no audio bytes
/// would leave the exported set referencing a sample that is not packaged,
/// so it fails the whole export.
fn collect_assets(project: &Project) -> Result<Vec<(String, AudioSource)>, ExportError> {
  let mut assets: Vec<(String, AudioSource)> = Vec::new();
  for scene_index in 0..project.get_scenes().len() {
    for track_index in 0..project.get_tracks().len() {
      if let Some(clip) = project.clip(scene_index, track_index) {
        if clip.get_audio().is_empty() {
          return Err(ExportError::MissingAudio {
            name: clip.get_name().to_string(),
          });
        }
        if !assets.iter().any(|(name, _)| name == clip.get_name()) {
          assets.push((clip.get_name().to_string(), clip.get_audio().clone()));
        }
      }
    }
  }
  Ok(assets)
}
