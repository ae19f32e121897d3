use std::rc::Rc;

use crate::ids::Id;

pub type Seconds = f64;
pub type Beats = f64;

/// Audio bytes are supplied by the caller and shared with the packager.
pub type AudioSource = Rc<Vec<u8>>;

/// Live's time-stretching algorithm tags, by wire value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarpMode {
  Beats,
  Tones,
  Texture,
  Repitch,
  Complex,
  ComplexPro,
}

impl WarpMode {
  pub fn from_value(value: u8) -> Option<WarpMode> {
    match value {
      0 => Some(WarpMode::Beats),
      1 => Some(WarpMode::Tones),
      2 => Some(WarpMode::Texture),
      3 => Some(WarpMode::Repitch),
      4 => Some(WarpMode::Complex),
      6 => Some(WarpMode::ComplexPro),
      _ => None,
    }
  }

  pub fn get_value(self) -> u8 {
    match self {
      WarpMode::Beats => 0,
      WarpMode::Tones => 1,
      WarpMode::Texture => 2,
      WarpMode::Repitch => 3,
      WarpMode::Complex => 4,
      WarpMode::ComplexPro => 6,
    }
  }
}

/// Caller-supplied data for placing a clip into a grid cell.
pub struct ClipData {
  pub name: String,
  pub audio: AudioSource,
  pub bpm: f64,
  pub loop_enabled: bool,
  pub warp_mode: WarpMode,
  pub duration: Seconds,
}

pub struct Clip {
  id: Id,
  name: String,
  audio: AudioSource,
  bpm: f64,
  loop_enabled: bool,
  warp_mode: WarpMode,
  duration: Seconds,
  length_in_beats: Beats,
}

impl Clip {
  pub(crate) fn new(id: Id, data: ClipData) -> Clip {
    let length_in_beats = beats_for(data.duration, data.bpm);
    Clip {
      id,
      name: data.name,
      audio: data.audio,
      bpm: data.bpm,
      loop_enabled: data.loop_enabled,
      warp_mode: data.warp_mode,
      duration: data.duration,
      length_in_beats,
    }
  }

  pub fn get_id(&self) -> Id {
    self.id
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_audio(&self) -> &AudioSource {
    &self.audio
  }

  pub fn get_bpm(&self) -> f64 {
    self.bpm
  }

  /// Changing the BPM recomputes the clip length so both stay consistent.
  pub fn set_bpm(&mut self, bpm: f64) {
    self.bpm = bpm;
    self.length_in_beats = beats_for(self.duration, bpm);
  }

  pub fn is_loop_enabled(&self) -> bool {
    self.loop_enabled
  }

  pub fn set_loop_enabled(&mut self, enabled: bool) {
    self.loop_enabled = enabled;
  }

  pub fn get_warp_mode(&self) -> WarpMode {
    self.warp_mode
  }

  pub fn set_warp_mode(&mut self, warp_mode: WarpMode) {
    self.warp_mode = warp_mode;
  }

  pub fn get_duration(&self) -> Seconds {
    self.duration
  }

  pub fn get_length_in_beats(&self) -> Beats {
    self.length_in_beats
  }
}

/// Clip length in beats, kept at two-decimal precision.
fn beats_for(duration: Seconds, bpm: f64) -> Beats {
  (duration * (bpm / 60.0) * 100.0).round() / 100.0
}
