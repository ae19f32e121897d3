pub mod clip;
pub mod scene;
pub mod tempo;
pub mod track;

use failure::Fail;

use log::debug;

use crate::color;
use crate::config::Config;
use crate::ids::{Id, IdAllocator};

use self::{
  clip::{Clip, ClipData},
  scene::{Scene, SceneIndex},
  tempo::Tempo,
  track::{Track, TrackIndex},
};

#[derive(Debug, Fail, PartialEq)]
pub enum ProjectError {
  #[fail(display = "Clip slot out of bounds: scene {}, track {}", scene, track)]
  ClipSlotOutOfBounds { scene: SceneIndex, track: TrackIndex },

  #[fail(display = "Scene out of bounds: {}", scene)]
  SceneOutOfBounds { scene: SceneIndex },
}

/// The in-memory project being staged: tempo, tracks, scenes and a
/// scene-by-track grid of clips. One project owns one id allocator, so two
/// projects never share ids and a fixed sequence of edits is reproducible.
pub struct Project {
  tempo: Tempo,
  tracks: Vec<Track>,
  scenes: Vec<Scene>,
  grid: Vec<Vec<Option<Clip>>>,
  selected_scene: Option<SceneIndex>,
  default_scene_color_index: usize,
  ids: IdAllocator,
}

impl Project {
  pub fn new(config: &Config) -> Project {
    let mut project = Project {
      tempo: Tempo::new(config.project.tempo),
      tracks: Vec::new(),
      scenes: Vec::new(),
      grid: Vec::new(),
      selected_scene: None,
      default_scene_color_index: config.project.scene_color_index,
      ids: IdAllocator::new(),
    };
    for number in 0..config.project.tracks {
      project.add_track(format!("Track {}", number + 1));
    }
    project
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn set_tempo(&mut self, tempo: Tempo) {
    self.tempo = tempo;
  }

  pub fn get_tracks(&self) -> &[Track] {
    &self.tracks
  }

  pub fn get_scenes(&self) -> &[Scene] {
    &self.scenes
  }

  pub(crate) fn get_grid(&self) -> &[Vec<Option<Clip>>] {
    &self.grid
  }

  /// Appends a track and extends every existing grid row with an empty cell,
  /// so rows always span all tracks.
  pub fn add_track<T>(&mut self, name: T) -> TrackIndex
  where
    T: Into<String>,
  {
    let id = self.ids.allocate();
    self.tracks.push(Track::new(id, name));
    for row in self.grid.iter_mut() {
      row.push(None);
    }
    self.tracks.len() - 1
  }

  pub fn track_mut(&mut self, index: TrackIndex) -> Option<&mut Track> {
    self.tracks.get_mut(index)
  }

  /// Appends a scene colored with the nearest palette entry for `color_hex`,
  /// together with an empty grid row, and selects it.
  pub fn add_scene<T>(&mut self, name: T, color_hex: &str) -> SceneIndex
  where
    T: Into<String>,
  {
    let id = self.ids.allocate();
    let color_index = color::nearest_palette_index(color_hex);
    self.scenes.push(Scene::new(id, name, color_index));
    self.grid.push((0..self.tracks.len()).map(|_| None).collect());
    let index = self.scenes.len() - 1;
    self.selected_scene = Some(index);
    debug!("Added scene {} with color index {}", index, color_index);
    index
  }

  /// Appends an auto-named scene with the configured default color.
  pub fn add_default_scene(&mut self) -> SceneIndex {
    let id = self.ids.allocate();
    let name = format!("Scene {}", self.scenes.len() + 1);
    let color_index = self.default_scene_color_index;
    self.scenes.push(Scene::new(id, name, color_index));
    self.grid.push((0..self.tracks.len()).map(|_| None).collect());
    let index = self.scenes.len() - 1;
    self.selected_scene = Some(index);
    index
  }

  pub fn scene_mut(&mut self, index: SceneIndex) -> Option<&mut Scene> {
    self.scenes.get_mut(index)
  }

  pub fn get_selected_scene(&self) -> Option<SceneIndex> {
    self.selected_scene
  }

  pub fn select_scene(&mut self, index: Option<SceneIndex>) -> Result<(), ProjectError> {
    if let Some(scene) = index {
      if scene >= self.scenes.len() {
        return Err(ProjectError::SceneOutOfBounds { scene });
      }
    }
    self.selected_scene = index;
    Ok(())
  }

  /// Places a clip into a grid cell, replacing any clip already there.
  /// Out-of-bounds placement fails and leaves the grid untouched.
  pub fn set_clip(
    &mut self,
    scene: SceneIndex,
    track: TrackIndex,
    data: ClipData,
  ) -> Result<Id, ProjectError> {
    if scene >= self.scenes.len() || track >= self.tracks.len() {
      return Err(ProjectError::ClipSlotOutOfBounds { scene, track });
    }
    let id = self.ids.allocate();
    debug!("Placing clip '{}' at scene {}, track {}", data.name, scene, track);
    self.grid[scene][track] = Some(Clip::new(id, data));
    Ok(id)
  }

  pub fn clear_clip(
    &mut self,
    scene: SceneIndex,
    track: TrackIndex,
  ) -> Result<Option<Clip>, ProjectError> {
    if scene >= self.scenes.len() || track >= self.tracks.len() {
      return Err(ProjectError::ClipSlotOutOfBounds { scene, track });
    }
    Ok(self.grid[scene][track].take())
  }

  pub fn clip(&self, scene: SceneIndex, track: TrackIndex) -> Option<&Clip> {
    self.grid.get(scene).and_then(|row| row.get(track)).and_then(|cell| cell.as_ref())
  }

  pub fn clip_mut(&mut self, scene: SceneIndex, track: TrackIndex) -> Option<&mut Clip> {
    self.grid.get_mut(scene).and_then(|row| row.get_mut(track)).and_then(|cell| cell.as_mut())
  }

  pub fn num_clips(&self) -> usize {
    self.grid.iter().flatten().filter(|cell| cell.is_some()).count()
  }

  pub(crate) fn allocate_id(&mut self) -> Id {
    self.ids.allocate()
  }

  pub(crate) fn next_id(&self) -> Id {
    self.ids.peek()
  }
}
