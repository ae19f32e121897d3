use crate::color;
use crate::ids::Id;

pub type SceneIndex = usize;

/// A named, colored row of the clip grid, triggered as a unit in Live.
pub struct Scene {
  id: Id,
  name: String,
  color_index: usize,
}

impl Scene {
  pub fn new<T>(id: Id, name: T, color_index: usize) -> Scene
  where
    T: Into<String>,
  {
    Scene {
      id,
      name: name.into(),
      color_index,
    }
  }

  pub fn get_id(&self) -> Id {
    self.id
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_color_index(&self) -> usize {
    self.color_index
  }

  /// Snaps an arbitrary color to the built-in palette.
  pub fn set_color<T>(&mut self, hex: T)
  where
    T: AsRef<str>,
  {
    self.color_index = color::nearest_palette_index(hex.as_ref());
  }
}
