use crate::ids::Id;

pub type TrackIndex = usize;

/// A named column of the clip grid, one audio channel in the exported set.
pub struct Track {
  id: Id,
  name: String,
}

impl Track {
  pub fn new<T>(id: Id, name: T) -> Track
  where
    T: Into<String>,
  {
    Track {
      id,
      name: name.into(),
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
}
