pub type Id = u32;

pub const FIRST_ID: Id = 20_000;

/// Issues unique element ids for one project session. Every id written into
/// a live set document comes from a single allocator instance, so a fixed
/// sequence of calls always yields the same ids.
#[derive(Debug)]
pub struct IdAllocator {
  next: Id,
}

impl IdAllocator {
  pub fn new() -> IdAllocator {
    IdAllocator { next: FIRST_ID }
  }

  pub fn allocate(&mut self) -> Id {
    let id = self.next;
    self.next += 1;
    id
  }

  /// The id the next `allocate` call would return.
  pub fn peek(&self) -> Id {
    self.next
  }
}

impl Default for IdAllocator {
  fn default() -> IdAllocator {
    IdAllocator::new()
  }
}
