/// Generational handle: `(index, generation)`.
///
/// A slot index may be reused after its occupant is removed; the generation
/// distinguishes the new occupant from stale handles to the old one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}
