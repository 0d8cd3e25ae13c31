use std::collections::TryReserveError;

/// Physical frame table - records which page occupies each frame
#[derive(Debug, Clone)]
pub struct FrameTable {
    /// One slot per frame, `None` when empty
    slots: Vec<Option<u64>>,
}

impl FrameTable {
    /// Create a frame table with every frame empty.
    ///
    /// Fails instead of aborting when the slots cannot be allocated.
    pub fn new(num_frames: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(num_frames)?;
        slots.resize(num_frames, None);
        Ok(FrameTable { slots })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// First empty frame, lowest index wins
    pub fn find_free_frame(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Page currently held by `frame`
    #[inline]
    pub fn occupant(&self, frame: usize) -> Option<u64> {
        self.slots.get(frame).copied().flatten()
    }

    /// Put `page` into `frame`, returning the previous occupant
    pub fn assign(&mut self, frame: usize, page: u64) -> Option<u64> {
        self.slots[frame].replace(page)
    }

    #[cfg(test)]
    fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Snapshot of every slot, indexed by frame number
    pub fn slots(&self) -> &[Option<u64>] {
        &self.slots
    }

    /// Calculate the starting physical address of a frame
    #[inline]
    pub fn frame_to_address(frame: usize, page_size: u64) -> u64 {
        frame as u64 * page_size
    }
}
