use crate::constants::{DEFAULT_NUM_FRAMES, DEFAULT_PAGE_SIZE};
use crate::error::VmResult;
use crate::vm_manager::VirtualMemoryManager;

/// Simulation geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub num_frames: i64,
    pub page_size: i64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            num_frames: DEFAULT_NUM_FRAMES,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SimConfig {
    /// Validate the geometry and build an empty manager
    pub fn build(&self) -> VmResult<VirtualMemoryManager> {
        VirtualMemoryManager::with_page_size(self.num_frames, self.page_size)
    }
}
