pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod lru;
pub mod memory;
pub mod page_table;
pub mod translation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use config::SimConfig;
pub use constants::*;
pub use error::{VmError, VmResult};
pub use translation::{TranslationOutcome, VirtualAddress};
pub use vm_manager::{FaultEvent, FaultKind, Translation, VirtualMemoryManager, VmStats};
