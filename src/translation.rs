use crate::constants::*;
use crate::error::VmResult;
use crate::vm_manager::{FaultKind, Translation, VirtualMemoryManager};

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: u64,
    pub page: u64,
    pub offset: u64,
}

impl VirtualAddress {
    /// Decompose a raw VA into page number and offset
    pub fn from_raw(va: u64, page_size: u64) -> Self {
        VirtualAddress {
            va,
            page: va / page_size,
            offset: va % page_size,
        }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (p={}, w={})", self.va, self.page, self.offset)
    }
}

/// Result of one address in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub va: i64,
    pub result: VmResult<Translation>,
}

impl TranslationOutcome {
    /// Convert to the output format (-1 for errors, PA otherwise)
    pub fn to_output(&self) -> i64 {
        match &self.result {
            Ok(translation) => i64::try_from(translation.physical).unwrap_or(INVALID_ADDRESS),
            Err(_) => INVALID_ADDRESS,
        }
    }

    pub fn fault(&self) -> Option<FaultKind> {
        self.result.as_ref().ok().and_then(|t| t.fault)
    }
}

/// Translate a batch of virtual addresses in order.
///
/// Invalid addresses are recorded and skipped. A consistency error is
/// recorded and ends the batch, since the manager can no longer be trusted.
pub fn translate_batch(vmm: &mut VirtualMemoryManager, vas: &[i64]) -> Vec<TranslationOutcome> {
    let mut outcomes = Vec::with_capacity(vas.len());
    for &va in vas {
        let result = vmm.translate_detailed(va);
        let fatal = matches!(&result, Err(e) if e.is_consistency_error());
        outcomes.push(TranslationOutcome { va, result });
        if fatal {
            break;
        }
    }
    outcomes
}

/// Physical addresses for a batch, -1 marking each failure
pub fn to_output(outcomes: &[TranslationOutcome]) -> Vec<i64> {
    outcomes.iter().map(TranslationOutcome::to_output).collect()
}
