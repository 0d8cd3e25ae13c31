//! Demand-paging engine: page table, frame table and LRU tracker updated
//! together on every translation.

use std::fmt;

use log::{debug, info, warn};

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{VmError, VmResult};
use crate::lru::LruTracker;
use crate::memory::FrameTable;
use crate::page_table::{PageTable, PageTableEntry};
use crate::translation::VirtualAddress;

/// How a fault was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Page loaded into an empty frame
    FreeFrame { frame: usize },
    /// `victim` was evicted and its frame reused
    Eviction { victim: u64, frame: usize },
    /// Page was already resident, nothing to do
    AlreadyResident { frame: usize },
}

impl FaultKind {
    pub fn frame(&self) -> usize {
        match *self {
            FaultKind::FreeFrame { frame }
            | FaultKind::Eviction { frame, .. }
            | FaultKind::AlreadyResident { frame } => frame,
        }
    }
}

/// Emitted once per page fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultEvent {
    pub page_number: u64,
    pub kind: FaultKind,
}

impl fmt::Display for FaultEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::FreeFrame { frame } => write!(
                f,
                "Page fault for page number: {} (free frame {})",
                self.page_number, frame
            ),
            FaultKind::Eviction { victim, frame } => write!(
                f,
                "Page fault for page number: {} (evicted page {} from frame {})",
                self.page_number, victim, frame
            ),
            FaultKind::AlreadyResident { frame } => write!(
                f,
                "Page {} already resident in frame {}",
                self.page_number, frame
            ),
        }
    }
}

/// Counters accumulated over the manager's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmStats {
    pub translations: u64,
    pub hits: u64,
    pub faults: u64,
    pub evictions: u64,
}

impl VmStats {
    /// Fraction of translations served without a fault
    pub fn hit_ratio(&self) -> f64 {
        if self.translations == 0 {
            return 0.0;
        }
        self.hits as f64 / self.translations as f64
    }
}

/// A completed translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub physical: u64,
    /// Set when the translation had to fault the page in
    pub fault: Option<FaultKind>,
}

type FaultListener = Box<dyn FnMut(&FaultEvent)>;

pub struct VirtualMemoryManager {
    page_size: u64,
    page_table: PageTable,
    frames: FrameTable,
    lru: LruTracker,
    stats: VmStats,
    listener: Option<FaultListener>,
}

impl VirtualMemoryManager {
    /// Create a manager with `num_frames` frames of the default page size
    pub fn new(num_frames: i64) -> VmResult<Self> {
        Self::with_page_size(num_frames, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(num_frames: i64, page_size: i64) -> VmResult<Self> {
        if num_frames <= 0 {
            return Err(VmError::InvalidCapacity(num_frames));
        }
        if page_size <= 0 {
            return Err(VmError::InvalidPageSize(page_size));
        }
        // Every physical address must fit in an i64 so batch output stays exact
        if num_frames.checked_mul(page_size).is_none() {
            return Err(VmError::InvalidCapacity(num_frames));
        }
        let frame_count =
            usize::try_from(num_frames).map_err(|_| VmError::InvalidCapacity(num_frames))?;
        let frames = FrameTable::new(frame_count).map_err(|e| {
            warn!("Cannot allocate {} frames: {}", frame_count, e);
            VmError::InvalidCapacity(num_frames)
        })?;

        debug!(
            "Creating VMM with {} frames of {} bytes",
            frame_count, page_size
        );
        Ok(VirtualMemoryManager {
            page_size: page_size as u64,
            page_table: PageTable::new(),
            frames,
            lru: LruTracker::new(),
            stats: VmStats::default(),
            listener: None,
        })
    }

    /// Register a callback invoked once per page fault
    pub fn set_fault_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&FaultEvent) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Translate a virtual address to a physical address
    pub fn translate(&mut self, virtual_address: i64) -> VmResult<u64> {
        self.translate_detailed(virtual_address)
            .map(|translation| translation.physical)
    }

    /// Translate and report whether a fault was taken
    pub fn translate_detailed(&mut self, virtual_address: i64) -> VmResult<Translation> {
        if virtual_address < 0 {
            return Err(VmError::InvalidAddress(virtual_address));
        }
        let va = VirtualAddress::from_raw(virtual_address as u64, self.page_size);
        self.stats.translations += 1;

        if let Some(physical) = self.lookup(&va)? {
            self.stats.hits += 1;
            debug!("Hit: {} -> PA {}", va, physical);
            return Ok(Translation {
                physical,
                fault: None,
            });
        }

        // Miss: fault the page in, then retry exactly once
        let kind = self.handle_fault(va.page)?;
        match self.lookup(&va)? {
            Some(physical) => Ok(Translation {
                physical,
                fault: Some(kind),
            }),
            None => {
                warn!("Page {} unresolved after fault handling", va.page);
                Err(VmError::UnresolvedFault(va.page))
            }
        }
    }

    /// Resolve `va` against the page table, refreshing recency on a hit
    fn lookup(&mut self, va: &VirtualAddress) -> VmResult<Option<u64>> {
        let Some(frame) = self.page_table.resident_frame(va.page) else {
            return Ok(None);
        };
        if !self.lru.touch(va.page) {
            warn!("Resident page {} missing from LRU tracker", va.page);
            return Err(VmError::Inconsistent(format!(
                "resident page {} missing from LRU tracker",
                va.page
            )));
        }
        Ok(Some(
            FrameTable::frame_to_address(frame, self.page_size) + va.offset,
        ))
    }

    /// Make `page_number` resident, evicting the LRU page if every frame is taken
    pub fn handle_fault(&mut self, page_number: u64) -> VmResult<FaultKind> {
        if let Some(frame) = self.page_table.resident_frame(page_number) {
            return Ok(FaultKind::AlreadyResident { frame });
        }

        let kind = match self.frames.find_free_frame() {
            Some(frame) => {
                self.frames.assign(frame, page_number);
                self.page_table
                    .insert(page_number, PageTableEntry::resident(frame));
                self.lru.push_back(page_number);
                FaultKind::FreeFrame { frame }
            }
            None => {
                let victim = self.lru.pop_front().ok_or_else(|| {
                    warn!(
                        "All {} frames occupied but replacement queue is empty",
                        self.frames.len()
                    );
                    VmError::EmptyReplacementQueue
                })?;
                let frame = self.replace(victim, page_number)?;
                self.stats.evictions += 1;
                FaultKind::Eviction { victim, frame }
            }
        };

        self.stats.faults += 1;
        self.emit(FaultEvent { page_number, kind });
        Ok(kind)
    }

    /// Hand `victim`'s frame to `incoming`, returning the frame number.
    ///
    /// The caller has already removed `victim` from the LRU tracker.
    fn replace(&mut self, victim: u64, incoming: u64) -> VmResult<usize> {
        let frame = self.page_table.invalidate(victim).ok_or_else(|| {
            warn!("Replacement victim {} is not resident", victim);
            VmError::InvalidVictim(victim)
        })?;

        self.frames.assign(frame, incoming);
        self.page_table
            .insert(incoming, PageTableEntry::resident(frame));
        self.lru.push_back(incoming);
        debug!("Frame {}: page {} -> page {}", frame, victim, incoming);
        Ok(frame)
    }

    fn emit(&mut self, event: FaultEvent) {
        info!("{}", event);
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }

    /// Verify the page table, frame table and LRU tracker agree
    pub fn check_invariants(&self) -> VmResult<()> {
        let mut valid = 0;
        for (page, frame) in self.page_table.valid_entries() {
            valid += 1;
            if self.frames.occupant(frame) != Some(page) {
                return Err(VmError::Inconsistent(format!(
                    "page {} claims frame {} held by {:?}",
                    page,
                    frame,
                    self.frames.occupant(frame)
                )));
            }
            if !self.lru.contains(page) {
                return Err(VmError::Inconsistent(format!(
                    "valid page {} missing from LRU tracker",
                    page
                )));
            }
        }

        if valid > self.frames.len() {
            return Err(VmError::Inconsistent(format!(
                "{} valid pages exceed {} frames",
                valid,
                self.frames.len()
            )));
        }
        if self.lru.len() != valid {
            return Err(VmError::Inconsistent(format!(
                "LRU tracker holds {} pages, page table has {} valid",
                self.lru.len(),
                valid
            )));
        }

        for (frame, slot) in self.frames.slots().iter().enumerate() {
            if let Some(page) = *slot {
                if self.page_table.resident_frame(page) != Some(frame) {
                    return Err(VmError::Inconsistent(format!(
                        "frame {} holds page {} which is not mapped there",
                        frame, page
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Frame currently holding `page`, if resident
    pub fn frame_of(&self, page: u64) -> Option<usize> {
        self.page_table.resident_frame(page)
    }

    /// Resident pages, least recently used first
    pub fn resident_pages(&self) -> Vec<u64> {
        self.lru.iter().collect()
    }

    /// Occupant of each frame, indexed by frame number
    pub fn frames(&self) -> &[Option<u64>] {
        self.frames.slots()
    }

    pub fn stats(&self) -> VmStats {
        self.stats
    }
}

impl fmt::Debug for VirtualMemoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualMemoryManager")
            .field("page_size", &self.page_size)
            .field("frames", &self.frames)
            .field("lru", &self.resident_pages())
            .field("stats", &self.stats)
            .finish()
    }
}
