use std::collections::HashMap;

/// Mapping state of one virtual page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub frame_number: usize,
    pub valid: bool,
}

impl PageTableEntry {
    pub fn resident(frame_number: usize) -> Self {
        PageTableEntry {
            frame_number,
            valid: true,
        }
    }
}

/// Page number -> frame assignment.
///
/// Entries are only created by `insert`; evicted pages stay behind as
/// `valid = false` tombstones.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    entries: HashMap<u64, PageTableEntry>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, page: u64) -> Option<&PageTableEntry> {
        self.entries.get(&page)
    }

    /// Frame of `page` if it is currently resident
    #[inline]
    pub fn resident_frame(&self, page: u64) -> Option<usize> {
        self.get(page)
            .filter(|entry| entry.valid)
            .map(|entry| entry.frame_number)
    }

    /// Create or overwrite the entry for `page`
    pub fn insert(&mut self, page: u64, entry: PageTableEntry) {
        self.entries.insert(page, entry);
    }

    /// Mark `page` invalid, returning the frame it held.
    ///
    /// Returns `None` when the page has no entry or is already invalid.
    pub fn invalidate(&mut self, page: u64) -> Option<usize> {
        let entry = self.entries.get_mut(&page)?;
        if !entry.valid {
            return None;
        }
        entry.valid = false;
        Some(entry.frame_number)
    }

    /// Total entries, tombstones included
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(page, frame)` for every valid entry
    pub fn valid_entries(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.valid)
            .map(|(&page, entry)| (page, entry.frame_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_does_not_create_entries() {
        let table = PageTable::new();
        assert!(table.get(12).is_none());
        assert!(table.resident_frame(12).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_and_overwrite() {
        let mut table = PageTable::new();
        table.insert(12, PageTableEntry::resident(43));
        table.insert(4, PageTableEntry::resident(45));
        assert_eq!(table.resident_frame(12), Some(43));
        assert_eq!(table.resident_frame(4), Some(45));

        table.insert(12, PageTableEntry::resident(49));
        assert_eq!(table.resident_frame(12), Some(49));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_invalidate_leaves_tombstone() {
        let mut table = PageTable::new();
        table.insert(1, PageTableEntry::resident(3));

        assert_eq!(table.invalidate(1), Some(3));
        assert_eq!(table.resident_frame(1), None);
        assert_eq!(
            table.get(1),
            Some(&PageTableEntry {
                frame_number: 3,
                valid: false
            })
        );

        // Already invalid
        assert_eq!(table.invalidate(1), None);
        // Never mapped
        assert_eq!(table.invalidate(2), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_valid_entries_skip_tombstones() {
        let mut table = PageTable::new();
        table.insert(1, PageTableEntry::resident(0));
        table.insert(2, PageTableEntry::resident(1));
        table.invalidate(1);

        let valid: Vec<_> = table.valid_entries().collect();
        assert_eq!(valid, vec![(2, 1)]);
    }
}
