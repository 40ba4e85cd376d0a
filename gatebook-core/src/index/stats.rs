//! Statistics and DirectoryStats.

use crate::index::types::Directory;
use gatebook_types::Category;
use serde::Serialize;

/// A snapshot of directory statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    /// Number of records in the directory.
    pub num_records: usize,
    /// Records classified as apartments.
    pub apartments: usize,
    /// Records classified as businesses.
    pub businesses: usize,
    /// Records classified as residential.
    pub residential: usize,
    /// Records with a non-empty gate code.
    pub with_gate_code: usize,
    /// Source entries skipped while loading.
    pub skipped_entries: usize,
}

impl DirectoryStats {
    /// Record count for one category.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Apartments => self.apartments,
            Category::Businesses => self.businesses,
            Category::Residential => self.residential,
        }
    }
}

impl Directory {
    /// Returns directory statistics.
    pub fn stats(&self) -> DirectoryStats {
        let mut stats = DirectoryStats {
            num_records: self.entries.len(),
            skipped_entries: self.skipped_entries,
            ..DirectoryStats::default()
        };
        for entry in &self.entries {
            match entry.category {
                Category::Apartments => stats.apartments += 1,
                Category::Businesses => stats.businesses += 1,
                Category::Residential => stats.residential += 1,
            }
            if !entry.record.gate_code.is_empty() {
                stats.with_gate_code += 1;
            }
        }
        stats
    }
}

impl core::fmt::Display for DirectoryStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} records ({} apartments, {} businesses, {} residential), {} with gate codes",
            self.num_records, self.apartments, self.businesses, self.residential, self.with_gate_code
        )?;

        if self.skipped_entries > 0 {
            write!(f, ", {} source entries skipped", self.skipped_entries)?;
        }

        Ok(())
    }
}
