//! Fixture library
//!
//! Local catalog of fixture definitions the technician picks plan entries
//! from. Records are display data plus the one number the allocator
//! cares about: the channel footprint.

use crate::dmx::plan::{FixtureSpec, PlanEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One fixture definition in the library
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRecord {
    pub id: Uuid,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub mode: String,
    pub footprint: u16,
    /// Comma-separated reference URLs (fixture manuals, GDTF pages)
    #[serde(default)]
    pub links: String,
    #[serde(default)]
    pub notes: String,
}

impl FixtureRecord {
    /// Create a record with a fresh id
    pub fn new(brand: &str, model: &str, mode: &str, footprint: u16) -> Self {
        FixtureRecord {
            id: Uuid::new_v4(),
            brand: brand.to_string(),
            model: model.to_string(),
            mode: mode.to_string(),
            footprint,
            links: String::new(),
            notes: String::new(),
        }
    }

    /// Set the reference links
    pub fn with_links(mut self, links: &str) -> Self {
        self.links = links.to_string();
        self
    }

    /// Set the notes
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    /// The spec a plan entry carries for this record
    pub fn spec(&self) -> FixtureSpec {
        FixtureSpec {
            brand: self.brand.clone(),
            model: self.model.clone(),
            mode: self.mode.clone(),
            footprint: self.footprint,
        }
    }

    /// Bridge into the plan: this record, `quantity` times
    pub fn to_plan_entry(&self, quantity: u32) -> PlanEntry {
        PlanEntry::new(self.spec(), quantity.max(1))
    }

    /// Case-insensitive substring match over the searchable fields
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.brand, &self.model, &self.mode, &self.notes]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// One-line listing label: "Brand Model — Mode • Nch"
    pub fn display_label(&self) -> String {
        let name = format!("{} {}", self.brand.trim(), self.model.trim());
        let mode = if self.mode.trim().is_empty() {
            "–"
        } else {
            self.mode.trim()
        };
        format!("{} — {} • {}ch", name.trim(), mode, self.footprint)
    }
}

/// Library contents seeded on first run
pub fn seed_library() -> Vec<FixtureRecord> {
    vec![
        FixtureRecord::new("Ayrton", "Perseo Profile", "30ch Standard", 30)
            .with_links("https://gdtf-share.com/,https://ofl.de/")
            .with_notes("IP65 profile"),
        FixtureRecord::new("Robe", "Spiider", "21ch", 21).with_links("https://gdtf-share.com/"),
        FixtureRecord::new("Chroma-Q", "Color Force II 72", "12ch HSI", 12),
    ]
}

/// Sort records for listing, by brand then model then mode
pub fn sort_for_listing(records: &mut [FixtureRecord]) {
    records.sort_by_key(|record| {
        format!("{} {} {}", record.brand, record.model, record.mode).to_lowercase()
    });
}

/// Records matching a search query, in listing order
pub fn search<'a>(records: &'a [FixtureRecord], query: &str) -> Vec<&'a FixtureRecord> {
    let mut found: Vec<&FixtureRecord> = records
        .iter()
        .filter(|record| record.matches(query))
        .collect();
    found.sort_by_key(|record| {
        format!("{} {} {}", record.brand, record.model, record.mode).to_lowercase()
    });
    found
}

/// Insert a record, replacing any existing record with the same id
pub fn upsert(records: &mut Vec<FixtureRecord>, record: FixtureRecord) {
    match records.iter_mut().find(|existing| existing.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Remove a record by id; true when something was removed
pub fn remove(records: &mut Vec<FixtureRecord>, id: Uuid) -> bool {
    let before = records.len();
    records.retain(|record| record.id != id);
    records.len() != before
}
