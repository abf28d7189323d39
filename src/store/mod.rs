//! Persistent state store
//!
//! One JSON document holds everything the tool remembers between runs:
//! the addressing parameters and plan, the fixture library, and the
//! DIP-switch view. Reads are forgiving (missing or unreadable state
//! yields defaults); writes go through a temp file + rename so a crash
//! never leaves a half-written document behind.

pub mod bus;

use crate::dmx::dipswitch::{Orientation, SwitchOrder};
use crate::dmx::plan::{AddressingParameters, PlanEntry};
use crate::exceptions::{PatchError, Result};
use crate::library::{self, FixtureRecord};
use bus::{ChangeBus, ChangeEvent};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted document schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Addressing section: parameters, the plan, and the last ad-hoc group
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressingState {
    #[serde(flatten)]
    pub params: AddressingParameters,
    /// Footprint of the quick single-group flow (no plan)
    pub footprint: u16,
    /// Quantity of the quick single-group flow
    pub quantity: u32,
    pub plan: Vec<PlanEntry>,
}

impl Default for AddressingState {
    fn default() -> Self {
        AddressingState {
            params: AddressingParameters::default(),
            footprint: 1,
            quantity: 1,
            plan: Vec::new(),
        }
    }
}

/// DIP-switch section: last address and the bank presentation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DipState {
    pub address: u16,
    pub orientation: Orientation,
    pub order: SwitchOrder,
}

impl Default for DipState {
    fn default() -> Self {
        DipState {
            address: 1,
            orientation: Orientation::OnUp,
            order: SwitchOrder::LeftToRight,
        }
    }
}

/// The whole persisted document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub addressing: AddressingState,
    /// Absent means never touched: the seed library is served instead.
    /// An explicitly saved empty list stays empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<Vec<FixtureRecord>>,
    #[serde(default)]
    pub dip: DipState,
}

impl Default for StateDocument {
    fn default() -> Self {
        StateDocument {
            schema_version: SCHEMA_VERSION,
            addressing: AddressingState::default(),
            library: None,
            dip: DipState::default(),
        }
    }
}

/// File-backed store with change notification
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
    bus: ChangeBus,
}

impl StateStore {
    /// Open a store at an explicit path (the file may not exist yet)
    pub fn open(path: PathBuf) -> Self {
        StateStore {
            path,
            bus: ChangeBus::new(),
        }
    }

    /// Open the per-user default store
    pub fn default_location() -> Self {
        Self::open(crate::utils::get_state_dir().join("state.json"))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The change bus saves publish to
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Read the whole document; missing or broken state yields defaults
    pub fn load(&self) -> StateDocument {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("unreadable state at {:?}, starting fresh: {e}", self.path);
                    StateDocument::default()
                }
            },
            Err(_) => StateDocument::default(),
        }
    }

    fn write(&self, doc: &StateDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(doc)?)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            PatchError::StateError(format!("could not replace {:?}: {e}", self.path))
        })?;
        debug!("state saved to {:?}", self.path);
        Ok(())
    }

    // ==================== Plan ====================

    /// The saved plan, in addressing order
    pub fn load_plan(&self) -> Vec<PlanEntry> {
        self.load().addressing.plan
    }

    /// Replace the plan and notify subscribers with the new plan
    pub fn save_plan(&self, plan: Vec<PlanEntry>) -> Result<()> {
        let mut doc = self.load();
        doc.addressing.plan = plan.clone();
        self.write(&doc)?;
        self.bus.publish(&ChangeEvent::PlanChanged(plan));
        Ok(())
    }

    // ==================== Parameters ====================

    /// The saved addressing parameters
    pub fn load_params(&self) -> AddressingParameters {
        self.load().addressing.params
    }

    /// Replace the whole addressing section (parameters + ad-hoc group)
    pub fn save_addressing(&self, addressing: AddressingState) -> Result<()> {
        let mut doc = self.load();
        let params = addressing.params;
        doc.addressing = addressing;
        self.write(&doc)?;
        self.bus.publish(&ChangeEvent::ParamsChanged(params));
        Ok(())
    }

    // ==================== Library ====================

    /// The fixture library, seeded when never saved before
    pub fn load_library(&self) -> Vec<FixtureRecord> {
        match self.load().library {
            Some(records) => records,
            None => library::seed_library(),
        }
    }

    /// Replace the library and notify subscribers
    pub fn save_library(&self, records: Vec<FixtureRecord>) -> Result<()> {
        let mut doc = self.load();
        doc.library = Some(records.clone());
        self.write(&doc)?;
        self.bus.publish(&ChangeEvent::LibraryChanged(records));
        Ok(())
    }

    // ==================== DIP switch ====================

    /// The saved DIP section
    pub fn load_dip(&self) -> DipState {
        self.load().dip
    }

    /// Replace the DIP section and notify subscribers with the address
    pub fn save_dip(&self, dip: DipState) -> Result<()> {
        let mut doc = self.load();
        doc.dip = dip;
        self.write(&doc)?;
        self.bus.publish(&ChangeEvent::DipChanged(dip.address));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmx::plan::FixtureSpec;
    use std::sync::{Arc, Mutex};

    fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path().join("state.json"));
        (dir, store)
    }

    #[test]
    fn missing_state_yields_defaults_and_seed_library() {
        let (_dir, store) = temp_store();

        let doc = store.load();
        assert_eq!(doc.schema_version, SCHEMA_VERSION);
        assert!(doc.addressing.plan.is_empty());
        assert_eq!(doc.dip.address, 1);

        let seeded = store.load_library();
        assert_eq!(seeded.len(), 3);
    }

    #[test]
    fn plan_round_trips_and_publishes() {
        let (_dir, store) = temp_store();
        let seen = Arc::new(Mutex::new(0usize));
        {
            let seen = Arc::clone(&seen);
            store.bus().subscribe(move |event| {
                if let ChangeEvent::PlanChanged(plan) = event {
                    *seen.lock().unwrap() = plan.len();
                }
            });
        }

        let plan = vec![
            PlanEntry::new(FixtureSpec::adhoc(21), 6),
            PlanEntry::new(FixtureSpec::adhoc(12), 2),
        ];
        store.save_plan(plan.clone()).unwrap();

        assert_eq!(store.load_plan(), plan);
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn saved_document_carries_schema_version_and_camel_case() {
        let (_dir, store) = temp_store();
        let addressing = AddressingState {
            params: AddressingParameters {
                overflow_policy: crate::dmx::plan::OverflowPolicy::Carry,
                ..AddressingParameters::default()
            },
            ..AddressingState::default()
        };
        store.save_addressing(addressing).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"schemaVersion\": 1"));
        assert!(raw.contains("\"overflowPolicy\": \"carry\""));
        assert!(!raw.contains("overflow_policy"));
    }

    #[test]
    fn garbage_state_starts_fresh() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        let doc = store.load();
        assert_eq!(doc, StateDocument::default());
    }

    #[test]
    fn emptied_library_stays_empty_but_unsaved_reseeds() {
        let (_dir, store) = temp_store();

        store.save_library(Vec::new()).unwrap();
        assert!(store.load_library().is_empty());

        let (_dir2, fresh) = temp_store();
        assert_eq!(fresh.load_library().len(), 3);
    }

    #[test]
    fn dip_state_round_trips() {
        let (_dir, store) = temp_store();
        let dip = DipState {
            address: 255,
            orientation: Orientation::OnDown,
            order: SwitchOrder::RightToLeft,
        };
        store.save_dip(dip).unwrap();

        let loaded = store.load_dip();
        assert_eq!(loaded, dip);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"orientation\": \"down\""));
        assert!(raw.contains("\"order\": \"rtl\""));
    }
}
