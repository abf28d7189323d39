//! Fixture plan data model
//!
//! The plan is an ordered list of fixture groups; order is the addressing
//! order. All shapes serialize with camelCase keys so saved state and JSON
//! exports read the same as the tool's table output.

use super::constants::UNIVERSE_SIZE;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One kind of fixture to address
///
/// The display fields are free text; only `footprint` feeds the
/// allocator's arithmetic.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSpec {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub mode: String,
    /// Consecutive DMX channels this fixture occupies
    pub footprint: u16,
}

impl FixtureSpec {
    /// Create a spec with no display context (quick single-group addressing)
    pub fn adhoc(footprint: u16) -> Self {
        FixtureSpec {
            brand: String::new(),
            model: String::new(),
            mode: String::new(),
            footprint,
        }
    }

    /// Whether the footprint can ever be placed in a universe
    pub fn footprint_in_range(&self) -> bool {
        (1..=UNIVERSE_SIZE).contains(&self.footprint)
    }

    /// "Brand Model" with empty parts collapsed
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand.trim(), self.model.trim())
            .trim()
            .to_string()
    }
}

/// One line of the fixture plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub spec: FixtureSpec,
    /// Number of fixture instances of this spec (values below 1 clamp to 1)
    pub quantity: u32,
}

impl PlanEntry {
    /// Create a plan entry
    pub fn new(spec: FixtureSpec, quantity: u32) -> Self {
        PlanEntry { spec, quantity }
    }
}

/// Behavior when a footprint would cross the end of the current universe
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Next universe, address 1
    #[default]
    Reset,
    /// Next universe, address continues the virtual channel count
    Carry,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(OverflowPolicy::Reset),
            "carry" => Ok(OverflowPolicy::Carry),
            other => Err(format!("unknown overflow policy: {other} (use reset or carry)")),
        }
    }
}

/// Global allocation configuration
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressingParameters {
    /// First address to use, 1-512 (out-of-range values clamp)
    pub start: u16,
    /// First universe to use, >= 1
    pub universe: u32,
    /// Unused channels left after each fixture's footprint
    pub gap: u32,
    pub overflow_policy: OverflowPolicy,
}

impl Default for AddressingParameters {
    fn default() -> Self {
        AddressingParameters {
            start: 1,
            universe: 1,
            gap: 0,
            overflow_policy: OverflowPolicy::Reset,
        }
    }
}

/// One computed output record, one per fixture instance
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressRow {
    /// 1-based position in the overall output
    pub sequence_index: usize,
    pub label: String,
    pub universe: u32,
    /// First channel the fixture occupies, 1-512
    pub address: u16,
    pub footprint: u16,
    /// `address + footprint - 1`, never past the universe end
    pub end_address: u16,
    /// User-editable after generation; the allocator leaves it empty
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_entry_json_uses_camel_case_keys() {
        let entry = PlanEntry::new(
            FixtureSpec {
                brand: "Robe".to_string(),
                model: "Spiider".to_string(),
                mode: "21ch".to_string(),
                footprint: 21,
            },
            4,
        );

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"footprint\":21"));
        assert!(json.contains("\"quantity\":4"));

        let decoded: PlanEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn address_row_json_uses_spec_field_names() {
        let row = AddressRow {
            sequence_index: 1,
            label: "Fixture 1".to_string(),
            universe: 2,
            address: 5,
            footprint: 4,
            end_address: 8,
            notes: String::new(),
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"sequenceIndex\":1"));
        assert!(json.contains("\"endAddress\":8"));
        assert!(!json.contains("end_address"));
    }

    #[test]
    fn overflow_policy_round_trips_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&OverflowPolicy::Carry).unwrap(),
            "\"carry\""
        );
        assert_eq!(
            serde_json::from_str::<OverflowPolicy>("\"reset\"").unwrap(),
            OverflowPolicy::Reset
        );
        assert_eq!("carry".parse::<OverflowPolicy>(), Ok(OverflowPolicy::Carry));
        assert!("wrap".parse::<OverflowPolicy>().is_err());
    }

    #[test]
    fn parameters_default_to_first_slot_reset() {
        let params: AddressingParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(params.start, 1);
        assert_eq!(params.universe, 1);
        assert_eq!(params.gap, 0);
        assert_eq!(params.overflow_policy, OverflowPolicy::Reset);
    }

    #[test]
    fn display_name_collapses_empty_parts() {
        assert_eq!(FixtureSpec::adhoc(8).display_name(), "");
        let spec = FixtureSpec {
            brand: "Ayrton".to_string(),
            model: String::new(),
            mode: String::new(),
            footprint: 30,
        };
        assert_eq!(spec.display_name(), "Ayrton");
    }
}
