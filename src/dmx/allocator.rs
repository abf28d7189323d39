//! Bulk addressing allocation
//!
//! Pure, deterministic mapping from a fixture plan and addressing
//! parameters to one address row per fixture instance. The cursor
//! (current address + current universe) is threaded across the whole
//! plan: the first instance of entry N continues exactly where the last
//! instance of entry N-1 left off, never back at the configured start.
//!
//! No I/O happens here. Malformed parameters clamp to the nearest valid
//! value so a typo in the field still produces a usable table; the one
//! refused input is a footprint no universe can hold.

use super::constants::UNIVERSE_SIZE;
use super::plan::{
    AddressRow, AddressingParameters, FixtureSpec, OverflowPolicy, PlanEntry,
};
use crate::exceptions::{PatchError, Result};
use log::{debug, trace};

/// Cursor state threaded across all plan entries
///
/// The address is kept wider than a channel number because the advance
/// past a fixture (`end + 1 + gap`) may point beyond the universe end
/// until the next overflow check pulls it back.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    address: u32,
    universe: u32,
}

impl Cursor {
    fn new(params: &AddressingParameters) -> Self {
        Cursor {
            address: u32::from(params.start.clamp(1, UNIVERSE_SIZE)),
            universe: params.universe.max(1),
        }
    }

    fn fits(&self, footprint: u16) -> bool {
        self.address.saturating_add(u32::from(footprint)) - 1 <= u32::from(UNIVERSE_SIZE)
    }

    /// Advance to the next universe for a fixture that no longer fits
    ///
    /// Exactly one universe increment per overflow event. Under `carry`
    /// the overshoot continues the virtual channel count into the new
    /// universe; if the carried address still cannot hold the footprint
    /// it clamps to 1 rather than overflowing again.
    fn overflow(&mut self, footprint: u16, policy: OverflowPolicy) {
        let size = u32::from(UNIVERSE_SIZE);
        let footprint = u32::from(footprint);

        self.universe = self.universe.saturating_add(1);
        self.address = match policy {
            OverflowPolicy::Reset => 1,
            OverflowPolicy::Carry => {
                let carried = self.address.saturating_add(footprint) - 1 - size + 1;
                if carried.saturating_add(footprint) - 1 > size {
                    1
                } else {
                    carried
                }
            }
        };
    }
}

/// Compute address rows for a whole plan with the default labels
pub fn allocate(entries: &[PlanEntry], params: &AddressingParameters) -> Result<Vec<AddressRow>> {
    allocate_with(entries, params, default_label)
}

/// Compute address rows with a caller-supplied naming function
///
/// The labeler is keyed by the running global instance counter (1-based,
/// continuous across entries) and the entry's spec.
pub fn allocate_with<F>(
    entries: &[PlanEntry],
    params: &AddressingParameters,
    label: F,
) -> Result<Vec<AddressRow>>
where
    F: Fn(usize, &FixtureSpec) -> String,
{
    // Fail fast: no partial output for a plan that can never be addressed.
    for entry in entries {
        if !entry.spec.footprint_in_range() {
            return Err(PatchError::InvalidFootprint(entry.spec.footprint));
        }
    }

    let mut cursor = Cursor::new(params);
    let mut rows = Vec::new();
    let mut instance: usize = 1;

    for entry in entries {
        let footprint = entry.spec.footprint;
        let quantity = entry.quantity.max(1);
        trace!(
            "entry '{}': {} x {}ch from cursor {:?}",
            entry.spec.display_name(),
            quantity,
            footprint,
            cursor
        );

        for _ in 0..quantity {
            if !cursor.fits(footprint) {
                cursor.overflow(footprint, params.overflow_policy);
            }

            let address = cursor.address as u16;
            let end_address = address + footprint - 1;
            rows.push(AddressRow {
                sequence_index: instance,
                label: label(instance, &entry.spec),
                universe: cursor.universe,
                address,
                footprint,
                end_address,
                notes: String::new(),
            });

            cursor.address = (u32::from(end_address) + 1).saturating_add(params.gap);
            instance += 1;
        }
    }

    debug!(
        "allocated {} fixtures, last universe {}",
        rows.len(),
        rows.last().map(|r| r.universe).unwrap_or(cursor.universe)
    );
    Ok(rows)
}

/// Default row label
///
/// "Brand Model (Mode) #n" when the spec carries display context,
/// "Fixture n" for ad-hoc groups without one.
pub fn default_label(instance: usize, spec: &FixtureSpec) -> String {
    let base = spec.display_name();
    if base.is_empty() {
        return format!("Fixture {instance}");
    }

    let mode = spec.mode.trim();
    if mode.is_empty() {
        format!("{base} #{instance}")
    } else {
        format!("{base} ({mode}) #{instance}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(footprint: u16, quantity: u32) -> PlanEntry {
        PlanEntry::new(FixtureSpec::adhoc(footprint), quantity)
    }

    fn params(start: u16, universe: u32, gap: u32, policy: OverflowPolicy) -> AddressingParameters {
        AddressingParameters {
            start,
            universe,
            gap,
            overflow_policy: policy,
        }
    }

    fn cells(rows: &[AddressRow]) -> Vec<(u32, u16, u16)> {
        rows.iter()
            .map(|r| (r.universe, r.address, r.end_address))
            .collect()
    }

    #[test]
    fn reset_policy_moves_whole_fixture_to_next_universe() {
        let rows = allocate(
            &[entry(4, 2)],
            &params(510, 1, 0, OverflowPolicy::Reset),
        )
        .unwrap();

        assert_eq!(cells(&rows), vec![(2, 1, 4), (2, 5, 8)]);
    }

    #[test]
    fn carry_policy_continues_virtual_channel_count() {
        // 510 + 4 - 1 = 513 overshoots by one channel; the carried start
        // is 510 + 4 - 512 = 2 in the next universe.
        let rows = allocate(
            &[entry(4, 1)],
            &params(510, 1, 0, OverflowPolicy::Carry),
        )
        .unwrap();

        assert_eq!(cells(&rows), vec![(2, 2, 5)]);
    }

    #[test]
    fn carry_falls_back_to_address_one_when_still_too_wide() {
        // 400ch at 401: carried start would be 289, but 289 + 399 > 512,
        // so the second fixture clamps to address 1 with a single
        // universe increment.
        let rows = allocate(
            &[entry(400, 2)],
            &params(1, 1, 0, OverflowPolicy::Carry),
        )
        .unwrap();

        assert_eq!(cells(&rows), vec![(1, 1, 400), (2, 1, 400)]);
    }

    #[test]
    fn entries_share_one_continuous_cursor() {
        let rows = allocate(
            &[entry(4, 2), entry(2, 1)],
            &params(1, 1, 1, OverflowPolicy::Reset),
        )
        .unwrap();

        // Third row continues from the first entry's cursor (9 + 1 + 1),
        // not from the configured start.
        assert_eq!(cells(&rows), vec![(1, 1, 4), (1, 6, 9), (1, 11, 12)]);
    }

    #[test]
    fn entry_boundary_overflow_uses_carried_cursor() {
        // Entry 1 parks the cursor at 509; entry 2's 8ch fixture does not
        // fit there, so the overflow decision happens at the boundary
        // between entries.
        let rows = allocate(
            &[entry(4, 127), entry(8, 1)],
            &params(1, 1, 0, OverflowPolicy::Reset),
        )
        .unwrap();

        assert_eq!(rows[126].end_address, 508);
        assert_eq!(
            cells(&rows[127..]),
            vec![(2, 1, 8)]
        );
    }

    #[test]
    fn full_universe_footprint_occupies_whole_universe() {
        for policy in [OverflowPolicy::Reset, OverflowPolicy::Carry] {
            let rows = allocate(&[entry(512, 2)], &params(1, 1, 0, policy)).unwrap();
            assert_eq!(cells(&rows), vec![(1, 1, 512), (2, 1, 512)]);
        }
    }

    #[test]
    fn invalid_footprint_fails_before_any_row() {
        let err = allocate(
            &[entry(4, 2), entry(513, 1)],
            &params(1, 1, 0, OverflowPolicy::Reset),
        )
        .unwrap_err();

        assert!(matches!(err, PatchError::InvalidFootprint(513)));

        let err = allocate(&[entry(0, 1)], &AddressingParameters::default()).unwrap_err();
        assert!(matches!(err, PatchError::InvalidFootprint(0)));
    }

    #[test]
    fn malformed_parameters_clamp_instead_of_failing() {
        let rows = allocate(&[entry(4, 0)], &params(0, 0, 0, OverflowPolicy::Reset)).unwrap();
        // quantity 0 -> 1 instance, start 0 -> 1, universe 0 -> 1
        assert_eq!(cells(&rows), vec![(1, 1, 4)]);

        let rows = allocate(&[entry(4, 1)], &params(600, 1, 0, OverflowPolicy::Reset)).unwrap();
        // start past the universe end clamps to 512, which overflows the
        // 4ch footprint into universe 2
        assert_eq!(cells(&rows), vec![(2, 1, 4)]);
    }

    #[test]
    fn continuity_holds_within_a_universe() {
        let gap = 3;
        let rows = allocate(
            &[entry(16, 40)],
            &params(1, 1, gap, OverflowPolicy::Reset),
        )
        .unwrap();

        for pair in rows.windows(2) {
            if pair[0].universe == pair[1].universe {
                assert_eq!(
                    u32::from(pair[1].address),
                    u32::from(pair[0].end_address) + 1 + gap
                );
            }
            assert_eq!(pair[1].sequence_index, pair[0].sequence_index + 1);
            assert!(pair[0].end_address <= UNIVERSE_SIZE);
        }
    }

    #[test]
    fn allocation_is_deterministic() {
        let plan = vec![entry(21, 6), entry(30, 3), entry(12, 10)];
        let params = params(17, 3, 2, OverflowPolicy::Carry);

        let first = allocate(&plan, &params).unwrap();
        let second = allocate(&plan, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn labels_carry_spec_context_and_global_counter() {
        let spec = FixtureSpec {
            brand: "Robe".to_string(),
            model: "Spiider".to_string(),
            mode: "21ch".to_string(),
            footprint: 21,
        };
        let plan = vec![
            PlanEntry::new(spec, 2),
            PlanEntry::new(FixtureSpec::adhoc(4), 1),
        ];

        let rows = allocate(&plan, &AddressingParameters::default()).unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Robe Spiider (21ch) #1", "Robe Spiider (21ch) #2", "Fixture 3"]
        );
    }

    #[test]
    fn custom_labeler_receives_running_counter() {
        let rows = allocate_with(
            &[entry(8, 3)],
            &AddressingParameters::default(),
            |n, _| format!("Truss {n}"),
        )
        .unwrap();

        assert_eq!(rows[2].label, "Truss 3");
        assert_eq!(rows[2].sequence_index, 3);
    }

    #[test]
    fn label_without_mode_drops_the_parens() {
        let spec = FixtureSpec {
            brand: "Chroma-Q".to_string(),
            model: "Color Force II 72".to_string(),
            mode: String::new(),
            footprint: 12,
        };
        assert_eq!(default_label(5, &spec), "Chroma-Q Color Force II 72 #5");
    }
}
