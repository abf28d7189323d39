//! High-level API for dmxpatch operations

use crate::dmx::allocator;
use crate::dmx::plan::{AddressRow, AddressingParameters, FixtureSpec, PlanEntry};
use crate::exceptions::Result;
use crate::store::{AddressingState, StateStore};

// Re-export the allocator entry points as the crate's primary surface
pub use crate::dmx::allocator::{allocate, allocate_with, default_label};

/// Compute address rows for an addressing section
///
/// A saved plan is addressed as one continuous sequence. With no plan the
/// quick single-group flow applies: one ad-hoc entry built from the saved
/// footprint and quantity (values below 1 clamp to 1, matching the rest
/// of the forgiving parameter handling).
pub fn generate(addressing: &AddressingState) -> Result<Vec<AddressRow>> {
    if addressing.plan.is_empty() {
        let entry = PlanEntry::new(
            FixtureSpec::adhoc(addressing.footprint.max(1)),
            addressing.quantity,
        );
        return allocator::allocate(&[entry], &addressing.params);
    }

    allocator::allocate(&addressing.plan, &addressing.params)
}

/// Compute address rows from the persisted plan and parameters
pub fn generate_from_store(store: &StateStore) -> Result<Vec<AddressRow>> {
    generate(&store.load().addressing)
}

/// Compute address rows for a plan with explicit parameters
pub fn generate_plan(
    plan: &[PlanEntry],
    params: &AddressingParameters,
) -> Result<Vec<AddressRow>> {
    allocator::allocate(plan, params)
}
