//! dmxpatch - DMX bulk addressing field tool
//!
//! This crate computes universe/address assignments for a fixture plan,
//! converts addresses to and from DIP-switch positions, and persists the
//! plan and fixture library between runs.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,

    // All warnings must be fixed
    warnings,
)]
#![warn(
    // Documentation
    missing_docs,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![allow(
    missing_docs,  // TODO: Complete documentation
)]

pub mod api;
pub mod dmx;
pub mod exceptions;
pub mod exit_codes;
pub mod library;
pub mod logger;
pub mod store;
pub mod utils;
pub mod version;

// Re-export main API functions
pub use api::{generate, generate_from_store, generate_plan};
pub use exceptions::PatchError;

// Re-export core types for direct use
pub use dmx::allocator::{allocate, allocate_with};
pub use dmx::constants::UNIVERSE_SIZE;
pub use dmx::plan::{
    AddressRow, AddressingParameters, FixtureSpec, OverflowPolicy, PlanEntry,
};
