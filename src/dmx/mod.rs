//! DMX addressing domain
//!
//! The allocator is the core: everything else in the crate either feeds
//! it (plan model, store) or consumes its rows (exports, CLI).

pub mod allocator;
pub mod constants;
pub mod dipswitch;
pub mod export;
pub mod plan;
