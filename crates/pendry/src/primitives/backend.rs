//! Execution backend configuration for extension crates.
//!
//! This module defines the `Backend` enum used by extension crates (like
//! `fastPendry`) to select computational backends at runtime. The core
//! `pendry` crate is single-threaded by contract; this serves as a
//! configuration placeholder for downstream crates.

// Execution backend hint for extension crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    // Sequential execution in the calling thread.
    #[default]
    Sequential,

    // Multi-threaded CPU execution (requires an extension crate).
    CPU,
}
