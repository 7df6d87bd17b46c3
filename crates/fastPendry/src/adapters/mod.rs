//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer wraps the core execution adapters with parallel pass
//! injection:
//!
//! - **FixedShift**: one R-factor evaluation, beams in parallel
//! - **GridSearch**: V0r optimization, each evaluation's beams in parallel
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! pendry
//! ```

/// Parallel fixed-shift adapter.
pub mod fixed;

/// Parallel grid-search adapter.
pub mod search;
