//! Layer 5: Engine
//!
//! ## Purpose
//!
//! This layer provides the parallel execution engine for R-factor
//! operations. It distributes per-beam compute across CPU cores.
//!
//! ## Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! pendry
//! ```

/// Parallel execution passes using CPU threads.
pub mod executor;
