//! Core types for diff counting.
//!
//! This module contains the element width abstraction shared by the scan and
//! merge phases, and the [`Cap`] that bounds how far a call counts.

mod cap;
mod primitives;

pub use cap::Cap;
pub use primitives::*;
