//! Core type definitions for the SDUI screen engine.
//!
//! This crate holds the small, dependency-light pieces every other layer
//! shares:
//! - Millisecond timestamps and the [`Clock`] abstraction used for TTL checks
//! - Content hashing used to label sync buckets
//!
//! Screen structures live in `sdui-model`, not here.

mod clock;
mod hash;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use hash::content_hash;
