//! Split → scan → aggregate.
//!
//! ```text
//! input file ─ split ─┬─ unit 0 ─ worker ─┐
//!                     ├─ unit 1 ─ worker ─┼─ channel ─ aggregate ─ Report
//!                     └─ unit N ─ worker ─┘
//! ```
//!
//! The split set owns every unit file and removes them when dropped, so
//! cleanup happens on success, on error and on unwind alike.

pub mod aggregate;
pub mod context;
pub mod split;
pub mod worker;

pub use aggregate::*;
pub use context::*;
pub use split::*;
pub use worker::*;
