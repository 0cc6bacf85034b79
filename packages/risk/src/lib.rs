#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Risk classification, spatial grid queries, and the stored → live →
//! synthetic fallback cascade.
//!
//! The cascade is total: [`fallback::RiskResolver::resolve`] always
//! returns a value for every requested (location, indicator) pair, and
//! the tier that produced the data is observable in the result.

pub mod classify;
pub mod fallback;
pub mod spatial;

pub use classify::{classify, classify_against};
pub use fallback::{Resolution, RiskResolver};
