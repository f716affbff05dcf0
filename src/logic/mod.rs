//! Analysis Logic
//!
//! Everything between the HTTP boundary and the wire: feature extraction,
//! anomaly scoring, the external verification adapter, verdict fusion and
//! the per-sample analysis session.

pub mod features;
pub mod fusion;
pub mod model;
pub mod risk;
pub mod sample;
pub mod session;
pub mod verify;
