//! Media Forensics Core
//!
//! Local forensic feature/anomaly pipeline plus external-verification
//! orchestration. The HTTP boundary in `api` is intentionally thin; all
//! analysis and failure handling lives under `logic`.

pub mod api;
pub mod constants;
pub mod logic;
