//! API Module - HTTP boundary of the analysis core

pub mod error;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{router, AppState};
