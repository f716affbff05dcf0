//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To point the core at a different verification service, only edit this file.

/// Default verification service URL
///
/// This is the fallback URL when no environment variable is set.
pub const DEFAULT_VERIFY_URL: &str = "https://api.verify.example.com";

/// Default timeout budget for one external verification call (seconds)
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 120;

/// Initial poll delay when waiting for an external result (seconds)
pub const VERIFY_POLL_INITIAL_SECS: u64 = 1;

/// Poll delay ceiling for the exponential backoff (seconds)
pub const VERIFY_POLL_MAX_SECS: u64 = 10;

/// Maximum poll attempts per verification request
pub const VERIFY_POLL_MAX_ATTEMPTS: u32 = 20;

/// Maximum accepted sample size (15 MiB)
pub const MAX_SAMPLE_BYTES: usize = 15 * 1024 * 1024;

/// Working raster bounding box (pixels); larger samples are downscaled
pub const MAX_RASTER_DIM: u32 = 512;

/// Default bind address for the HTTP boundary
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Media-Forensics";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get verification service URL from environment or use default
pub fn get_verify_url() -> String {
    std::env::var("VERIFY_SERVICE_URL")
        .unwrap_or_else(|_| DEFAULT_VERIFY_URL.to_string())
}

/// Get verification service API key from environment (empty = not configured)
pub fn get_verify_api_key() -> String {
    std::env::var("VERIFY_API_KEY").unwrap_or_default()
}

/// Get external verification timeout from environment or use default
pub fn get_verify_timeout_secs() -> u64 {
    std::env::var("VERIFY_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_VERIFY_TIMEOUT_SECS)
}

/// Get bind address from environment or use default
pub fn get_bind_addr() -> String {
    std::env::var("FORENSIC_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
}

/// Get anomaly model override path from environment (None = embedded defaults)
pub fn get_model_path() -> Option<String> {
    std::env::var("FORENSIC_MODEL_PATH").ok().filter(|s| !s.is_empty())
}
