//! Media Sample
//!
//! The unit of work handed to an analysis session. Validation of the
//! type/size invariant happens at the boundary before a sample is built.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::constants::MAX_SAMPLE_BYTES;

/// One uploaded media sample, fully buffered in memory.
///
/// Immutable after construction; each session owns exactly one.
#[derive(Debug, Clone)]
pub struct MediaSample {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl MediaSample {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    /// SHA-256 digest of the raw bytes, hex encoded.
    ///
    /// Identifies the sample in logs without retaining content.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }

    /// Check the boundary invariant: accepted MIME class and size cap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_image() && !self.is_video() {
            return Err(ValidationError::UnsupportedType(self.mime_type.clone()));
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::Empty);
        }
        if self.bytes.len() > MAX_SAMPLE_BYTES {
            return Err(ValidationError::TooLarge {
                size: self.bytes.len(),
                limit: MAX_SAMPLE_BYTES,
            });
        }
        Ok(())
    }

    /// Short identity string for log lines.
    pub fn describe(&self) -> String {
        format!(
            "{} ({}, {} bytes, sha256:{})",
            self.filename,
            self.mime_type,
            self.bytes.len(),
            &self.digest()[..12]
        )
    }
}

/// Boundary rejection: bad type or size, never retried.
#[derive(Debug, Clone, Serialize)]
pub enum ValidationError {
    UnsupportedType(String),
    TooLarge { size: usize, limit: usize },
    Empty,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType(mime) => {
                write!(f, "Unsupported media type: {} (expected image/* or video/*)", mime)
            }
            Self::TooLarge { size, limit } => {
                write!(f, "Sample too large: {} bytes (limit {} bytes)", size, limit)
            }
            Self::Empty => write!(f, "Sample is empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_image_and_video_types() {
        let img = MediaSample::new(vec![0u8; 16], "image/png", "a.png");
        assert!(img.validate().is_ok());
        assert!(img.is_image());

        let vid = MediaSample::new(vec![0u8; 16], "video/mp4", "a.mp4");
        assert!(vid.validate().is_ok());
        assert!(vid.is_video());
    }

    #[test]
    fn test_rejects_other_types() {
        let pdf = MediaSample::new(vec![0u8; 16], "application/pdf", "a.pdf");
        assert!(matches!(
            pdf.validate(),
            Err(ValidationError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_sample() {
        let big = MediaSample::new(vec![0u8; MAX_SAMPLE_BYTES + 1], "image/png", "big.png");
        assert!(matches!(big.validate(), Err(ValidationError::TooLarge { .. })));
    }

    #[test]
    fn test_rejects_empty_sample() {
        let empty = MediaSample::new(Vec::new(), "image/png", "empty.png");
        assert!(matches!(empty.validate(), Err(ValidationError::Empty)));
    }

    #[test]
    fn test_digest_is_stable() {
        let a = MediaSample::new(vec![1, 2, 3], "image/png", "a.png");
        let b = MediaSample::new(vec![1, 2, 3], "image/png", "b.png");
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }
}
