//! Contract for the external application session.
//!
//! A session is a single request/response channel to a running KisekaeII
//! instance. Requests are issued one at a time, which is why every method
//! takes `&mut self`. This crate only defines the shape; transports live
//! elsewhere.

use crate::error::Result;
use async_trait::async_trait;
use kisekae_formats::{Code, FastloadEntry};
use serde::{Deserialize, Serialize};

/// Screenshot parameters for one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Zero-based character slot to capture
    pub character: usize,
    /// Resolution scale factor
    pub scale: Option<f32>,
    /// Faster but larger image encoding
    pub fast: bool,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            character: 0,
            scale: None,
            fast: true,
        }
    }
}

/// A connected application session
#[async_trait]
pub trait Session: Send {
    /// Upload and apply a full code; `false` when the application refused it
    async fn apply_code(&mut self, code: &str) -> Result<bool>;

    /// Apply fastload entries to one character; `false` when refused
    async fn apply_to_character(
        &mut self,
        character: usize,
        entries: &[FastloadEntry],
        version: i32,
    ) -> Result<bool>;

    /// Capture an image of one character
    async fn capture_image(&mut self, request: &CaptureRequest) -> Result<Vec<u8>>;

    /// End the session
    async fn close(&mut self) -> Result<()>;
}

/// Copy the character at `source` in `code` onto the application's
/// character at `target` through the fastload path
pub async fn apply_character<S: Session + ?Sized>(
    session: &mut S,
    code: &Code,
    source: usize,
    target: usize,
    include_empty: bool,
) -> Result<bool> {
    let entries = code.fastload_list(source, include_empty);
    session
        .apply_to_character(target, &entries, code.version)
        .await
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{MockSession, fixture_registry};

    #[tokio::test]
    async fn test_apply_character_sends_fastload_list() {
        let registry = fixture_registry();
        let code = Code::parse("105***0*aa1.2*0*0*0*0*0*0*0#/]ua1", &registry).unwrap();
        let mut session = MockSession::default();

        let applied = apply_character(&mut session, &code, 1, 4, false).await.unwrap();

        assert!(applied);
        let (character, entries, version) = &session.fastloads[0];
        assert_eq!(*character, 4);
        assert_eq!(*version, 105);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value, "2");
    }

    #[test]
    fn test_capture_defaults() {
        let request = CaptureRequest::default();
        assert_eq!(request.character, 0);
        assert!(request.fast);
        assert!(request.scale.is_none());
    }
}
