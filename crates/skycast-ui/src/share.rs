//! Share action: platform share sheet first, clipboard as fallback.

use std::time::{Duration, Instant};

use crate::capabilities::{Clipboard, ShareError, Sharer};

/// How long the "copied" acknowledgment stays visible.
pub const COPIED_ACK: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    /// User dismissed the share sheet; nothing else happens
    Aborted,
    /// Both share and clipboard failed (logged only)
    Failed,
}

#[derive(Debug, Default)]
pub struct ShareController {
    copied_until: Option<Instant>,
}

impl ShareController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn share(
        &mut self,
        title: &str,
        text: &str,
        sharer: Option<&dyn Sharer>,
        clipboard: &dyn Clipboard,
        now: Instant,
    ) -> ShareOutcome {
        if let Some(sharer) = sharer {
            match sharer.share(title, text).await {
                Ok(()) => return ShareOutcome::Shared,
                Err(ShareError::Aborted) => return ShareOutcome::Aborted,
                Err(e) => tracing::error!("Share failed, copying instead: {}", e),
            }
        }

        match clipboard.write_text(text).await {
            Ok(()) => {
                self.copied_until = Some(now + COPIED_ACK);
                ShareOutcome::Copied
            }
            Err(e) => {
                tracing::error!("Could not copy to clipboard: {}", e);
                ShareOutcome::Failed
            }
        }
    }

    /// Whether the "copied" acknowledgment is showing at `now`.
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::capabilities::testing::{MockClipboard, MockSharer};

    #[tokio::test]
    async fn test_platform_share_wins() {
        let sharer = MockSharer::returning(Ok(()));
        let clipboard = MockClipboard::default();
        let mut controller = ShareController::new();
        let now = Instant::now();

        let outcome = controller
            .share("Thông tin thời tiết", "text", Some(&sharer), &clipboard, now)
            .await;

        assert_eq!(outcome, ShareOutcome::Shared);
        assert_eq!(sharer.shared.lock()[0].0, "Thông tin thời tiết");
        assert!(clipboard.written.lock().is_empty());
        assert!(!controller.is_copied(now));
    }

    #[tokio::test]
    async fn test_abort_does_not_fall_back() {
        let sharer = MockSharer::returning(Err(ShareError::Aborted));
        let clipboard = MockClipboard::default();
        let mut controller = ShareController::new();

        let outcome = controller
            .share("t", "text", Some(&sharer), &clipboard, Instant::now())
            .await;

        assert_eq!(outcome, ShareOutcome::Aborted);
        assert!(clipboard.written.lock().is_empty());
    }

    #[tokio::test]
    async fn test_share_failure_copies() {
        let sharer = MockSharer::returning(Err(ShareError::Failed("no target".into())));
        let clipboard = MockClipboard::default();
        let mut controller = ShareController::new();
        let now = Instant::now();

        let outcome = controller
            .share("t", "text", Some(&sharer), &clipboard, now)
            .await;

        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(*clipboard.written.lock(), vec!["text".to_string()]);
        assert!(controller.is_copied(now + Duration::from_millis(1999)));
        assert!(!controller.is_copied(now + Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_no_sharer_copies() {
        let clipboard = MockClipboard::default();
        let mut controller = ShareController::new();

        let outcome = controller
            .share("t", "text", None, &clipboard, Instant::now())
            .await;

        assert_eq!(outcome, ShareOutcome::Copied);
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_soft() {
        let clipboard = MockClipboard {
            fail: true,
            ..MockClipboard::default()
        };
        let mut controller = ShareController::new();
        let now = Instant::now();

        let outcome = controller.share("t", "text", None, &clipboard, now).await;

        assert_eq!(outcome, ShareOutcome::Failed);
        assert!(!controller.is_copied(now));
    }
}
