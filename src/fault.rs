use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use teloxide::error_handlers::ErrorHandler;
use teloxide::types::ChatId;
use tracing::{error, warn};

use crate::platform::{Replier, Reply};

pub const SOMETHING_WENT_WRONG: &str = "Sorry, something went wrong. Please try again later.";

/// Error returned by command handlers, tagged with the chat it came from so
/// the user can be told something failed.
#[derive(Debug)]
pub struct HandlerError {
    pub chat_id: Option<ChatId>,
    pub source: anyhow::Error,
}

impl HandlerError {
    pub fn new(source: impl Into<anyhow::Error>, chat_id: Option<ChatId>) -> Self {
        Self {
            chat_id,
            source: source.into(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.source)
    }
}

/// Dispatcher error handler. Logs the failure and, when the chat is known,
/// sends a generic notice. Errors end here.
pub struct FaultReporter<R> {
    replier: R,
}

impl<R: Replier> FaultReporter<R> {
    pub fn new(replier: R) -> Arc<Self> {
        Arc::new(Self { replier })
    }

    pub async fn report(&self, error: HandlerError) {
        let Some(chat_id) = error.chat_id else {
            error!("Exception while handling an update: {}", error);
            return;
        };

        error!(
            chat_id = chat_id.0,
            "Exception while handling an update: {}", error
        );

        if let Err(e) = self
            .replier
            .send_reply(chat_id, &Reply::plain(SOMETHING_WENT_WRONG), None)
            .await
        {
            warn!(chat_id = chat_id.0, "Failed to notify chat about error: {:#}", e);
        }
    }
}

impl<R: Replier + 'static> ErrorHandler<HandlerError> for FaultReporter<R> {
    fn handle_error(self: Arc<Self>, error: HandlerError) -> BoxFuture<'static, ()> {
        Box::pin(async move { self.report(error).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::RecordingReplier;
    use crate::platform::RenderMode;

    #[tokio::test]
    async fn test_notifies_known_chat_once() {
        let reporter = FaultReporter::new(RecordingReplier::default());

        reporter
            .report(HandlerError::new(anyhow::anyhow!("boom"), Some(ChatId(42))))
            .await;

        let sent = reporter.replier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ChatId(42));
        assert_eq!(sent[0].1.text, SOMETHING_WENT_WRONG);
        assert_eq!(sent[0].1.mode, RenderMode::Plain);
    }

    #[tokio::test]
    async fn test_without_chat_only_logs() {
        let reporter = FaultReporter::new(RecordingReplier::default());

        reporter
            .report(HandlerError::new(anyhow::anyhow!("boom"), None))
            .await;

        assert!(reporter.replier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_notice_failure_is_swallowed() {
        let reporter = FaultReporter::new(RecordingReplier::failing(usize::MAX));

        reporter
            .report(HandlerError::new(anyhow::anyhow!("boom"), Some(ChatId(-7))))
            .await;

        assert!(reporter.replier.sent().is_empty());
        assert_eq!(reporter.replier.attempts(), 1);
    }

    #[tokio::test]
    async fn test_handle_error_goes_through_trait() {
        let reporter = FaultReporter::new(RecordingReplier::default());

        reporter
            .clone()
            .handle_error(HandlerError::new(anyhow::anyhow!("boom"), Some(ChatId(1))))
            .await;

        assert_eq!(reporter.replier.sent().len(), 1);
    }

    #[test]
    fn test_display_includes_context_chain() {
        let err = anyhow::anyhow!("connection reset").context("Failed to send");
        let handler_err = HandlerError::new(err, None);
        assert_eq!(handler_err.to_string(), "Failed to send: connection reset");
    }
}
