//! Publish delivery with acknowledgment and retry.
//!
//! A [`Publisher`] sends the session's publish event through a
//! [`PublishTransport`] and waits on a broadcast channel of inbound window
//! messages for the host's `publish-success`. Each attempt has its own
//! timeout; when every attempt times out the session is returned to
//! `Editing` with its dirty state intact.

use crate::config::PublishPolicy;
use crate::errors::PublishError;
use crate::message::{InboundMessage, PublishEvent};
use crate::session::EditSession;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Outbound side of the publish handshake
pub trait PublishTransport {
    fn send(&self, event: &PublishEvent) -> Result<(), PublishError>;
}

impl PublishTransport for mpsc::UnboundedSender<PublishEvent> {
    fn send(&self, event: &PublishEvent) -> Result<(), PublishError> {
        mpsc::UnboundedSender::send(self, event.clone())
            .map_err(|e| PublishError::Transport(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Per attempt; `None` waits until an acknowledgment or channel close
    pub timeout: Option<Duration>,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&PublishPolicy::default())
    }
}

impl From<&PublishPolicy> for RetryPolicy {
    fn from(policy: &PublishPolicy) -> Self {
        Self {
            timeout: policy.timeout(),
            max_attempts: policy.max_attempts.max(1),
        }
    }
}

pub struct Publisher<T> {
    transport: T,
    acks: broadcast::Receiver<InboundMessage>,
    policy: RetryPolicy,
}

impl<T: PublishTransport> Publisher<T> {
    pub fn new(
        transport: T,
        acks: broadcast::Receiver<InboundMessage>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            acks,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Publish the session's dirty regions and wait for the host to confirm
    ///
    /// Returns the number of attempts it took.
    pub async fn publish(&mut self, session: &mut EditSession) -> Result<u32, PublishError> {
        let event = session.publish()?;
        discard_stale(&mut self.acks);
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if let Err(e) = self.transport.send(&event) {
                session.publish_failed()?;
                return Err(e);
            }
            debug!(attempt, fields = event.fields.len(), "Sent publish event");

            let outcome = match self.policy.timeout {
                Some(timeout) => {
                    match tokio::time::timeout(timeout, wait_for_ack(&mut self.acks, session)).await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            warn!(attempt, ?timeout, "Publish not acknowledged in time");
                            continue;
                        }
                    }
                }
                None => wait_for_ack(&mut self.acks, session).await,
            };

            return match outcome {
                Ok(()) => {
                    info!(attempt, "Publish confirmed");
                    Ok(attempt)
                }
                Err(e) => {
                    session.publish_failed()?;
                    Err(e)
                }
            };
        }

        session.publish_failed()?;
        Err(PublishError::Unacknowledged {
            attempts: max_attempts,
        })
    }
}

/// Drop messages buffered before this publish so an acknowledgment meant for
/// an earlier one cannot confirm it
fn discard_stale(acks: &mut broadcast::Receiver<InboundMessage>) {
    let mut dropped = 0usize;
    loop {
        match acks.try_recv() {
            Ok(_) => dropped += 1,
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                dropped += skipped as usize;
            }
            Err(broadcast::error::TryRecvError::Empty)
            | Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }
    if dropped > 0 {
        debug!(dropped, "Discarded stale inbound messages");
    }
}

/// Feed inbound messages to the session until one acknowledges the publish
async fn wait_for_ack(
    acks: &mut broadcast::Receiver<InboundMessage>,
    session: &mut EditSession,
) -> Result<(), PublishError> {
    loop {
        match acks.recv().await {
            Ok(message) => {
                if session.handle_message(&message) {
                    return Ok(());
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Inbound message receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return Err(PublishError::ChannelClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::errors::SessionError;
    use resonance_content::{ContentRegistry, EditMode, RenderContext};
    use tokio::task::JoinHandle;

    const ORIGIN: &str = "https://site.example";

    fn dirty_session() -> EditSession {
        let config = EditorConfig {
            origin: ORIGIN.to_string(),
            mount_delay_ms: 0,
            ..EditorConfig::default()
        };
        let mut session =
            EditSession::new("page", ContentRegistry::new(Default::default(), true), &config);
        let ctx = RenderContext::new(EditMode::Editing);
        session.mount_region("hero").text(&ctx, "title", "Hello");
        session.change_field("hero.title", "Changed").unwrap();
        session
    }

    /// Collects every event and acknowledges from the `ack_on`-th onwards
    fn responder(
        mut events: mpsc::UnboundedReceiver<PublishEvent>,
        acks: broadcast::Sender<InboundMessage>,
        ack_on: Option<usize>,
        origin: &'static str,
    ) -> JoinHandle<Vec<PublishEvent>> {
        tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(event) = events.recv().await {
                seen.push(event);
                if ack_on.is_some_and(|n| seen.len() >= n) {
                    let _ = acks.send(InboundMessage::publish_success(origin));
                }
            }
            seen
        })
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            timeout: Some(Duration::from_secs(1)),
            max_attempts: attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_confirmed_first_attempt() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = broadcast::channel(16);
        let task = responder(rx, ack_tx, Some(1), ORIGIN);

        let mut session = dirty_session();
        let mut publisher = Publisher::new(tx, ack_rx, policy(3));
        assert_eq!(publisher.publish(&mut session).await.unwrap(), 1);

        assert_eq!(session.mode(), EditMode::Editing);
        assert!(!session.is_dirty());

        drop(publisher);
        let events = task.await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fields.text("hero.title.value"), Some("Changed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_retries_after_timeout() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = broadcast::channel(16);
        let task = responder(rx, ack_tx, Some(2), ORIGIN);

        let mut session = dirty_session();
        let mut publisher = Publisher::new(tx, ack_rx, policy(3));
        assert_eq!(publisher.publish(&mut session).await.unwrap(), 2);
        assert!(!session.is_dirty());

        drop(publisher);
        assert_eq!(task.await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_gives_up_and_keeps_dirty() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = broadcast::channel(16);
        let task = responder(rx, ack_tx, Some(1), "https://evil.example");

        let mut session = dirty_session();
        let mut publisher = Publisher::new(tx, ack_rx, policy(2));
        let err = publisher.publish(&mut session).await.unwrap_err();
        assert!(matches!(err, PublishError::Unacknowledged { attempts: 2 }));

        assert_eq!(session.mode(), EditMode::Editing);
        assert!(session.is_dirty());

        drop(publisher);
        assert_eq!(task.await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_buffered_ack_does_not_confirm_next_publish() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = broadcast::channel(16);
        ack_tx.send(InboundMessage::publish_success(ORIGIN)).unwrap();
        ack_tx.send(InboundMessage::publish_success(ORIGIN)).unwrap();

        let mut session = dirty_session();
        let mut publisher = Publisher::new(tx, ack_rx, policy(1));
        assert!(matches!(
            publisher.publish(&mut session).await,
            Err(PublishError::Unacknowledged { attempts: 1 })
        ));
        assert_eq!(session.mode(), EditMode::Editing);
        assert!(session.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_ack_left_over_from_retry_is_ignored() {
        let (tx, mut rx) = mpsc::unbounded_channel::<PublishEvent>();
        let (ack_tx, ack_rx) = broadcast::channel(16);

        let mut session = dirty_session();
        let mut publisher = Publisher::new(tx, ack_rx, policy(1));

        let host = ack_tx.clone();
        let first = tokio::spawn(async move {
            rx.recv().await;
            let _ = host.send(InboundMessage::publish_success(ORIGIN));
            let _ = host.send(InboundMessage::publish_success(ORIGIN));
            rx
        });
        assert_eq!(publisher.publish(&mut session).await.unwrap(), 1);
        let _rx = first.await.unwrap();

        session.change_field("hero.title", "Again").unwrap();
        assert!(matches!(
            publisher.publish(&mut session).await,
            Err(PublishError::Unacknowledged { attempts: 1 })
        ));
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_publish_reports_closed_channel() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = broadcast::channel::<InboundMessage>(16);
        drop(ack_tx);

        let mut session = dirty_session();
        let mut publisher = Publisher::new(
            tx,
            ack_rx,
            RetryPolicy {
                timeout: None,
                max_attempts: 1,
            },
        );
        assert!(matches!(
            publisher.publish(&mut session).await,
            Err(PublishError::ChannelClosed)
        ));
        assert_eq!(session.mode(), EditMode::Editing);
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_publish_reports_transport_failure() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let (_ack_tx, ack_rx) = broadcast::channel(16);

        let mut session = dirty_session();
        let mut publisher = Publisher::new(tx, ack_rx, policy(3));
        assert!(matches!(
            publisher.publish(&mut session).await,
            Err(PublishError::Transport(_))
        ));
        assert_eq!(session.mode(), EditMode::Editing);
    }

    #[tokio::test]
    async fn test_publish_without_changes_is_refused() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (_ack_tx, ack_rx) = broadcast::channel(16);

        let mut session = EditSession::new(
            "page",
            ContentRegistry::new(Default::default(), true),
            &EditorConfig::default(),
        );
        session.mount_region("hero");

        let mut publisher = Publisher::new(tx, ack_rx, policy(1));
        assert!(matches!(
            publisher.publish(&mut session).await,
            Err(PublishError::Session(SessionError::NothingToPublish))
        ));

        drop(publisher);
        let mut rx = rx;
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let policy = RetryPolicy::from(&PublishPolicy {
            timeout_ms: None,
            max_attempts: 0,
        });
        assert_eq!(policy.timeout, None);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(RetryPolicy::default().timeout, Some(Duration::from_secs(10)));
    }
}
