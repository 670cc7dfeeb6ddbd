//! Post-mount interactivity gate.
//!
//! Editing controls stay non-interactive for a fixed delay after a scope is
//! mounted. The timer is a tokio task aborted when the gate is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::warn;

pub const DEFAULT_MOUNT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct MountGate {
    open: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
}

impl MountGate {
    /// Start the delay on the current tokio runtime
    ///
    /// Outside a runtime there is no timer to wait on and the gate opens
    /// immediately.
    pub fn start(delay: Duration) -> Self {
        if delay.is_zero() {
            return Self::opened();
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No tokio runtime for mount delay, opening immediately");
                return Self::opened();
            }
        };

        let open = Arc::new(AtomicBool::new(false));
        let flag = open.clone();
        let timer = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::Release);
        });

        Self {
            open,
            timer: Some(timer),
        }
    }

    pub fn opened() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
            timer: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Stop the timer; the gate stays in its current state
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for MountGate {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_opens_after_delay() {
        let gate = MountGate::start(Duration::from_millis(500));
        assert!(!gate.is_open());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!gate.is_open());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(gate.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_gate_never_opens() {
        let mut gate = MountGate::start(Duration::from_millis(500));
        let flag = gate.open.clone();
        gate.cancel();
        drop(gate);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!flag.load(Ordering::Acquire));
    }

    #[test]
    fn test_opens_immediately_without_runtime() {
        assert!(MountGate::start(Duration::from_millis(500)).is_open());
        assert!(MountGate::start(Duration::ZERO).is_open());
    }
}
