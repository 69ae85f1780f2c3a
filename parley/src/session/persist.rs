//! Background store writes for a session.
//!
//! Each save runs as its own tokio task so the Busy/Idle gate never waits on the
//! store. Failures are logged when they happen and kept until [`PersistQueue::flush`].
//! Outside a tokio runtime a save cannot be spawned; it is recorded as a failure.

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::warn;

use crate::conversation::ConversationStore;
use crate::message::Message;

/// A save that did not reach the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistFailure {
    /// Id of the session message; empty when the task itself died.
    pub message_id: String,
    pub error: String,
}

#[derive(Default)]
pub struct PersistQueue {
    tasks: JoinSet<Result<(), PersistFailure>>,
    failures: Vec<PersistFailure>,
}

impl PersistQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns one save on the current tokio runtime. Without one the save is not
    /// attempted and a [`PersistFailure`] is recorded instead.
    pub fn enqueue(&mut self, store: ConversationStore, user_id: String, message: Message) {
        self.reap();
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(message_id = %message.id, "conversation store save skipped: {}", e);
                self.failures.push(PersistFailure {
                    message_id: message.id,
                    error: format!("no tokio runtime: {}", e),
                });
                return;
            }
        };
        let save = async move {
            store.save(&user_id, &message).await.map_err(|e| {
                warn!(message_id = %message.id, "conversation store save failed: {}", e);
                PersistFailure {
                    message_id: message.id.clone(),
                    error: e.to_string(),
                }
            })
        };
        self.tasks.spawn_on(save, &handle);
    }

    /// Failures recorded so far that have not been returned by [`PersistQueue::flush`].
    pub fn failed(&self) -> &[PersistFailure] {
        &self.failures
    }

    /// Saves not yet joined.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Awaits every outstanding save and returns all failures seen since the last flush.
    pub async fn flush(&mut self) -> Vec<PersistFailure> {
        while let Some(joined) = self.tasks.join_next().await {
            self.record(joined);
        }
        std::mem::take(&mut self.failures)
    }

    /// Collects finished saves without waiting.
    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            self.record(joined);
        }
    }

    fn record(&mut self, joined: Result<Result<(), PersistFailure>, tokio::task::JoinError>) {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(failure)) => self.failures.push(failure),
            Err(e) => {
                warn!("conversation store save task failed: {}", e);
                self.failures.push(PersistFailure {
                    message_id: String::new(),
                    error: e.to_string(),
                });
            }
        }
    }
}
