//! Background work polled from the UI tick.
//!
//! A `Task<T>` runs one future on the tokio runtime and lets the event loop
//! check for its result without blocking:
//!
//! ```ignore
//! let gateway = gateway.clone();
//! let mut task = Task::spawn(async move { gateway.start().await });
//!
//! // In event loop tick
//! if task.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use color_eyre::Result;
use std::future::Future;
use tokio::sync::oneshot;

/// The state of a background task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState<T> {
  /// Still running
  Running,
  /// Finished with a value
  Done(T),
  /// Finished with an error
  Failed(String),
}

pub struct Task<T> {
  state: TaskState<T>,
  receiver: Option<oneshot::Receiver<Result<T>>>,
}

impl<T: Send + 'static> Task<T> {
  /// Start running `future` immediately.
  pub fn spawn<F>(future: F) -> Self
  where
    F: Future<Output = Result<T>> + Send + 'static,
  {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      // Receiver may have been dropped
      let _ = tx.send(future.await);
    });

    Self {
      state: TaskState::Running,
      receiver: Some(rx),
    }
  }

  pub fn state(&self) -> &TaskState<T> {
    &self.state
  }

  /// Check for a result. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };

    match receiver.try_recv() {
      Ok(Ok(value)) => self.finish(TaskState::Done(value)),
      Ok(Err(e)) => self.finish(TaskState::Failed(e.to_string())),
      Err(oneshot::error::TryRecvError::Empty) => false,
      Err(oneshot::error::TryRecvError::Closed) => {
        // Sender dropped without sending: the task panicked
        self.finish(TaskState::Failed("Task was cancelled".to_string()))
      }
    }
  }

  fn finish(&mut self, state: TaskState<T>) -> bool {
    self.state = state;
    self.receiver = None;
    true
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Task<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Task")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
