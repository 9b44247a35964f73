//! Tasks and result handles.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{Receiver, TryRecvError};
use stash_engine::Delegate;

use crate::error::TaskError;

/// A unit of work: a `Send` delegate taking and returning nothing.
pub type Task = Delegate<dyn FnMut() + Send>;

/// Receiving end for the result of a task built by [`make_task`].
#[derive(Debug)]
pub struct TaskHandle<R> {
    reply: Receiver<Result<R, TaskError>>,
}

impl<R> TaskHandle<R> {
    /// Block until the task has run.
    ///
    /// Returns [`TaskError::Cancelled`] if the task was dropped first.
    pub fn join(self) -> Result<R, TaskError> {
        self.reply.recv().unwrap_or(Err(TaskError::Cancelled))
    }

    /// The result if the task has finished, without blocking.
    pub fn try_join(&self) -> Option<Result<R, TaskError>> {
        match self.reply.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Cancelled)),
        }
    }
}

/// Wrap a one-shot closure as a [`Task`] paired with a handle to its result.
///
/// The task runs `f` on its first invocation only. A panic inside `f` is
/// caught and delivered as [`TaskError::Panicked`]; dropping the task
/// without running it delivers [`TaskError::Cancelled`].
pub fn make_task<F, R>(f: F) -> (Task, TaskHandle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
    let mut job = Some(f);
    let task = Task::new(move || {
        let Some(job) = job.take() else {
            return;
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(job)).map_err(|payload| {
            TaskError::Panicked {
                message: panic_message(payload.as_ref()),
            }
        });
        // The handle may already be gone; the result is then discarded.
        let _ = reply_tx.send(outcome);
    });
    (task, TaskHandle { reply: reply_rx })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_once_and_delivers_result() {
        let (mut task, handle) = make_task(|| String::from("done"));
        assert_eq!(handle.try_join(), None);
        task.call().unwrap();
        task.call().unwrap();
        assert_eq!(handle.join(), Ok(String::from("done")));
    }

    #[test]
    fn panic_becomes_error() {
        let (mut task, handle) = make_task(|| -> u8 { panic!("bad input") });
        task.call().unwrap();
        assert_eq!(
            handle.join(),
            Err(TaskError::Panicked {
                message: "bad input".to_string()
            })
        );
    }

    #[test]
    fn dropped_task_cancels() {
        let (task, handle) = make_task(|| 1);
        drop(task);
        assert_eq!(handle.join(), Err(TaskError::Cancelled));
    }

    #[test]
    fn formatted_panic_message() {
        let (mut task, handle) = make_task(|| -> u8 { panic!("code {}", 7) });
        task.call().unwrap();
        assert_eq!(
            handle.join(),
            Err(TaskError::Panicked {
                message: "code 7".to_string()
            })
        );
    }
}
