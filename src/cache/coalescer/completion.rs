use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

/// Completion is the shared outcome of one physical operation.
///
/// Any number of callers can wait on the same `Completion`. Each waiter gets its own clone of the
/// outcome once [`Completion::done`] is invoked. The outcome and the registered wakers are guarded by
/// a single lock, so a waiter can not register itself after the wake-up has been delivered.
pub(crate) struct Completion<T: Clone> {
    state: Mutex<CompletionState<T>>,
}

struct CompletionState<T> {
    outcome: Option<T>,
    wakers: Vec<Waker>,
}

/// CompletionWaiter is the future returned by [`Completion::wait`].
pub(crate) struct CompletionWaiter<T: Clone> {
    completion: Arc<Completion<T>>,
}

impl<T: Clone> Completion<T> {
    pub(crate) fn new() -> Arc<Completion<T>> {
        Arc::new(Completion {
            state: Mutex::new(CompletionState {
                outcome: None,
                wakers: Vec::new(),
            })
        })
    }

    /// Stores the outcome and wakes every waiter. Only the first outcome is retained.
    pub(crate) fn done(&self, outcome: T) {
        let wakers = {
            let mut guard = self.state.lock();
            if guard.outcome.is_some() {
                return;
            }
            guard.outcome = Some(outcome);
            std::mem::take(&mut guard.wakers)
        };
        wakers.into_iter().for_each(Waker::wake);
    }

    pub(crate) fn wait(self: &Arc<Self>) -> CompletionWaiter<T> {
        CompletionWaiter { completion: self.clone() }
    }
}

impl<T: Clone> Future for CompletionWaiter<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let mut guard = self.completion.state.lock();
        if let Some(outcome) = guard.outcome.as_ref() {
            return Poll::Ready(outcome.clone());
        }
        if !guard.wakers.iter().any(|waker| waker.will_wake(context.waker())) {
            guard.wakers.push(context.waker().clone());
        }
        Poll::Pending
    }
}
