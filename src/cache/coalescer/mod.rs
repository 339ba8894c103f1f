use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::debug;

use crate::cache::coalescer::completion::{Completion, CompletionWaiter};
use crate::cache::errors::CacheError;
use crate::cache::types::{IsNewlyStarted, Payload};

pub(crate) mod completion;

/// OperationOutcome tags the kind of the physical operation that produced a result.
///
/// A caller may attach to an operation of a different kind than it asked for (a read attaching to a write),
/// in which case it branches on the tag to decide whether to re-issue its own request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum OperationOutcome {
    /// The payload of the entry, `None` if no entry file exists.
    ReadCompleted(Option<Payload>),
    WriteCompleted,
}

pub(crate) type OperationResult = Result<OperationOutcome, CacheError>;

type InFlightOperations = DashMap<String, InFlightOperation>;

/// InFlightOperation is the registration of a physical operation: the file it targets and its completion.
#[derive(Clone)]
struct InFlightOperation {
    path: PathBuf,
    completion: Arc<Completion<OperationResult>>,
}

/// RequestCoalescer guarantees that at most one physical operation per key is in flight.
///
/// The first caller for a key registers a new operation and gets an [`OperationTicket`] to start it with.
/// Every caller arriving while that operation is registered attaches to it and receives its result,
/// including its failure. The registration is removed when the operation finishes (success or failure),
/// so the next caller starts a fresh operation.
pub(crate) struct RequestCoalescer {
    in_flight: Arc<InFlightOperations>,
}

/// Submission is the result of [`RequestCoalescer::submit`]: the operation the caller waits on, the file
/// it targets and whether the caller started it.
pub(crate) struct Submission {
    operation: InFlightOperation,
    newly_started: IsNewlyStarted,
}

/// OperationTicket is handed to the starter of a newly registered operation. The physical operation must
/// eventually call [`OperationTicket::finish`]; dropping an unfinished ticket finishes it with
/// [`CacheError::Shutdown`] so the attached callers never wait forever.
pub(crate) struct OperationTicket {
    key: String,
    operation: &'static str,
    completion: Arc<Completion<OperationResult>>,
    in_flight: Arc<InFlightOperations>,
    finished: bool,
}

impl RequestCoalescer {
    pub(crate) fn new() -> Self {
        RequestCoalescer { in_flight: Arc::new(DashMap::new()) }
    }

    /// Registers a new operation on `path` for the key if none is in flight and invokes `start` with its ticket,
    /// otherwise attaches to the in-flight operation, whichever path it targets.
    /// `start` is invoked without holding any lock of the map, it may finish the ticket synchronously.
    pub(crate) fn submit<Start>(&self, key: &str, path: &Path, operation: &'static str, start: Start) -> Submission
        where Start: FnOnce(OperationTicket) {
        let registered = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!("{} for key {:?} attached to an in-flight operation on {:?}", operation, key, entry.get().path);
                return Submission { operation: entry.get().clone(), newly_started: false };
            }
            Entry::Vacant(entry) => {
                let registered = InFlightOperation { path: path.to_path_buf(), completion: Completion::new() };
                entry.insert(registered.clone());
                registered
            }
        };

        start(OperationTicket {
            key: key.to_string(),
            operation,
            completion: registered.completion.clone(),
            in_flight: self.in_flight.clone(),
            finished: false,
        });
        Submission { operation: registered, newly_started: true }
    }

    pub(crate) fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

impl Submission {
    pub(crate) fn is_newly_started(&self) -> IsNewlyStarted {
        self.newly_started
    }

    /// Returns true if the operation waited on targets `path`. An attached submission may target a file
    /// resolved before the working directory was rotated.
    pub(crate) fn targets(&self, path: &Path) -> bool {
        self.operation.path == path
    }

    pub(crate) fn wait(&self) -> CompletionWaiter<OperationResult> {
        self.operation.completion.wait()
    }
}

impl OperationTicket {
    /// Unregisters the operation and then delivers the result to every waiter.
    /// The registration is removed only if it still belongs to this operation.
    pub(crate) fn finish(mut self, result: OperationResult) {
        self.complete(result);
    }

    fn complete(&mut self, result: OperationResult) {
        self.finished = true;
        self.in_flight.remove_if(&self.key, |_key, registered| Arc::ptr_eq(&registered.completion, &self.completion));
        self.completion.done(result);
    }
}

impl Drop for OperationTicket {
    fn drop(&mut self) {
        if !self.finished {
            debug!("{} for key {:?} dropped before finishing", self.operation, self.key);
            let operation = self.operation;
            self.complete(Err(CacheError::Shutdown(operation)));
        }
    }
}
