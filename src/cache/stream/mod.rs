use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use crate::cache::coalescer::{OperationOutcome, OperationTicket};
use crate::cache::errors::CacheError;
use crate::cache::executor::{IoJob, JobProgress};
use crate::cache::stats::ConcurrentStatsCounter;
use crate::cache::types::{BufferSize, Payload};

/// StreamStore moves payloads between files and memory through a buffer of `buffer_size` bytes.
///
/// Reads and writes are produced as [`IoJob`]s: every step of a job transfers at most one chunk,
/// which is the unit at which an [`crate::cache::executor::IoExecutor`] interleaves jobs.
pub(crate) struct StreamStore {
    buffer_size: BufferSize,
    stats_counter: Arc<ConcurrentStatsCounter>,
}

impl StreamStore {
    pub(crate) fn new(buffer_size: BufferSize, stats_counter: Arc<ConcurrentStatsCounter>) -> Self {
        assert!(buffer_size > 0);
        StreamStore { buffer_size, stats_counter }
    }

    pub(crate) fn read(&self, path: PathBuf, ticket: OperationTicket) -> Box<dyn IoJob> {
        self.stats_counter.started_a_read();
        Box::new(ReadJob {
            path,
            file: None,
            payload: Vec::new(),
            chunk: vec![0; self.buffer_size],
            ticket: Some(ticket),
        })
    }

    pub(crate) fn write(&self, path: PathBuf, payload: Arc<Payload>, ticket: OperationTicket) -> Box<dyn IoJob> {
        self.stats_counter.started_a_write();
        Box::new(WriteJob {
            path,
            file: None,
            payload,
            offset: 0,
            buffer_size: self.buffer_size,
            ticket: Some(ticket),
        })
    }
}

/// ReadJob opens the file on its first step, then reads one chunk per step until a chunk shorter than
/// the buffer is read. A missing file completes the read with no payload.
struct ReadJob {
    path: PathBuf,
    file: Option<File>,
    payload: Payload,
    chunk: Vec<u8>,
    ticket: Option<OperationTicket>,
}

impl ReadJob {
    fn try_step(&mut self) -> io::Result<Option<OperationOutcome>> {
        let mut file = match self.file.take() {
            Some(file) => file,
            None => match File::open(&self.path) {
                Ok(file) => file,
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    debug!("no entry at {:?}", self.path);
                    return Ok(Some(OperationOutcome::ReadCompleted(None)));
                }
                Err(error) => return Err(error),
            }
        };

        let read = fill_chunk(&mut file, &mut self.chunk)?;
        self.payload.extend_from_slice(&self.chunk[..read]);
        if read < self.chunk.len() {
            return Ok(Some(OperationOutcome::ReadCompleted(Some(std::mem::take(&mut self.payload)))));
        }
        self.file = Some(file);
        Ok(None)
    }

    fn finish(&mut self, result: Result<OperationOutcome, CacheError>) -> JobProgress {
        if let Some(ticket) = self.ticket.take() {
            ticket.finish(result);
        }
        JobProgress::Finished
    }
}

impl IoJob for ReadJob {
    fn step(&mut self) -> JobProgress {
        match self.try_step() {
            Ok(None) => JobProgress::Pending,
            Ok(Some(outcome)) => self.finish(Ok(outcome)),
            Err(error) => self.finish(Err(CacheError::io("read_stream", &error))),
        }
    }
}

/// WriteJob creates (or truncates) the file on its first step, then writes one chunk of the payload per step.
/// A failure in between leaves a truncated file behind.
struct WriteJob {
    path: PathBuf,
    file: Option<File>,
    payload: Arc<Payload>,
    offset: usize,
    buffer_size: BufferSize,
    ticket: Option<OperationTicket>,
}

impl WriteJob {
    fn try_step(&mut self) -> io::Result<bool> {
        let mut file = match self.file.take() {
            Some(file) => file,
            None => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                File::create(&self.path)?
            }
        };

        let end = usize::min(self.offset + self.buffer_size, self.payload.len());
        file.write_all(&self.payload[self.offset..end])?;
        self.offset = end;

        if self.offset == self.payload.len() {
            file.flush()?;
            return Ok(true);
        }
        self.file = Some(file);
        Ok(false)
    }

    fn finish(&mut self, result: Result<OperationOutcome, CacheError>) -> JobProgress {
        if let Some(ticket) = self.ticket.take() {
            ticket.finish(result);
        }
        JobProgress::Finished
    }
}

impl IoJob for WriteJob {
    fn step(&mut self) -> JobProgress {
        match self.try_step() {
            Ok(false) => JobProgress::Pending,
            Ok(true) => self.finish(Ok(OperationOutcome::WriteCompleted)),
            Err(error) => self.finish(Err(CacheError::io("write_stream", &error))),
        }
    }
}

/// Reads until the chunk is full or the end of the file is reached, returning the number of bytes read.
fn fill_chunk(file: &mut File, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match file.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}
