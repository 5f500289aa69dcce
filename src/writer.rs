//! Ordered background writer.
//!
//! [`StatsWriter`] owns a single worker thread fed by an
//! [`mpsc`](std::sync::mpsc) channel.  Rows are handed to every registered
//! [`StatsLogConsumer`] and then to the [`StatsSink`] strictly in the order
//! they were submitted, so a drop never overtakes the drag that preceded it.
//!
//! The sink is flushed whenever the queue runs empty, so a buffered sink
//! holds no rows while the writer is idle.
//!
//! Producers hold a cheap, cloneable [`WriterHandle`].

use crate::row::LoggedRow;
use crate::traits::{StatsLogConsumer, StatsSink};
use log::{debug, error, info};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

/// Errors from the background writer.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// The worker has shut down; nothing more can be queued.
    #[error("stats writer is closed")]
    Closed,
    #[error("failed to spawn writer thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug)]
enum Job {
    Row(LoggedRow),
    Flush(mpsc::Sender<()>),
    Shutdown,
}

type ConsumerList = Arc<RwLock<Vec<Arc<dyn StatsLogConsumer>>>>;

/// Producer side of the writer queue.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<Job>,
}

impl WriterHandle {
    /// Queue a row behind every row submitted before it.
    pub fn submit(&self, row: LoggedRow) -> Result<(), WriterError> {
        self.tx.send(Job::Row(row)).map_err(|_| WriterError::Closed)
    }
}

/// Owner of the worker thread.
///
/// Dropping the writer queues a shutdown behind all pending rows and joins
/// the worker once they have been written.  Rows that other handles queue
/// behind the shutdown are still written; once the worker has stopped,
/// [`WriterHandle::submit`] fails with [`WriterError::Closed`].
pub struct StatsWriter {
    tx: mpsc::Sender<Job>,
    consumers: ConsumerList,
    worker: Option<JoinHandle<()>>,
}

impl StatsWriter {
    /// Start the worker thread writing into `sink`.
    pub fn spawn<S: StatsSink + 'static>(sink: S) -> Result<Self, WriterError> {
        let (tx, rx) = mpsc::channel::<Job>();
        let consumers: ConsumerList = Arc::new(RwLock::new(Vec::new()));
        let worker_consumers = Arc::clone(&consumers);
        let worker = std::thread::Builder::new()
            .name("statslog-writer".into())
            .spawn(move || run_worker(sink, rx, worker_consumers))?;
        Ok(Self {
            tx,
            consumers,
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> WriterHandle {
        WriterHandle {
            tx: self.tx.clone(),
        }
    }

    /// Register an observer that sees every subsequent row before the sink.
    pub fn add_consumer(&self, consumer: Arc<dyn StatsLogConsumer>) {
        self.consumers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(consumer);
    }

    /// Block until every row submitted so far has been written.
    pub fn flush(&self) -> Result<(), WriterError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.tx
            .send(Job::Flush(ack_tx))
            .map_err(|_| WriterError::Closed)?;
        ack_rx.recv().map_err(|_| WriterError::Closed)
    }

    /// Write all pending rows and stop the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.tx.send(Job::Shutdown);
            if worker.join().is_err() {
                error!("writer thread panicked");
            }
        }
    }
}

impl Drop for StatsWriter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<S: StatsSink>(mut sink: S, rx: mpsc::Receiver<Job>, consumers: ConsumerList) {
    debug!("writer started");
    let mut next = None;
    loop {
        let job = match next.take() {
            Some(job) => job,
            None => match rx.recv() {
                Ok(job) => job,
                Err(_) => break,
            },
        };
        match job {
            Job::Row(logged) => {
                write_row(&mut sink, &consumers, &logged);
                match rx.try_recv() {
                    Ok(job) => next = Some(job),
                    Err(TryRecvError::Empty) => flush_sink(&mut sink),
                    Err(TryRecvError::Disconnected) => break,
                }
            }
            Job::Flush(ack) => {
                flush_sink(&mut sink);
                let _ = ack.send(());
            }
            Job::Shutdown => {
                // Other handles may have queued rows behind the shutdown.
                for job in rx.try_iter() {
                    match job {
                        Job::Row(logged) => write_row(&mut sink, &consumers, &logged),
                        Job::Flush(ack) => {
                            flush_sink(&mut sink);
                            let _ = ack.send(());
                        }
                        Job::Shutdown => {}
                    }
                }
                break;
            }
        }
    }
    drop(rx);
    flush_sink(&mut sink);
    info!("writer stopped");
}

fn write_row<S: StatsSink>(sink: &mut S, consumers: &ConsumerList, logged: &LoggedRow) {
    // Snapshot so registration never blocks on a slow consumer.
    let snapshot: Vec<_> = consumers
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone();
    for consumer in &snapshot {
        consumer.consume(&logged.event, &logged.record, &logged.row);
    }
    if let Err(e) = sink.write(&logged.row) {
        error!("sink write failed: {}", e);
    }
}

fn flush_sink<S: StatsSink>(sink: &mut S) {
    if let Err(e) = sink.flush() {
        error!("sink flush failed: {}", e);
    }
}
