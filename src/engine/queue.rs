// src/engine/queue.rs

//! The single-consumer task queue.
//!
//! Any number of producers hold a cloned [`TaskQueue`]; one Tokio task owns
//! the [`TaskRunner`] and drains the queue strictly in order, running one
//! task at a time. Enqueueing never waits for the work to happen.

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::{BuildwebError, Result};

use super::runner::TaskRunner;
use super::{Task, TaskKind};

/// Messages flowing into the consumer.
#[derive(Debug, Clone)]
pub enum QueueMessage {
    /// One enqueue call: the caller's tasks followed by a `RestartProcess`.
    Batch(Vec<Task>),
    /// Stop the supervised process and end the consumer.
    Shutdown,
}

/// Producer handle for the task queue.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<QueueMessage>,
}

impl TaskQueue {
    /// Queue `tasks` in the given order, followed by one `RestartProcess`.
    ///
    /// The batch is delivered as a single message, so batches from
    /// concurrent producers never interleave.
    pub fn enqueue(&self, tasks: impl IntoIterator<Item = Task>) -> Result<()> {
        let mut batch: Vec<Task> = tasks.into_iter().collect();
        batch.push(Task::all(TaskKind::RestartProcess));
        self.send(QueueMessage::Batch(batch))
    }

    /// Ask the consumer to stop the backend and exit after the work already
    /// queued.
    pub fn shutdown(&self) -> Result<()> {
        self.send(QueueMessage::Shutdown)
    }

    fn send(&self, message: QueueMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| BuildwebError::Other(anyhow!("task queue consumer has exited")))
    }
}

/// Spawn the queue consumer around `runner`.
///
/// The returned handle resolves to the runner once the consumer ends, either
/// on [`TaskQueue::shutdown`] or when every `TaskQueue` has been dropped.
/// Only an explicit shutdown stops the supervised process.
pub fn spawn_task_runner(runner: TaskRunner) -> (TaskQueue, JoinHandle<TaskRunner>) {
    let (tx, rx) = mpsc::unbounded_channel::<QueueMessage>();
    let handle = tokio::spawn(consume(runner, rx));
    (TaskQueue { tx }, handle)
}

async fn consume(mut runner: TaskRunner, mut rx: mpsc::UnboundedReceiver<QueueMessage>) -> TaskRunner {
    info!("task runner started");

    while let Some(message) = rx.recv().await {
        match message {
            QueueMessage::Batch(tasks) => {
                let kinds: Vec<_> = tasks.iter().map(|t| t.kind()).collect();
                debug!(?kinds, "running task batch");

                runner.begin_cycle();
                for task in &tasks {
                    runner.execute(task).await;
                }
            }
            QueueMessage::Shutdown => {
                info!("shutdown requested; stopping app");
                runner.shutdown().await;
                break;
            }
        }
    }

    info!("task runner finished");
    runner
}
