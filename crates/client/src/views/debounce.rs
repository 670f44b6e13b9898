use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Trailing-edge debouncer: a value is published once `delay` has passed
/// without a newer one arriving. Only the last value of a burst is seen.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    settled: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, mut rx) = mpsc::unbounded_channel::<T>();
        let (tx, settled) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while let Some(mut value) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(newer) => value = newer,
                            None => {
                                tx.send_replace(value);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                tx.send_replace(value);
            }
        });

        Self {
            input,
            settled,
            task,
        }
    }

    /// Queues `value`, restarting the delay.
    pub fn push(&self, value: T) {
        // Only fails once the task is gone, when nobody is listening anyway.
        let _ = self.input.send(value);
    }

    /// The last value that settled.
    pub fn current(&self) -> T {
        self.settled.borrow().clone()
    }

    /// Receiver notified each time a value settles.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.settled.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
