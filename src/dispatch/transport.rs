//! Bus transport: poll a subscriber and run every message on its own thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, warn};

use super::service::Service;
use crate::bus::{Message, PublishError, Subscriber};

/// Counters from a running transport.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransportStats {
    /// Messages taken off the bus.
    pub received: usize,
    /// Messages whose handler returned a response.
    pub handled: usize,
    /// Messages whose handler (or reply publication) failed.
    pub failed: usize,
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicUsize,
    handled: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> TransportStats {
        TransportStats {
            received: self.received.load(Ordering::SeqCst),
            handled: self.handled.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Handle to a background transport thread. Drop or call `stop()` to shut down.
///
/// Stopping ends polling only; workers already running finish on their own.
pub struct TransportHandle {
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl TransportHandle {
    /// Current counters.
    pub fn stats(&self) -> TransportStats {
        self.counters.snapshot()
    }

    /// Stop the transport and wait for the polling thread to finish. Returns stats.
    pub fn stop(mut self) -> TransportStats {
        let _ = self.stop_tx.send(());
        self.wait()
    }

    /// Block until the polling thread ends on its own (bus closed). Returns stats.
    pub fn join(mut self) -> TransportStats {
        self.wait()
    }

    fn wait(&mut self) -> TransportStats {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("transport thread panicked");
            }
        }
        self.counters.snapshot()
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Start consuming `subscriber` and dispatching every message to `service`.
///
/// Each received message is handed to a fresh thread; the polling loop never
/// waits for it and there is no concurrency limit. The loop ends when the
/// handle is stopped or the subscriber reports `PublishError::Closed`.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use availability_gateway::bus::{InMemoryQueue, Message, Publisher};
/// use availability_gateway::dispatch::{self, Response, Service};
///
/// let queue = InMemoryQueue::new();
/// let service = Arc::new(
///     Service::new((), queue.clone()).route("ping", Some("pong"), |_| Ok(Response::ok("pong"))),
/// );
///
/// let handle = dispatch::subscribe(
///     service,
///     queue.subscribe_to(&["ping"]),
///     Duration::from_millis(10),
/// );
/// queue.publish(Message::with_string_payload("ping", "{}")).unwrap();
///
/// std::thread::sleep(Duration::from_millis(200));
/// let stats = handle.stop();
/// assert_eq!(stats.received, 1);
/// ```
pub fn subscribe<S, Sub>(
    service: Arc<Service<S>>,
    subscriber: Sub,
    poll_interval: Duration,
) -> TransportHandle
where
    S: Send + Sync + 'static,
    Sub: Subscriber + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel();
    let counters = Arc::new(Counters::default());
    let loop_counters = Arc::clone(&counters);

    let handle = thread::spawn(move || {
        let timeout_ms = poll_interval.as_millis() as u64;

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
                Err(mpsc::TryRecvError::Empty) => {}
            }

            match subscriber.poll(timeout_ms) {
                Ok(Some(message)) => {
                    loop_counters.received.fetch_add(1, Ordering::SeqCst);
                    spawn_worker(Arc::clone(&service), message, Arc::clone(&loop_counters));
                }
                Ok(None) => {}
                Err(PublishError::Closed) => {
                    warn!("bus closed, transport stopping");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "poll failed");
                    thread::sleep(poll_interval);
                }
            }
        }

        debug!("transport finished");
    });

    TransportHandle {
        stop_tx,
        handle: Some(handle),
        counters,
    }
}

fn spawn_worker<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
    message: Message,
    counters: Arc<Counters>,
) {
    let topic = message.topic.clone();
    let spawned = thread::Builder::new()
        .name("slot-request".into())
        .spawn(move || match service.handle(&message) {
            Ok(_) => {
                counters.handled.fetch_add(1, Ordering::SeqCst);
            }
            Err(_) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
            }
        });

    if let Err(e) = spawned {
        error!(topic = %topic, error = %e, "could not spawn request worker, message dropped");
    }
}
