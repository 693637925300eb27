//! Ordered delivery of no-reply calls.
//!
//! `disconnect` and `stop_search` return before anything reaches the bus.
//! They are queued here and sent by a single worker running on the
//! connection's own executor, so they go out in call order and no async
//! runtime is needed on the caller's side. Every awaited call flushes the
//! queue first, which keeps it behind any teardown queued before it.

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};
use zbus::Connection;

use crate::dbus::EspProvisioningProxy;

#[derive(Debug)]
pub(crate) enum Job {
    Disconnect(String),
    StopSearch,
    Flush(oneshot::Sender<()>),
}

#[derive(Debug, Clone)]
pub(crate) struct DispatchQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl DispatchQueue {
    /// Starts the worker on the executor of `conn`.
    pub(crate) fn start(conn: &Connection, proxy: EspProvisioningProxy<'static>) -> Self {
        let (queue, rx) = Self::channel();
        conn.executor()
            .spawn(run(proxy, rx), "espprov-dispatch")
            .detach();
        queue
    }

    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<Job>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn disconnect(&self, name: &str) {
        self.push(Job::Disconnect(name.to_string()), "disconnect");
    }

    pub(crate) fn stop_search(&self) {
        self.push(Job::StopSearch, "stop_search");
    }

    /// Resolves once every job queued before it has been written to the bus.
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Job::Flush(done)).is_ok() {
            // a dropped sender means the worker is gone; nothing is pending then
            let _ = wait.await;
        }
    }

    fn push(&self, job: Job, what: &'static str) {
        if self.tx.send(job).is_err() {
            warn!("Dispatch queue is closed, {what} was not sent");
        }
    }
}

async fn run(proxy: EspProvisioningProxy<'static>, mut rx: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Disconnect(name) => {
                if let Err(e) = proxy.disconnect(&name).await {
                    debug!("Disconnect of {name} failed to send: {e}");
                }
            }
            Job::StopSearch => {
                if let Err(e) = proxy.stop_search().await {
                    debug!("StopSearch failed to send: {e}");
                }
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Dispatch queue closed");
}
