//! # Outbound host channels.
//!
//! Every controller owns one [`HostChannel`] named after its placement key, obtained
//! from the plugin's [`Transport`] when the controller is created. State transitions
//! are pushed through it as bare method names (`loading`, `loadCompleted`,
//! `loadError`) with no payload.
//!
//! [`QueueTransport`] is a ready-made transport that forwards every notification
//! into a tokio channel; a host bridge drains the receiver and forwards to its UI
//! layer.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use admob_native::{QueueTransport, Transport};
//!
//! let (transport, mut rx) = QueueTransport::new();
//! transport.channel("home").invoke("loading");
//!
//! let n = rx.recv().await.unwrap();
//! assert_eq!((n.channel.as_str(), n.method.as_str()), ("home", "loading"));
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

/// Channel scoped to one controller.
pub trait HostChannel: Send + Sync + 'static {
    /// Channel name (the placement key).
    fn name(&self) -> &str;

    /// Pushes a named notification to the host. Must not block.
    fn invoke(&self, method: &str);
}

/// Factory of per-controller channels.
pub trait Transport: Send + Sync + 'static {
    /// Opens the channel for `name`. Called once per created controller.
    fn channel(&self, name: &str) -> Arc<dyn HostChannel>;
}

/// One notification delivered by [`QueueTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel: String,
    pub method: String,
}

/// Transport that forwards every notification into an unbounded tokio channel.
#[derive(Clone)]
pub struct QueueTransport {
    tx: mpsc::UnboundedSender<Notification>,
}

impl QueueTransport {
    /// Creates the transport and the receiver the host drains.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Transport for QueueTransport {
    fn channel(&self, name: &str) -> Arc<dyn HostChannel> {
        Arc::new(QueueChannel {
            name: name.to_string(),
            tx: self.tx.clone(),
        })
    }
}

struct QueueChannel {
    name: String,
    tx: mpsc::UnboundedSender<Notification>,
}

impl HostChannel for QueueChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, method: &str) {
        let sent = self.tx.send(Notification {
            channel: self.name.clone(),
            method: method.to_string(),
        });
        if sent.is_err() {
            tracing::debug!(channel = %self.name, method, "host receiver closed; notification dropped");
        }
    }
}
