use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{plugin::Plugin, registry::Registry};
use crate::{
    core::Config,
    events::Bus,
    loader::LoaderRef,
    subscribers::{Subscribe, SubscriberSet},
    transport::Transport,
};

/// Builder for constructing a [`Plugin`] with optional features.
pub struct PluginBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl PluginBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (controller lifecycle, loads, failures)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds and returns the Plugin instance.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Event bus for broadcasting
    /// - Registry creating controllers over `loader` and `transport`
    /// - Subscriber workers and the bus listener feeding them
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self, loader: LoaderRef, transport: Arc<dyn Transport>) -> Arc<Plugin> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let runtime_token = CancellationToken::new();

        let registry = Registry::new(
            Arc::clone(&loader),
            transport,
            bus.clone(),
            self.cfg.load_timeout(),
        );

        Arc::new(Plugin::new_internal(
            self.cfg,
            bus,
            registry,
            loader,
            subs,
            runtime_token,
        ))
    }
}

impl Plugin {
    /// Starts building a plugin.
    pub fn builder(cfg: Config) -> PluginBuilder {
        PluginBuilder::new(cfg)
    }
}
