//! # Controller registry: placement key → controller.
//!
//! ## Architecture
//! ```text
//! create_or_get(key)
//!     │  write lock
//!     ├─► present ─► same Arc (state preserved)
//!     └─► absent  ─► transport.channel(key) ─► AdController::new ─► insert
//!                                                   └─► publish(ControllerCreated)
//! remove(key)
//!     │  write lock
//!     ├─► present ─► drop registry reference ─► publish(ControllerDisposed)
//!     └─► absent  ─► no-op
//! ```
//!
//! ## Rules
//! - Lookup-or-create is atomic under one write lock: one key never yields two controllers
//! - Removal only drops the registry's reference; renderers stay subscribed
//! - The registry is an owned value of the plugin, never a global

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::content::PlacementKey;
use crate::controller::AdController;
use crate::events::{Bus, Event, EventKind};
use crate::loader::LoaderRef;
use crate::transport::Transport;

/// Keyed collection of live controllers.
pub struct Registry {
    controllers: RwLock<HashMap<PlacementKey, Arc<AdController>>>,
    loader: LoaderRef,
    transport: Arc<dyn Transport>,
    bus: Bus,
    load_timeout: Option<Duration>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new(
        loader: LoaderRef,
        transport: Arc<dyn Transport>,
        bus: Bus,
        load_timeout: Option<Duration>,
    ) -> Arc<Self> {
        Arc::new(Self {
            controllers: RwLock::new(HashMap::new()),
            loader,
            transport,
            bus,
            load_timeout,
        })
    }

    /// Returns the controller for `key`, creating it on first use.
    ///
    /// Returns `(controller, created)`.
    pub async fn create_or_get(&self, key: &PlacementKey) -> (Arc<AdController>, bool) {
        let mut map = self.controllers.write().await;
        if let Some(existing) = map.get(key) {
            return (Arc::clone(existing), false);
        }

        let controller = AdController::new(
            key.clone(),
            Arc::clone(&self.loader),
            self.transport.channel(key.as_str()),
            self.bus.clone(),
            self.load_timeout,
        );
        map.insert(key.clone(), Arc::clone(&controller));
        drop(map);

        self.bus
            .publish(Event::new(EventKind::ControllerCreated).with_controller(key));
        (controller, true)
    }

    /// Looks up a controller.
    pub async fn get(&self, key: &PlacementKey) -> Option<Arc<AdController>> {
        self.controllers.read().await.get(key).cloned()
    }

    /// Drops the registry's reference to `key`. Unknown keys are ignored.
    ///
    /// Returns the removed controller, if any.
    pub async fn remove(&self, key: &PlacementKey) -> Option<Arc<AdController>> {
        let removed = self.controllers.write().await.remove(key);
        if removed.is_some() {
            self.bus
                .publish(Event::new(EventKind::ControllerDisposed).with_controller(key));
        }
        removed
    }

    /// Returns the registered keys in sorted order.
    pub async fn keys(&self) -> Vec<PlacementKey> {
        let mut keys: Vec<_> = self.controllers.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize {
        self.controllers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.controllers.read().await.is_empty()
    }

    /// Removes every controller (used on shutdown).
    pub(crate) async fn clear(&self) -> Vec<PlacementKey> {
        let drained: Vec<PlacementKey> = self.controllers.write().await.drain().map(|(k, _)| k).collect();
        for key in &drained {
            self.bus
                .publish(Event::new(EventKind::ControllerDisposed).with_controller(key));
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::AdContent;
    use crate::controller::LoadState;
    use crate::loader::AdRequest;
    use crate::testing::{ScriptedLoader, unit};
    use crate::transport::QueueTransport;

    fn registry() -> (Arc<Registry>, Arc<ScriptedLoader>, Bus) {
        let loader = ScriptedLoader::new();
        let (transport, _rx) = QueueTransport::new();
        let bus = Bus::new(32);
        let reg = Registry::new(loader.clone(), transport, bus.clone(), None);
        (reg, loader, bus)
    }

    #[tokio::test]
    async fn test_create_or_get_is_idempotent() {
        let (reg, loader, _bus) = registry();
        let key = PlacementKey::from("home");

        let (first, created) = reg.create_or_get(&key).await;
        assert!(created);
        first.set_ad_unit(unit("x"), AdRequest::default()).await;
        loader.succeed(0, AdContent::new("C1"));
        first
            .watch_state()
            .wait_for(|s| *s == LoadState::LoadCompleted)
            .await
            .unwrap();

        let (second, created) = reg.create_or_get(&key).await;
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.content().await.unwrap().headline, "C1");
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creation_yields_one_controller() {
        let (reg, _loader, _bus) = registry();
        let key = PlacementKey::from("feed");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                let key = key.clone();
                tokio::spawn(async move { reg.create_or_get(&key).await })
            })
            .collect();

        let mut created = 0;
        let mut all = Vec::new();
        for h in handles {
            let (c, was_created) = h.await.unwrap();
            created += usize::from(was_created);
            all.push(c);
        }
        assert_eq!(created, 1);
        assert!(all.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_remove_unknown_is_noop_and_publishes_nothing() {
        let (reg, _loader, bus) = registry();
        let mut rx = bus.subscribe();

        assert!(reg.remove(&PlacementKey::from("ghost")).await.is_none());
        assert!(rx.try_recv().is_err());
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_then_create_gives_fresh_controller() {
        let (reg, _loader, bus) = registry();
        let mut rx = bus.subscribe();
        let key = PlacementKey::from("home");

        let (old, _) = reg.create_or_get(&key).await;
        let removed = reg.remove(&key).await.unwrap();
        assert!(Arc::ptr_eq(&old, &removed));

        let (fresh, created) = reg.create_or_get(&key).await;
        assert!(created);
        assert!(!Arc::ptr_eq(&old, &fresh));

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ControllerCreated,
                EventKind::ControllerDisposed,
                EventKind::ControllerCreated
            ]
        );
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let (reg, _loader, _bus) = registry();
        for k in ["b", "c", "a"] {
            reg.create_or_get(&PlacementKey::from(k)).await;
        }
        let keys: Vec<String> = reg.keys().await.iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
