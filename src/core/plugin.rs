//! # Plugin: host-facing façade over the registry, settings and views.
//!
//! The [`Plugin`] owns the event bus, the [`Registry`], the process-wide
//! [`GlobalSettings`] and the attached [`AdView`]s. Host calls enter through
//! [`Plugin::handle`] (untyped) or [`Plugin::execute`] (typed).
//!
//! ## High-level architecture
//! ```text
//! host ── MethodCall ──► Plugin::handle ──► Command::parse ──► Plugin::execute
//!                                                                 │
//!          ┌──────────────────────┬──────────────────────┬───────┴──────────────┐
//!          ▼                      ▼                      ▼                      ▼
//!   Registry::create_or_get   AdController::         GlobalSettings ──►    AdView::
//!   Registry::remove          set_ad_unit / reload   AdLoader::            update_options
//!                                  │                 apply_settings
//!                                  ▼
//!                      HostChannel ("loading" / "loadCompleted" / "loadError")
//!
//! Event flow:
//!   AdController / Registry ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet
//!
//! Shutdown path:
//!   Registry::clear ─► runtime_token.cancel() ─► listener drains and exits
//!                   ─► SubscriberSet::shutdown (workers drain their queues)
//! ```
//!
//! ## Example
//! ```rust
//! use admob_native::{AdContent, AdRequest, AdUnitId, Config, LoaderFn, Plugin, QueueTransport};
//! use admob_native::{LoadState, MethodCall};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = LoaderFn::arc("house", |_unit: AdUnitId, _req: AdRequest| async {
//!         Ok::<_, admob_native::AdLoadError>(AdContent::new("Try our app"))
//!     });
//!     let (transport, mut host) = QueueTransport::new();
//!     let plugin = Plugin::builder(Config::default()).build(loader, transport);
//!
//!     plugin.handle(MethodCall::new("initController", json!({ "controllerID": "home" }))).await?;
//!     plugin
//!         .handle(MethodCall::new("setAdUnit", json!({ "controllerID": "home", "adUnitID": "unit-1" })))
//!         .await?;
//!
//!     assert_eq!(host.recv().await.unwrap().method, "loading");
//!     assert_eq!(host.recv().await.unwrap().method, "loadCompleted");
//!
//!     let home = plugin.controller("home").await.unwrap();
//!     assert_eq!(home.state(), LoadState::LoadCompleted);
//!
//!     plugin.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::content::PlacementKey;
use crate::controller::{AdController, SubscriptionId};
use crate::core::{Config, Registry};
use crate::error::ControlError;
use crate::events::{Bus, Event};
use crate::loader::{GlobalSettings, LoaderRef};
use crate::options::parse_options;
use crate::subscribers::SubscriberSet;
use crate::transport::{Command, MethodCall};
use crate::views::{AdView, Paint};

/// A view attached through [`Plugin::attach_view`].
struct ViewBinding {
    view: Arc<AdView>,
    controller: Arc<AdController>,
    subscription: SubscriptionId,
}

type ViewKey = (PlacementKey, String);

/// Host-facing entry point.
pub struct Plugin {
    cfg: Config,
    bus: Bus,
    registry: Arc<Registry>,
    loader: LoaderRef,
    settings: RwLock<GlobalSettings>,
    views: RwLock<HashMap<ViewKey, ViewBinding>>,

    subs: Mutex<Option<Arc<SubscriberSet>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    runtime_token: CancellationToken,
}

impl Plugin {
    /// Assembles a plugin from its parts. Use [`Plugin::builder`] instead.
    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        registry: Arc<Registry>,
        loader: LoaderRef,
        subs: Arc<SubscriberSet>,
        runtime_token: CancellationToken,
    ) -> Self {
        let listener = Self::subscriber_listener(bus.subscribe(), Arc::clone(&subs), runtime_token.clone());
        Self {
            cfg,
            bus,
            registry,
            loader,
            settings: RwLock::new(GlobalSettings::default()),
            views: RwLock::new(HashMap::new()),
            subs: Mutex::new(Some(subs)),
            listener: Mutex::new(Some(listener)),
            runtime_token,
        }
    }

    /// Returns the runtime configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the controller registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Subscribes directly to runtime events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Looks up a controller by placement key.
    pub async fn controller(&self, key: impl Into<PlacementKey>) -> Option<Arc<AdController>> {
        self.registry.get(&key.into()).await
    }

    /// Current process-wide loader settings.
    pub async fn settings(&self) -> GlobalSettings {
        self.settings.read().await.clone()
    }

    /// Validates and executes one untyped host call.
    ///
    /// `setAdUnit` calls that omit `numberOfAds` (or send `null`) use [`Config::default_ad_count`].
    pub async fn handle(&self, call: MethodCall) -> Result<(), ControlError> {
        let mut command = Command::parse(&call)?;
        if let Command::SetAdUnit { request, .. } = &mut command {
            if call.arguments.get("numberOfAds").is_none_or(Value::is_null) {
                request.ad_count = self.cfg.default_request().ad_count;
            }
        }

        let res = self.execute(command).await;
        if let Err(e) = &res {
            tracing::warn!(method = %call.method, error = e.as_label(), "host call rejected: {e}");
        }
        res
    }

    /// Executes a typed command.
    pub async fn execute(&self, command: Command) -> Result<(), ControlError> {
        match command {
            Command::InitController { key } => {
                self.registry.create_or_get(&key).await;
            }
            Command::DisposeController { key } => {
                self.registry.remove(&key).await;
            }
            Command::SetAdUnit {
                key,
                ad_unit,
                request,
            } => {
                self.require(&key).await?.set_ad_unit(ad_unit, request).await;
            }
            Command::Reload { key, force_refresh } => {
                self.require(&key).await?.reload(force_refresh).await?;
            }
            Command::SetTestDeviceIds { ids } => {
                self.set_test_device_ids(ids).await;
            }
            Command::SetNonPersonalizedAds { enabled } => {
                self.set_non_personalized_ads(enabled).await;
            }
            Command::SetOptions { key, view, patch } => {
                let views = self.views.read().await;
                let binding = views
                    .get(&(key.clone(), view.clone()))
                    .ok_or_else(|| ControlError::UnknownView {
                        controller: key.to_string(),
                        view,
                    })?;
                binding.view.update_options(patch);
            }
        }
        Ok(())
    }

    /// Replaces the test device id list and pushes the settings to the loader.
    pub async fn set_test_device_ids(&self, ids: Vec<String>) {
        let mut settings = self.settings.write().await;
        settings.test_device_ids = ids;
        self.loader.apply_settings(&settings);
    }

    /// Toggles non-personalized ads and pushes the settings to the loader.
    pub async fn set_non_personalized_ads(&self, enabled: bool) {
        let mut settings = self.settings.write().await;
        settings.non_personalized_ads = enabled;
        self.loader.apply_settings(&settings);
    }

    /// Attaches a view to the controller `key`.
    ///
    /// `raw_options` is merged over the defaults. The view immediately paints the
    /// controller's current content, if any. Re-attaching the same `view_id` replaces
    /// the previous binding.
    pub async fn attach_view(
        &self,
        key: impl Into<PlacementKey>,
        view_id: impl Into<String>,
        raw_options: &Value,
        painter: Arc<dyn Paint>,
    ) -> Result<Arc<AdView>, ControlError> {
        let key = key.into();
        let view_id = view_id.into();
        let controller = self.require(&key).await?;
        let options = parse_options(raw_options)?;

        let view = AdView::new(view_id.clone(), options, painter);
        let subscription = controller.subscribe(view.clone()).await;

        let replaced = self.views.write().await.insert(
            (key, view_id),
            ViewBinding {
                view: Arc::clone(&view),
                controller,
                subscription,
            },
        );
        if let Some(old) = replaced {
            old.controller.unsubscribe(old.subscription);
        }
        Ok(view)
    }

    /// Detaches a view. Returns `false` if it was not attached.
    pub async fn detach_view(&self, key: impl Into<PlacementKey>, view_id: &str) -> bool {
        let removed = self
            .views
            .write()
            .await
            .remove(&(key.into(), view_id.to_string()));
        match removed {
            Some(binding) => binding.controller.unsubscribe(binding.subscription),
            None => false,
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set (fire-and-forget).
    ///
    /// On cancellation, events already queued on the bus are still forwarded.
    fn subscriber_listener(
        mut rx: broadcast::Receiver<Event>,
        set: Arc<SubscriberSet>,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                        }
                        Err(broadcast::error::RecvError::Closed) => return,
                    },
                    _ = token.cancelled() => break,
                }
            }
            while let Ok(ev) = rx.try_recv() {
                set.emit(&ev);
            }
        })
    }

    /// Disposes every controller, stops the listener and drains subscriber workers.
    ///
    /// Idempotent.
    pub async fn shutdown(&self) {
        for (_, binding) in self.views.write().await.drain() {
            binding.controller.unsubscribe(binding.subscription);
        }
        self.registry.clear().await;
        self.runtime_token.cancel();

        if let Some(handle) = self.listener.lock().await.take() {
            let _ = handle.await;
        }
        if let Some(set) = self.subs.lock().await.take() {
            match Arc::try_unwrap(set) {
                Ok(set) => set.shutdown().await,
                Err(_) => tracing::debug!("subscriber set still shared; workers left running"),
            }
        }
    }

    async fn require(&self, key: &PlacementKey) -> Result<Arc<AdController>, ControlError> {
        self.registry
            .get(key)
            .await
            .ok_or_else(|| ControlError::UnknownController {
                controller: key.to_string(),
            })
    }
}
