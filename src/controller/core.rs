//! # AdController: load-state machine of one placement.
//!
//! ## State machine
//! ```text
//!            set_ad_unit(first)                 loader Ok
//!   Idle ─────────────────────► Loading ───────────────────► LoadCompleted
//!                                  ▲  │                          │
//!                                  │  │ loader Err               │ set_ad_unit(other unit)
//!                                  │  ▼                          │ reload(force=true)
//!                                  │ LoadError ──────────────────┤
//!                                  └─────────────────────────────┘
//! ```
//!
//! ## Dispatch rules (`set_ad_unit` / `reload`)
//! ```text
//! ad unit changed            ─► start load            (Dispatch::Started)
//! load in flight             ─► join it               (Dispatch::Joined)
//! content for unit cached    ─► replay, no loader     (Dispatch::Cached)
//!   └─ unless reload(force)  ─► start load
//! nothing cached             ─► start load
//! ```
//!
//! ## Staleness guard
//! Every started load bumps `generation` and records it as the in-flight generation,
//! together with the ad unit it targets. A loader result is applied only if both
//! still match when it arrives; otherwise it is dropped and `StaleResultIgnored`
//! is published. Superseded loads are never aborted.
//!
//! ## Rules
//! - At most one load in flight per controller.
//! - Loader failures become `LoadError`; cached content from an earlier success stays.
//! - Every transition is announced three ways: host channel, renderers, event bus.
//! - Nothing retries automatically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, watch};

use super::renderer::{Renderer, SubscriptionId};
use super::state::{Cached, Dispatch, LoadState};
use crate::content::{AdContent, AdUnitId, PlacementKey};
use crate::error::{AdLoadError, ControlError};
use crate::events::{Bus, Event, EventKind, LoadSource, panic_message};
use crate::loader::{AdRequest, LoaderRef};
use crate::transport::HostChannel;

/// Mutable part of a controller, guarded by one lock.
struct Inner {
    ad_unit: Option<AdUnitId>,
    request: AdRequest,
    content: Option<Cached>,
    generation: u64,
    /// Generation and ad unit of the load currently in flight.
    in_flight: Option<(u64, AdUnitId)>,
}

impl Inner {
    fn cached_for(&self, unit: &AdUnitId) -> bool {
        self.content.as_ref().is_some_and(|c| &c.unit == unit)
    }
}

type RendererList = Vec<(SubscriptionId, Arc<dyn Renderer>)>;

/// Owns the load lifecycle of one placement and fans results out.
pub struct AdController {
    key: PlacementKey,
    loader: LoaderRef,
    channel: Arc<dyn HostChannel>,
    bus: Bus,
    load_timeout: Option<Duration>,

    inner: Mutex<Inner>,
    state_tx: watch::Sender<LoadState>,

    renderers: StdMutex<RendererList>,
    next_subscription: AtomicU64,
}

impl AdController {
    /// Creates an idle controller.
    pub fn new(
        key: PlacementKey,
        loader: LoaderRef,
        channel: Arc<dyn HostChannel>,
        bus: Bus,
        load_timeout: Option<Duration>,
    ) -> Arc<Self> {
        let (state_tx, _rx) = watch::channel(LoadState::Idle);
        Arc::new(Self {
            key,
            loader,
            channel,
            bus,
            load_timeout,
            inner: Mutex::new(Inner {
                ad_unit: None,
                request: AdRequest::default(),
                content: None,
                generation: 0,
                in_flight: None,
            }),
            state_tx,
            renderers: StdMutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        })
    }

    pub fn key(&self) -> &PlacementKey {
        &self.key
    }

    /// Current load state.
    pub fn state(&self) -> LoadState {
        *self.state_tx.borrow()
    }

    /// Receiver that observes every state change.
    pub fn watch_state(&self) -> watch::Receiver<LoadState> {
        self.state_tx.subscribe()
    }

    /// Ad unit recorded by the last `set_ad_unit`.
    pub async fn ad_unit(&self) -> Option<AdUnitId> {
        self.inner.lock().await.ad_unit.clone()
    }

    /// Content currently held (possibly from a previous ad unit while a new load runs).
    pub async fn content(&self) -> Option<Arc<AdContent>> {
        self.inner
            .lock()
            .await
            .content
            .as_ref()
            .map(|c| Arc::clone(&c.content))
    }

    /// Number of attached renderers.
    pub fn renderer_count(&self) -> usize {
        self.renderers_guard().len()
    }

    /// Points the controller at `ad_unit`, loading or replaying as needed.
    ///
    /// `request` replaces the stored request parameters unless a load is in flight
    /// for the same unit.
    pub async fn set_ad_unit(self: &Arc<Self>, ad_unit: AdUnitId, request: AdRequest) -> Dispatch {
        let mut inner = self.inner.lock().await;

        if inner.ad_unit.as_ref() != Some(&ad_unit) {
            inner.ad_unit = Some(ad_unit.clone());
            inner.request = request;
            return self.start_load(&mut inner, ad_unit);
        }
        if let Some((generation, _)) = &inner.in_flight {
            return Dispatch::Joined {
                generation: *generation,
            };
        }

        inner.request = request;
        if inner.cached_for(&ad_unit) {
            self.replay_cached(&inner)
        } else {
            self.start_load(&mut inner, ad_unit)
        }
    }

    /// Reloads the current ad unit.
    ///
    /// Non-forced reloads replay cached content when there is some. Fails with
    /// [`ControlError::NoAdUnit`] when no ad unit was ever set; the load state is
    /// left untouched in that case.
    pub async fn reload(self: &Arc<Self>, force_refresh: bool) -> Result<Dispatch, ControlError> {
        let mut inner = self.inner.lock().await;

        let Some(ad_unit) = inner.ad_unit.clone() else {
            return Err(ControlError::NoAdUnit {
                controller: self.key.to_string(),
            });
        };
        if let Some((generation, _)) = &inner.in_flight {
            return Ok(Dispatch::Joined {
                generation: *generation,
            });
        }

        if force_refresh || !inner.cached_for(&ad_unit) {
            Ok(self.start_load(&mut inner, ad_unit))
        } else {
            Ok(self.replay_cached(&inner))
        }
    }

    /// Attaches a renderer. It immediately receives the held content, if any.
    pub async fn subscribe(&self, renderer: Arc<dyn Renderer>) -> SubscriptionId {
        // Holding `inner` keeps a concurrent fan-out from slipping between replay and insert.
        let inner = self.inner.lock().await;
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.renderers_guard().push((id, Arc::clone(&renderer)));

        if let Some(cached) = &inner.content {
            self.deliver(renderer.as_ref(), |r| r.on_content(&cached.content));
        }
        id
    }

    /// Detaches a renderer. Returns `false` if `id` was not attached.
    ///
    /// Safe to call from inside a renderer callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut renderers = self.renderers_guard();
        let before = renderers.len();
        renderers.retain(|(sid, _)| *sid != id);
        renderers.len() != before
    }

    fn start_load(self: &Arc<Self>, inner: &mut Inner, ad_unit: AdUnitId) -> Dispatch {
        inner.generation += 1;
        let generation = inner.generation;
        inner.in_flight = Some((generation, ad_unit.clone()));
        self.transition(LoadState::Loading);

        self.fan_out(|r| r.on_loading());
        self.bus.publish(
            Event::new(EventKind::LoadStarted)
                .with_controller(&self.key)
                .with_ad_unit(&ad_unit)
                .with_generation(generation),
        );
        tracing::debug!(
            controller = %self.key,
            ad_unit = %ad_unit,
            generation,
            loader = self.loader.name(),
            "load started"
        );

        let fut = self.loader.load(&ad_unit, &inner.request);
        let timeout = self.load_timeout;
        let me: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .unwrap_or(Err(AdLoadError::Timeout { timeout: limit })),
                None => fut.await,
            };
            // A disposed controller has nobody left to notify.
            if let Some(controller) = me.upgrade() {
                controller.complete(generation, ad_unit, result).await;
            }
        });

        Dispatch::Started { generation }
    }

    /// Applies a loader result if it belongs to the in-flight load.
    async fn complete(
        &self,
        generation: u64,
        ad_unit: AdUnitId,
        result: Result<AdContent, AdLoadError>,
    ) {
        let mut inner = self.inner.lock().await;

        let current = matches!(
            &inner.in_flight,
            Some((g, unit)) if *g == generation && *unit == ad_unit
        );
        if !current || inner.ad_unit.as_ref() != Some(&ad_unit) {
            tracing::debug!(
                controller = %self.key,
                ad_unit = %ad_unit,
                generation,
                latest = inner.generation,
                "stale load result ignored"
            );
            self.bus.publish(
                Event::new(EventKind::StaleResultIgnored)
                    .with_controller(&self.key)
                    .with_ad_unit(&ad_unit)
                    .with_generation(generation),
            );
            return;
        }
        inner.in_flight = None;

        match result {
            Ok(content) => {
                let content = Arc::new(content);
                inner.content = Some(Cached {
                    unit: ad_unit.clone(),
                    content: Arc::clone(&content),
                });
                self.transition(LoadState::LoadCompleted);
                self.fan_out(|r| r.on_content(&content));
                self.bus.publish(
                    Event::new(EventKind::LoadCompleted)
                        .with_controller(&self.key)
                        .with_ad_unit(&ad_unit)
                        .with_generation(generation)
                        .with_source(LoadSource::Network),
                );
            }
            Err(error) => {
                self.transition(LoadState::LoadError);
                self.fan_out(|r| r.on_error(&error));
                self.bus.publish(
                    Event::new(EventKind::LoadFailed)
                        .with_controller(&self.key)
                        .with_ad_unit(&ad_unit)
                        .with_generation(generation)
                        .with_reason(error.as_message()),
                );
            }
        }
    }

    fn replay_cached(&self, inner: &Inner) -> Dispatch {
        let Some(cached) = inner.content.clone() else {
            return Dispatch::Cached;
        };
        self.transition(LoadState::LoadCompleted);
        self.fan_out(|r| r.on_content(&cached.content));
        self.bus.publish(
            Event::new(EventKind::LoadCompleted)
                .with_controller(&self.key)
                .with_ad_unit(&cached.unit)
                .with_generation(inner.generation)
                .with_source(LoadSource::Cache),
        );
        Dispatch::Cached
    }

    /// Records the new state and announces it to the host.
    ///
    /// Re-entering the same state is announced again (a cache hit re-emits
    /// `loadCompleted`). Callers hold the `inner` lock.
    fn transition(&self, next: LoadState) {
        self.state_tx.send_replace(next);
        if let Some(method) = next.method() {
            self.channel.invoke(method);
        }
    }

    /// Calls `f` on a snapshot of the renderers.
    fn fan_out(&self, f: impl Fn(&dyn Renderer)) {
        let snapshot: Vec<Arc<dyn Renderer>> = self
            .renderers_guard()
            .iter()
            .map(|(_, r)| Arc::clone(r))
            .collect();

        for renderer in snapshot {
            self.deliver(renderer.as_ref(), &f);
        }
    }

    fn deliver(&self, renderer: &dyn Renderer, f: impl Fn(&dyn Renderer)) {
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(renderer)));
        if let Err(panic_err) = res {
            self.bus.publish(
                Event::new(EventKind::RendererPanicked)
                    .with_controller(&self.key)
                    .with_reason(panic_message(&*panic_err)),
            );
        }
    }

    fn renderers_guard(&self) -> MutexGuard<'_, RendererList> {
        self.renderers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Delivery, RecordingRenderer, ScriptedLoader, drain_methods, unit};
    use crate::transport::{Notification, QueueTransport, Transport};
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Fixture {
        controller: Arc<AdController>,
        loader: Arc<ScriptedLoader>,
        host: UnboundedReceiver<Notification>,
        bus: Bus,
    }

    fn fixture() -> Fixture {
        let loader = ScriptedLoader::new();
        let (transport, host) = QueueTransport::new();
        let bus = Bus::new(64);
        let controller = AdController::new(
            PlacementKey::from("home"),
            loader.clone(),
            transport.channel("home"),
            bus.clone(),
            None,
        );
        Fixture {
            controller,
            loader,
            host,
            bus,
        }
    }

    async fn wait_for(controller: &AdController, state: LoadState) {
        let mut rx = controller.watch_state();
        rx.wait_for(|s| *s == state).await.unwrap();
    }

    #[tokio::test]
    async fn test_first_set_ad_unit_loads_and_completes() {
        let mut f = fixture();
        let renderer = RecordingRenderer::new();
        f.controller.subscribe(renderer.clone()).await;

        let d = f.controller.set_ad_unit(unit("unit-1"), AdRequest::default()).await;
        assert_eq!(d, Dispatch::Started { generation: 1 });
        assert_eq!(f.controller.state(), LoadState::Loading);
        assert_eq!(f.loader.call_count(), 1);

        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        assert_eq!(f.controller.content().await.unwrap().headline, "C1");
        assert_eq!(drain_methods(&mut f.host), vec!["loading", "loadCompleted"]);
        assert_eq!(
            renderer.deliveries(),
            vec![Delivery::Loading, Delivery::Content("C1".into())]
        );
    }

    #[tokio::test]
    async fn test_at_most_one_load_in_flight() {
        let f = fixture();
        let first = f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        let second = f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        let third = f.controller.reload(true).await.unwrap();

        assert_eq!(first, Dispatch::Started { generation: 1 });
        assert_eq!(second, Dispatch::Joined { generation: 1 });
        assert_eq!(third, Dispatch::Joined { generation: 1 });
        assert_eq!(f.loader.call_count(), 1);

        f.loader.succeed(0, AdContent::new("only"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;
        assert_eq!(f.loader.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_loader() {
        let mut f = fixture();
        let renderer = RecordingRenderer::new();
        f.controller.subscribe(renderer.clone()).await;

        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        let d = f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        assert_eq!(d, Dispatch::Cached);
        assert_eq!(f.loader.call_count(), 1);
        assert_eq!(
            drain_methods(&mut f.host),
            vec!["loading", "loadCompleted", "loadCompleted"]
        );
        assert_eq!(
            renderer.contents(),
            vec!["C1".to_string(), "C1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_stale_result_does_not_overwrite_newer_unit() {
        let f = fixture();
        let mut events = f.bus.subscribe();

        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.controller.set_ad_unit(unit("y"), AdRequest::default()).await;
        assert_eq!(f.loader.units(), vec!["x", "y"]);

        f.loader.succeed(1, AdContent::new("B"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        f.loader.succeed(0, AdContent::new("A"));
        loop {
            let ev = events.recv().await.unwrap();
            if ev.kind == EventKind::StaleResultIgnored {
                assert_eq!(ev.ad_unit.as_deref(), Some("x"));
                assert_eq!(ev.generation, Some(1));
                break;
            }
        }

        assert_eq!(f.controller.content().await.unwrap().headline, "B");
        assert_eq!(f.controller.state(), LoadState::LoadCompleted);
    }

    #[tokio::test]
    async fn test_stale_result_while_newer_load_pending() {
        let f = fixture();
        let mut events = f.bus.subscribe();

        f.controller.set_ad_unit(unit("w"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C0"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.controller.set_ad_unit(unit("y"), AdRequest::default()).await;
        f.loader.succeed(1, AdContent::new("A"));
        loop {
            let ev = events.recv().await.unwrap();
            if ev.kind == EventKind::StaleResultIgnored {
                assert_eq!(ev.ad_unit.as_deref(), Some("x"));
                assert_eq!(ev.generation, Some(2));
                break;
            }
        }

        assert_eq!(f.controller.state(), LoadState::Loading);
        assert_eq!(f.controller.content().await.unwrap().headline, "C0");

        f.loader.succeed(2, AdContent::new("B"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;
        assert_eq!(f.controller.content().await.unwrap().headline, "B");
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<StdMutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_start_logs_loader_name() {
        let buf = LogBuffer::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let f = fixture();
        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let line = out.lines().find(|l| l.contains("load started")).unwrap();
        assert!(line.contains("ScriptedLoader"), "{line}");
        assert!(line.contains("ad_unit=x"), "{line}");
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_cached_content_without_load() {
        let f = fixture();
        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        let late = RecordingRenderer::new();
        f.controller.subscribe(late.clone()).await;

        assert_eq!(late.deliveries(), vec![Delivery::Content("C1".into())]);
        assert_eq!(f.loader.call_count(), 1);
    }

    #[tokio::test]
    async fn test_forced_and_unforced_reload() {
        let f = fixture();
        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        assert_eq!(f.controller.reload(false).await.unwrap(), Dispatch::Cached);
        assert_eq!(f.loader.call_count(), 1);

        let d = f.controller.reload(true).await.unwrap();
        assert_eq!(d, Dispatch::Started { generation: 2 });
        assert_eq!(f.loader.call_count(), 2);
        assert_eq!(f.loader.units(), vec!["x", "x"]);
    }

    #[tokio::test]
    async fn test_reload_before_set_ad_unit_is_configuration_error() {
        let mut f = fixture();
        let err = f.controller.reload(true).await.unwrap_err();

        assert_eq!(
            err,
            ControlError::NoAdUnit {
                controller: "home".into()
            }
        );
        assert_eq!(f.controller.state(), LoadState::Idle);
        assert_eq!(f.loader.call_count(), 0);
        assert!(drain_methods(&mut f.host).is_empty());
    }

    #[tokio::test]
    async fn test_failure_then_retry_same_unit() {
        let mut f = fixture();
        let a = RecordingRenderer::new();
        let b = RecordingRenderer::new();
        f.controller.subscribe(a.clone()).await;
        f.controller.subscribe(b.clone()).await;

        f.controller.set_ad_unit(unit("unit-1"), AdRequest::default()).await;
        f.loader.fail(0, AdLoadError::NoFill);
        wait_for(&f.controller, LoadState::LoadError).await;
        assert!(f.controller.content().await.is_none());

        let d = f.controller.set_ad_unit(unit("unit-1"), AdRequest::default()).await;
        assert!(d.is_started());
        assert_eq!(f.loader.call_count(), 2);

        f.loader.succeed(1, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        for r in [&a, &b] {
            assert_eq!(r.contents(), vec!["C1".to_string()]);
            assert!(r.deliveries().contains(&Delivery::Error("load_no_fill".into())));
        }
        assert_eq!(
            drain_methods(&mut f.host),
            vec!["loading", "loadError", "loading", "loadCompleted"]
        );
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_content() {
        let f = fixture();
        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        f.controller.reload(true).await.unwrap();
        f.loader.fail(
            1,
            AdLoadError::Network {
                message: "offline".into(),
            },
        );
        wait_for(&f.controller, LoadState::LoadError).await;

        assert_eq!(f.controller.content().await.unwrap().headline, "C1");
        // Content for the unit is still cached, so an unforced reload replays it.
        assert_eq!(f.controller.reload(false).await.unwrap(), Dispatch::Cached);
        assert_eq!(f.controller.state(), LoadState::LoadCompleted);
    }

    #[tokio::test]
    async fn test_changed_unit_does_not_replay_other_units_content() {
        let f = fixture();
        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("X"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        f.controller.set_ad_unit(unit("y"), AdRequest::default()).await;
        f.loader.fail(1, AdLoadError::NoFill);
        wait_for(&f.controller, LoadState::LoadError).await;

        // Old content is still held for display, but is not a cache hit for "y".
        assert_eq!(f.controller.content().await.unwrap().headline, "X");
        let d = f.controller.set_ad_unit(unit("y"), AdRequest::default()).await;
        assert!(d.is_started());
    }

    #[tokio::test]
    async fn test_unsubscribe_inside_callback() {
        struct OneShot {
            controller: Weak<AdController>,
            id: StdMutex<Option<SubscriptionId>>,
            seen: AtomicU64,
        }

        impl Renderer for OneShot {
            fn on_content(&self, _content: &Arc<AdContent>) {
                self.seen.fetch_add(1, Ordering::SeqCst);
                let id = self.id.lock().unwrap().take();
                if let (Some(c), Some(id)) = (self.controller.upgrade(), id) {
                    assert!(c.unsubscribe(id));
                }
            }
        }

        let f = fixture();
        let one_shot = Arc::new(OneShot {
            controller: Arc::downgrade(&f.controller),
            id: StdMutex::new(None),
            seen: AtomicU64::new(0),
        });
        let stays = RecordingRenderer::new();

        let id = f.controller.subscribe(one_shot.clone()).await;
        *one_shot.id.lock().unwrap() = Some(id);
        f.controller.subscribe(stays.clone()).await;

        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;
        f.controller.reload(false).await.unwrap();

        assert_eq!(one_shot.seen.load(Ordering::SeqCst), 1);
        assert_eq!(stays.contents().len(), 2);
        assert_eq!(f.controller.renderer_count(), 1);
    }

    #[tokio::test]
    async fn test_panicking_renderer_is_isolated() {
        let f = fixture();
        let mut events = f.bus.subscribe();
        let good = RecordingRenderer::new();

        f.controller
            .subscribe(crate::controller::RendererFn::arc(|_: &Arc<AdContent>| {
                panic!("paint failed")
            }))
            .await;
        f.controller.subscribe(good.clone()).await;

        f.controller.set_ad_unit(unit("x"), AdRequest::default()).await;
        f.loader.succeed(0, AdContent::new("C1"));
        wait_for(&f.controller, LoadState::LoadCompleted).await;

        assert_eq!(good.contents(), vec!["C1".to_string()]);
        loop {
            let ev = events.recv().await.unwrap();
            if ev.kind == EventKind::RendererPanicked {
                assert_eq!(ev.reason.as_deref(), Some("paint failed"));
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_timeout_becomes_load_error() {
        let loader = ScriptedLoader::new();
        let (transport, _host) = QueueTransport::new();
        let controller = AdController::new(
            PlacementKey::from("slow"),
            loader.clone(),
            transport.channel("slow"),
            Bus::new(8),
            Some(Duration::from_secs(5)),
        );

        let renderer = RecordingRenderer::new();
        controller.subscribe(renderer.clone()).await;
        controller.set_ad_unit(unit("x"), AdRequest::default()).await;

        wait_for(&controller, LoadState::LoadError).await;
        assert!(renderer.deliveries().contains(&Delivery::Error("load_timeout".into())));

        // The timed-out load was dropped; resolving it now reaches nobody.
        loader.succeed(0, AdContent::new("late"));
        tokio::task::yield_now().await;
        assert!(controller.content().await.is_none());
    }

    #[tokio::test]
    async fn test_request_is_reused_by_reload() {
        let f = fixture();
        let req = AdRequest::default().with_keywords(["sports"]).with_ad_count(3);
        f.controller.set_ad_unit(unit("x"), req.clone()).await;
        f.loader.fail(0, AdLoadError::NoFill);
        wait_for(&f.controller, LoadState::LoadError).await;

        f.controller.reload(false).await.unwrap();
        assert_eq!(f.loader.requests(), vec![req.clone(), req]);
    }
}
