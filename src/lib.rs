//! # admob-native
//!
//! **admob-native** is the host-independent core of a native ads plugin.
//!
//! It keeps one load-state machine per ad placement, deduplicates loads, replays
//! cached content to late renderers, guards against out-of-order loader results and
//! relays every state transition to the host as a named notification. The ad network
//! itself sits behind the [`AdLoader`] trait; the host bridge behind [`Transport`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host bridge ── MethodCall{method, arguments} ──► Plugin::handle
//!                                                       │ Command::parse (typed, validated)
//!                                                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Plugin                                                           │
//! │  - Registry (placement key → Arc<AdController>)                   │
//! │  - GlobalSettings (test devices, non-personalized ads)            │
//! │  - attached AdViews (options + painter)                           │
//! │  - Bus + SubscriberSet (observability)                            │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ AdController │   │ AdController │   │ AdController │
//!   │   "home"     │   │   "feed"     │   │   "detail"   │
//!   └┬─────┬──────┬┘   └──────────────┘   └──────────────┘
//!    │     │      │
//!    │     │      └─► AdLoader::load(unit, request) ──► spawned, single-shot
//!    │     └────────► Renderers (AdView, RendererFn, ...) on a snapshot
//!    └──────────────► HostChannel "home": loading / loadCompleted / loadError
//!
//!   AdController / Registry ── publish(Event) ──► Bus ──► SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ### Lifecycle of one load
//! ```text
//! set_ad_unit(unit, request) / reload(force)
//!   ├─ load in flight        ─► Dispatch::Joined (no second load)
//!   ├─ cached for this unit  ─► Dispatch::Cached  ─► loadCompleted (replay)
//!   └─ otherwise             ─► generation += 1, Dispatch::Started
//!                                 ├─► loading
//!                                 └─► loader future (optional timeout)
//!                                       ├─ generation/unit no longer current ─► StaleResultIgnored
//!                                       ├─ Ok(content)  ─► cache, loadCompleted, fan out
//!                                       └─ Err(error)   ─► loadError, keep old content
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Controllers**   | Load-state machine, cache, renderer fan-out.                  | [`AdController`], [`Renderer`], [`LoadState`] |
//! | **Registry**      | Keyed controller lifecycle.                                   | [`Registry`]                                |
//! | **Transport**     | Typed inbound commands, outbound host channels.               | [`Command`], [`Transport`], [`HostChannel`] |
//! | **Loader**        | Ad network adapter seam.                                      | [`AdLoader`], [`LoaderFn`], [`AdRequest`]   |
//! | **Views**         | Typed options, merge on update, repaint.                      | [`AdView`], [`Paint`], [`NativeAdOptions`]  |
//! | **Subscriber API**| Hook into runtime events (logging, metrics, custom).          | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed call and loader errors.                                 | [`ControlError`], [`AdLoadError`]           |
//! | **Configuration** | Centralize runtime settings.                                  | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] subscriber (writes through `tracing`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use admob_native::{AdContent, AdRequest, AdUnitId, Config, LoaderFn, Plugin, QueueTransport};
//! use admob_native::{RendererFn, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(admob_native::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let loader = LoaderFn::arc("house", |unit: AdUnitId, _req: AdRequest| async move {
//!         Ok::<_, admob_native::AdLoadError>(AdContent::new(format!("House ad for {unit}")))
//!     });
//!     let (transport, mut host) = QueueTransport::new();
//!     let plugin = Plugin::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build(loader, transport);
//!
//!     let (home, _) = plugin.registry().create_or_get(&"home".into()).await;
//!     home.subscribe(RendererFn::arc(|ad: &Arc<AdContent>| println!("render {}", ad.headline)))
//!         .await;
//!     home.set_ad_unit(AdUnitId::new("unit-1")?, AdRequest::default()).await;
//!
//!     while let Some(n) = host.recv().await {
//!         if n.method == "loadCompleted" {
//!             break;
//!         }
//!     }
//!     plugin.shutdown().await;
//!     Ok(())
//! }
//! ```
mod content;
mod controller;
mod core;
mod error;
mod events;
mod loader;
mod options;
mod subscribers;
mod transport;
mod views;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use content::{AdContent, AdField, AdImage, AdUnitId, MediaContent, PlacementKey};
pub use controller::{AdController, Dispatch, LoadState, Renderer, RendererFn, SubscriptionId};
pub use core::{Config, Plugin, PluginBuilder, Registry};
pub use error::{AdLoadError, ControlError};
pub use events::{Bus, Event, EventKind, LoadSource};
pub use loader::{AdLoader, AdRequest, GlobalSettings, LoadFuture, LoaderFn, LoaderRef};
pub use options::{Color, ColorParseError, NativeAdOptions, OptionsPatch, TextStyle, TextStylePatch, parse_options};
pub use subscribers::{Subscribe, SubscriberSet};
pub use transport::{Command, HostChannel, MethodCall, Notification, QueueTransport, Transport};
pub use views::{AdView, Paint};

// Optional: expose the built-in logger subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
