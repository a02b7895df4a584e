//! Test doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tokio::sync::{mpsc::UnboundedReceiver, oneshot};

use crate::content::{AdContent, AdUnitId};
use crate::controller::Renderer;
use crate::error::AdLoadError;
use crate::loader::{AdLoader, AdRequest, GlobalSettings, LoadFuture};
use crate::transport::Notification;

pub(crate) fn unit(id: &str) -> AdUnitId {
    AdUnitId::new(id).unwrap()
}

/// Drains every pending host notification and returns the method names.
pub(crate) fn drain_methods(rx: &mut UnboundedReceiver<Notification>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n.method);
    }
    out
}

struct PendingLoad {
    unit: AdUnitId,
    request: AdRequest,
    tx: Option<oneshot::Sender<Result<AdContent, AdLoadError>>>,
}

/// Loader whose calls stay pending until a test resolves them by index.
#[derive(Default)]
pub(crate) struct ScriptedLoader {
    calls: Mutex<Vec<PendingLoad>>,
    settings: Mutex<Vec<GlobalSettings>>,
}

impl ScriptedLoader {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn units(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.unit.to_string())
            .collect()
    }

    pub(crate) fn requests(&self) -> Vec<AdRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.request.clone())
            .collect()
    }

    pub(crate) fn applied_settings(&self) -> Vec<GlobalSettings> {
        self.settings.lock().unwrap().clone()
    }

    pub(crate) fn succeed(&self, index: usize, content: AdContent) {
        self.resolve(index, Ok(content));
    }

    pub(crate) fn fail(&self, index: usize, error: AdLoadError) {
        self.resolve(index, Err(error));
    }

    /// Resolves call `index`. Resolving a call whose future was dropped is a no-op.
    fn resolve(&self, index: usize, result: Result<AdContent, AdLoadError>) {
        let tx = self.calls.lock().unwrap()[index]
            .tx
            .take()
            .expect("load already resolved");
        let _ = tx.send(result);
    }
}

impl AdLoader for ScriptedLoader {
    fn load(&self, unit: &AdUnitId, request: &AdRequest) -> LoadFuture {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(PendingLoad {
            unit: unit.clone(),
            request: request.clone(),
            tx: Some(tx),
        });
        async move {
            rx.await.unwrap_or(Err(AdLoadError::Network {
                message: "scripted load abandoned".into(),
            }))
        }
        .boxed()
    }

    fn apply_settings(&self, settings: &GlobalSettings) {
        self.settings.lock().unwrap().push(settings.clone());
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Delivery {
    Loading,
    Content(String),
    /// Error label.
    Error(String),
}

/// Renderer that records every callback.
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    seen: Mutex<Vec<Delivery>>,
}

impl RecordingRenderer {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn deliveries(&self) -> Vec<Delivery> {
        self.seen.lock().unwrap().clone()
    }

    /// Headlines of the delivered contents, in order.
    pub(crate) fn contents(&self) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Content(h) => Some(h),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn on_content(&self, content: &Arc<AdContent>) {
        self.seen
            .lock()
            .unwrap()
            .push(Delivery::Content(content.headline.clone()));
    }

    fn on_loading(&self) {
        self.seen.lock().unwrap().push(Delivery::Loading);
    }

    fn on_error(&self, error: &AdLoadError) {
        self.seen
            .lock()
            .unwrap()
            .push(Delivery::Error(error.as_label().to_string()));
    }
}
