//! # Loader abstraction.
//!
//! An [`AdLoader`] issues one request and returns a single-shot future that resolves
//! exactly once with the loaded content or a failure. The loader keeps no
//! "already loaded" gate: deduplication and caching belong to the controller.
//!
//! `load` itself is synchronous and only **builds** the request future; the controller
//! spawns that future. A loader may therefore record or start the request eagerly.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::content::{AdContent, AdUnitId};
use crate::error::AdLoadError;
use crate::loader::request::{AdRequest, GlobalSettings};

/// Future returned by [`AdLoader::load`].
pub type LoadFuture = BoxFuture<'static, Result<AdContent, AdLoadError>>;

/// Shared handle to a loader.
pub type LoaderRef = Arc<dyn AdLoader>;

/// # Ad network adapter.
///
/// # Example
/// ```
/// use futures::FutureExt;
/// use admob_native::{AdContent, AdLoader, AdRequest, AdUnitId, LoadFuture};
///
/// struct House;
///
/// impl AdLoader for House {
///     fn load(&self, unit: &AdUnitId, _request: &AdRequest) -> LoadFuture {
///         let headline = format!("House ad for {unit}");
///         async move { Ok(AdContent::new(headline)) }.boxed()
///     }
/// }
/// ```
pub trait AdLoader: Send + Sync + 'static {
    /// Starts one load for `unit`.
    ///
    /// The returned future must resolve exactly once and must not borrow from `self`.
    fn load(&self, unit: &AdUnitId, request: &AdRequest) -> LoadFuture;

    /// Receives the process-wide SDK settings whenever the host changes them.
    fn apply_settings(&self, _settings: &GlobalSettings) {}

    /// Returns the loader name, recorded on each load-started log line.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
