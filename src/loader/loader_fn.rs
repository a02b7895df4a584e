//! # Function-backed loader implementation.
//!
//! [`LoaderFn`] wraps a closure `Fn(AdUnitId, AdRequest) -> Future` so a host can adapt
//! an SDK call without a dedicated type. Each invocation of [`AdLoader::load`] calls
//! the closure once and boxes the returned future.
//!
//! # Example
//! ```
//! use admob_native::{AdContent, AdLoadError, AdLoader, AdRequest, AdUnitId, LoaderFn, LoaderRef};
//!
//! let loader: LoaderRef = LoaderFn::arc("house", |unit: AdUnitId, _req: AdRequest| async move {
//!     if unit.as_str().ends_with("/empty") {
//!         return Err(AdLoadError::NoFill);
//!     }
//!     Ok(AdContent::new("Try our app"))
//! });
//! assert_eq!(loader.name(), "house");
//! ```

use std::{borrow::Cow, future::Future, sync::Arc};

use futures::FutureExt;

use crate::content::{AdContent, AdUnitId};
use crate::error::AdLoadError;
use crate::loader::loader::{AdLoader, LoadFuture};
use crate::loader::request::AdRequest;

/// Function-backed loader.
pub struct LoaderFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> LoaderFn<F> {
    /// Creates a new function-backed loader.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the loader and returns it as a shared handle.
    pub fn arc<Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self>
    where
        F: Fn(AdUnitId, AdRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<AdContent, AdLoadError>> + Send + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> AdLoader for LoaderFn<F>
where
    F: Fn(AdUnitId, AdRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<AdContent, AdLoadError>> + Send + 'static,
{
    fn load(&self, unit: &AdUnitId, request: &AdRequest) -> LoadFuture {
        (self.f)(unit.clone(), request.clone()).boxed()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
