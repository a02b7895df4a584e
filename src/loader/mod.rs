//! # Ad loader seam.
//!
//! This module provides the types the controller talks to the ad network SDK through:
//! - [`AdLoader`] - trait wrapping the SDK's native-ad request
//! - [`LoaderFn`] - closure-backed loader implementation
//! - [`AdRequest`] - per-controller request parameters
//! - [`GlobalSettings`] - process-wide SDK settings (test devices, personalization)

mod loader;
mod loader_fn;
mod request;

pub use loader::{AdLoader, LoadFuture, LoaderRef};
pub use loader_fn::LoaderFn;
pub use request::{AdRequest, GlobalSettings};
