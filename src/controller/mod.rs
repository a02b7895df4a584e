//! Per-placement ad controllers.
//!
//! ## Contents
//! - [`AdController`] load-state machine, cache and renderer fan-out of one placement
//! - [`LoadState`], [`Dispatch`] observable state and the outcome of a load request
//! - [`Renderer`], [`RendererFn`], [`SubscriptionId`] view-layer consumers

mod core;
mod renderer;
mod state;

pub use core::AdController;
pub use renderer::{Renderer, RendererFn, SubscriptionId};
pub use state::{Dispatch, LoadState};
