use std::sync::Arc;

use crate::content::{AdContent, AdUnitId};

/// Load state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No ad unit set yet.
    Idle,

    /// A load is in flight.
    Loading,

    /// The last load for the current ad unit failed.
    LoadError,

    /// Content for the current ad unit is available.
    LoadCompleted,
}

impl LoadState {
    /// Method name pushed over the host channel for this state.
    ///
    /// `Idle` is never announced.
    pub fn method(self) -> Option<&'static str> {
        match self {
            LoadState::Idle => None,
            LoadState::Loading => Some("loading"),
            LoadState::LoadError => Some("loadError"),
            LoadState::LoadCompleted => Some("loadCompleted"),
        }
    }

    #[inline]
    pub fn is_loading(self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// What a `set_ad_unit` / `reload` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A new load was handed to the loader.
    Started {
        /// Generation of the new load.
        generation: u64,
    },

    /// A load was already in flight; no second load was issued.
    Joined {
        /// Generation of the in-flight load.
        generation: u64,
    },

    /// Cached content was replayed; the loader was not called.
    Cached,
}

impl Dispatch {
    #[inline]
    pub fn is_started(self) -> bool {
        matches!(self, Dispatch::Started { .. })
    }
}

/// Content kept by a controller together with the load that produced it.
#[derive(Clone)]
pub(super) struct Cached {
    pub unit: AdUnitId,
    pub content: Arc<AdContent>,
}
