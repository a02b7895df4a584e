//! # Opaque identifiers.
//!
//! Both identifiers are cheap to clone (`Arc<str>`-backed) because they travel with
//! every event and every spawned load.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Host-supplied key of one controller (one logical ad slot).
///
/// Never generated internally; unique within a [`Registry`](crate::Registry).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementKey(Arc<str>);

impl PlacementKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlacementKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PlacementKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for PlacementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlacementKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Network-side inventory identifier an ad request targets.
///
/// Always non-empty; construction goes through [`AdUnitId::new`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AdUnitId(Arc<str>);

impl AdUnitId {
    /// Creates an ad unit id, rejecting empty (or all-whitespace) input.
    ///
    /// # Example
    /// ```
    /// use admob_native::{AdUnitId, ControlError};
    ///
    /// assert!(AdUnitId::new("ca-app-pub-3940256099942544/2247696110").is_ok());
    /// assert_eq!(AdUnitId::new("  "), Err(ControlError::EmptyAdUnit));
    /// ```
    pub fn new(id: impl Into<Arc<str>>) -> Result<Self, ControlError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ControlError::EmptyAdUnit);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AdUnitId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        AdUnitId::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AdUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AdUnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
