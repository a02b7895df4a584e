//! # Request parameters and global SDK settings.

use serde::{Deserialize, Deserializer, Serialize};

/// Per-controller request parameters.
///
/// Recorded by `set_ad_unit` and reused unchanged by `reload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdRequest {
    /// Targeting keywords. An explicit `null` reads as none.
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    /// URL of content related to the placement, for contextual targeting.
    pub content_url: Option<String>,
    /// Number of ads requested in one load (clamped to at least 1).
    #[serde(rename = "numberOfAds", deserialize_with = "at_least_one")]
    pub ad_count: u32,
    /// Marks the request as coming from a test device.
    pub test_device: bool,
}

impl Default for AdRequest {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            content_url: None,
            ad_count: 1,
            test_device: false,
        }
    }
}

impl AdRequest {
    #[inline]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_ad_count(mut self, count: u32) -> Self {
        self.ad_count = count.max(1);
        self
    }

    #[inline]
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = Some(url.into());
        self
    }

    #[inline]
    pub fn with_test_device(mut self, test_device: bool) -> Self {
        self.test_device = test_device;
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(1).max(1))
}

/// Process-wide SDK settings, passed through to the loader untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalSettings {
    pub test_device_ids: Vec<String>,
    pub non_personalized_ads: bool,
}
