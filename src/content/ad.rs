//! # Loaded ad snapshot.
//!
//! [`AdContent`] is what a loader produces and what renderers paint. Every optional
//! field is checked independently with [`AdContent::has_field`]; renderers hide the
//! matching subview when a field is absent instead of relying on sentinel values.
//!
//! ## Example
//! ```rust
//! use admob_native::{AdContent, AdField};
//!
//! let ad = AdContent::new("Sunny Weather App")
//!     .with_body("Forecasts for every city")
//!     .with_star_rating(4.5)
//!     .with_call_to_action("Install");
//!
//! assert!(ad.is_valid());
//! assert!(ad.has_field(AdField::StarRating));
//! assert!(!ad.has_field(AdField::Price));
//! ```

use serde::{Deserialize, Serialize};

/// Optional fields of an [`AdContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdField {
    Body,
    Price,
    Store,
    Advertiser,
    StarRating,
    Icon,
    Media,
    CallToAction,
}

/// Image asset (icon) delivered with an ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdImage {
    /// Location of the image as reported by the SDK.
    pub url: String,
    /// Pixel scale of the image (1.0 when unknown).
    #[serde(default = "AdImage::default_scale")]
    pub scale: f64,
}

impl AdImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scale: Self::default_scale(),
        }
    }

    fn default_scale() -> f64 {
        1.0
    }
}

/// Main media asset (image or video) delivered with an ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    /// Width / height of the media.
    pub aspect_ratio: f64,
    #[serde(default)]
    pub has_video: bool,
}

/// Immutable snapshot of one loaded ad.
///
/// Each load produces a new snapshot; snapshots are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdContent {
    pub headline: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub advertiser: Option<String>,
    #[serde(default)]
    pub star_rating: Option<f64>,
    #[serde(default)]
    pub icon: Option<AdImage>,
    #[serde(default)]
    pub media: Option<MediaContent>,
    #[serde(default)]
    pub call_to_action: Option<String>,
}

impl AdContent {
    /// Creates a snapshot with only the headline set.
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            body: None,
            price: None,
            store: None,
            advertiser: None,
            star_rating: None,
            icon: None,
            media: None,
            call_to_action: None,
        }
    }

    /// A snapshot is displayable only when its headline is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.headline.trim().is_empty()
    }

    /// Returns `true` if the optional field carries a value.
    pub fn has_field(&self, field: AdField) -> bool {
        match field {
            AdField::Body => self.body.is_some(),
            AdField::Price => self.price.is_some(),
            AdField::Store => self.store.is_some(),
            AdField::Advertiser => self.advertiser.is_some(),
            AdField::StarRating => self.star_rating.is_some(),
            AdField::Icon => self.icon.is_some(),
            AdField::Media => self.media.is_some(),
            AdField::CallToAction => self.call_to_action.is_some(),
        }
    }

    #[inline]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[inline]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    #[inline]
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    #[inline]
    pub fn with_advertiser(mut self, advertiser: impl Into<String>) -> Self {
        self.advertiser = Some(advertiser.into());
        self
    }

    #[inline]
    pub fn with_star_rating(mut self, rating: f64) -> Self {
        self.star_rating = Some(rating);
        self
    }

    #[inline]
    pub fn with_icon(mut self, icon: AdImage) -> Self {
        self.icon = Some(icon);
        self
    }

    #[inline]
    pub fn with_media(mut self, media: MediaContent) -> Self {
        self.media = Some(media);
        self
    }

    #[inline]
    pub fn with_call_to_action(mut self, label: impl Into<String>) -> Self {
        self.call_to_action = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_is_independent_per_field() {
        let ad = AdContent::new("Headline")
            .with_icon(AdImage::new("https://example.com/icon.png"))
            .with_price("Free");

        assert!(ad.has_field(AdField::Icon));
        assert!(ad.has_field(AdField::Price));
        for field in [
            AdField::Body,
            AdField::Store,
            AdField::Advertiser,
            AdField::StarRating,
            AdField::Media,
            AdField::CallToAction,
        ] {
            assert!(!ad.has_field(field), "{field:?} should be absent");
        }
    }

    #[test]
    fn test_blank_headline_is_invalid() {
        assert!(!AdContent::new("   ").is_valid());
        assert!(AdContent::new("Go").is_valid());
    }

    #[test]
    fn test_deserialize_sparse_json() {
        let ad: AdContent = serde_json::from_str(
            r#"{"headline":"Hi","starRating":3.5,"media":{"aspectRatio":1.5}}"#,
        )
        .unwrap();
        assert_eq!(ad.star_rating, Some(3.5));
        assert_eq!(ad.media.as_ref().map(|m| m.has_video), Some(false));
        assert!(ad.body.is_none());
    }
}
