//! # Typed view options with partial-update merge.
//!
//! [`NativeAdOptions`] is the full configuration a renderer paints with.
//! [`OptionsPatch`] is what arrives from the host: every field optional, unknown keys
//! ignored. [`NativeAdOptions::merge`] applies only the fields present in the patch;
//! nested text styles merge field by field.
//!
//! ## Example
//! ```rust
//! use admob_native::{Color, NativeAdOptions, parse_options};
//! use serde_json::json;
//!
//! let opts = parse_options(&json!({
//!     "showMediaContent": false,
//!     "headlineTextStyle": { "fontSize": 18.0 },
//!     "somethingElse": 1
//! })).unwrap();
//!
//! assert!(!opts.show_media_content);
//! assert_eq!(opts.headline.font_size, 18.0);
//! assert_eq!(opts.headline.color, Color::BLACK); // untouched default
//! ```

use serde::Deserialize;
use serde_json::Value;

use super::color::Color;
use crate::error::ControlError;

/// Appearance of one text subview.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Color,
    pub background_color: Option<Color>,
    pub is_visible: bool,
    /// Typeface name, only honoured by renderers that support named fonts.
    pub ios_typeface: Option<String>,
}

impl TextStyle {
    pub fn new(font_size: f64, color: Color) -> Self {
        Self {
            font_size,
            color,
            background_color: None,
            is_visible: true,
            ios_typeface: None,
        }
    }

    fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Applies the fields present in `patch`.
    pub fn merge(&mut self, patch: TextStylePatch) {
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(background) = patch.background_color {
            self.background_color = Some(background);
        }
        if let Some(visible) = patch.is_visible {
            self.is_visible = visible;
        }
        if let Some(typeface) = patch.ios_typeface {
            self.ios_typeface = Some(typeface);
        }
    }
}

/// Full view configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeAdOptions {
    pub show_media_content: bool,
    pub background_color: Option<Color>,
    pub rating_color: Color,
    pub ad_label: TextStyle,
    pub headline: TextStyle,
    pub advertiser: TextStyle,
    pub body: TextStyle,
    pub store: TextStyle,
    pub price: TextStyle,
    pub call_to_action: TextStyle,
}

impl Default for NativeAdOptions {
    fn default() -> Self {
        Self {
            show_media_content: true,
            background_color: None,
            rating_color: Color::YELLOW,
            ad_label: TextStyle::new(12.0, Color::WHITE)
                .with_background(Color::from_argb(0xFFFF_CC66)),
            headline: TextStyle::new(16.0, Color::BLACK),
            advertiser: TextStyle::new(14.0, Color::BLACK),
            body: TextStyle::new(12.0, Color::GRAY),
            store: TextStyle::new(12.0, Color::BLACK),
            price: TextStyle::new(12.0, Color::BLACK),
            call_to_action: TextStyle::new(15.0, Color::WHITE)
                .with_background(Color::from_argb(0xFF4C_BE99)),
        }
    }
}

impl NativeAdOptions {
    /// Applies the fields present in `patch`, keeping everything else.
    pub fn merge(&mut self, patch: OptionsPatch) {
        if let Some(show) = patch.show_media_content {
            self.show_media_content = show;
        }
        if let Some(color) = patch.background_color {
            self.background_color = Some(color);
        }
        if let Some(color) = patch.rating_color {
            self.rating_color = color;
        }

        let styles = [
            (&mut self.ad_label, patch.ad_label_text_style),
            (&mut self.headline, patch.headline_text_style),
            (&mut self.advertiser, patch.advertiser_text_style),
            (&mut self.body, patch.body_text_style),
            (&mut self.store, patch.store_text_style),
            (&mut self.price, patch.price_text_style),
            (&mut self.call_to_action, patch.call_to_action_style),
        ];
        for (style, patch) in styles {
            if let Some(patch) = patch {
                style.merge(patch);
            }
        }
    }
}

/// Host-supplied partial update of a [`TextStyle`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStylePatch {
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub background_color: Option<Color>,
    pub is_visible: Option<bool>,
    pub ios_typeface: Option<String>,
}

/// Host-supplied partial update of [`NativeAdOptions`].
///
/// Keys follow the host's camelCase names. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsPatch {
    pub show_media_content: Option<bool>,
    pub background_color: Option<Color>,
    pub rating_color: Option<Color>,
    pub ad_label_text_style: Option<TextStylePatch>,
    pub headline_text_style: Option<TextStylePatch>,
    pub advertiser_text_style: Option<TextStylePatch>,
    pub body_text_style: Option<TextStylePatch>,
    pub store_text_style: Option<TextStylePatch>,
    pub price_text_style: Option<TextStylePatch>,
    pub call_to_action_style: Option<TextStylePatch>,
}

impl OptionsPatch {
    /// Decodes a patch from an untyped map. `null` is an empty patch.
    pub fn from_value(raw: &Value) -> Result<Self, ControlError> {
        if raw.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(raw).map_err(|e| ControlError::invalid("options", e))
    }
}

/// Parses a full option set: defaults merged with `raw`.
pub fn parse_options(raw: &Value) -> Result<NativeAdOptions, ControlError> {
    let mut options = NativeAdOptions::default();
    options.merge(OptionsPatch::from_value(raw)?);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_stock_look() {
        let o = NativeAdOptions::default();
        assert!(o.show_media_content);
        assert_eq!(o.rating_color, Color::YELLOW);
        assert_eq!(o.call_to_action.font_size, 15.0);
        assert_eq!(
            o.call_to_action.background_color,
            Some(Color::from_hex("#4CBE99").unwrap())
        );
        assert_eq!(o.body.color, Color::GRAY);
    }

    #[test]
    fn test_merge_is_partial_and_repeatable() {
        let mut o = NativeAdOptions::default();
        o.merge(OptionsPatch::from_value(&json!({ "bodyTextStyle": { "color": "#FF0000" } })).unwrap());
        o.merge(OptionsPatch::from_value(&json!({ "bodyTextStyle": { "fontSize": 20.0 } })).unwrap());

        assert_eq!(o.body.color, Color::from_hex("FF0000").unwrap());
        assert_eq!(o.body.font_size, 20.0);
        assert_eq!(o.headline, NativeAdOptions::default().headline);
    }

    #[test]
    fn test_null_is_empty_patch() {
        assert_eq!(parse_options(&Value::Null).unwrap(), NativeAdOptions::default());
    }

    #[test]
    fn test_ill_typed_value_is_rejected() {
        let err = parse_options(&json!({ "showMediaContent": "yes" })).unwrap_err();
        assert_eq!(err.as_label(), "control_invalid_argument");

        let err = parse_options(&json!({ "ratingColor": "not-a-color" })).unwrap_err();
        assert_eq!(err.as_label(), "control_invalid_argument");
    }

    #[test]
    fn test_visibility_and_typeface() {
        let o = parse_options(&json!({
            "adLabelTextStyle": { "isVisible": false, "iosTypeface": "Avenir" }
        }))
        .unwrap();
        assert!(!o.ad_label.is_visible);
        assert_eq!(o.ad_label.ios_typeface.as_deref(), Some("Avenir"));
        assert_eq!(o.ad_label.font_size, 12.0);
    }
}
