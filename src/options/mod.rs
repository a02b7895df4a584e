//! View options.
//!
//! The plugin does not paint anything itself; it only keeps the typed configuration a
//! renderer needs and merges host updates into it.
//!
//! ## Contents
//! - [`NativeAdOptions`], [`TextStyle`] full configuration
//! - [`OptionsPatch`], [`TextStylePatch`] partial updates from the host
//! - [`Color`] hex color value
//! - [`parse_options`] defaults merged with an untyped map

mod color;
mod style;

pub use color::{Color, ColorParseError};
pub use style::{NativeAdOptions, OptionsPatch, TextStyle, TextStylePatch, parse_options};
