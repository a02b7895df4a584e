//! View binding.
//!
//! ## Contents
//! - [`Paint`] host drawing surface
//! - [`AdView`] renderer that keeps options and the last content, and repaints on change

mod view;

pub use view::{AdView, Paint};
