//! Runtime core: registry, configuration and the host-facing plugin.
//!
//! Internal modules:
//! - [`config`]: global runtime settings with sentinel-aware accessors;
//! - [`registry`]: keyed controller lifecycle (atomic create-or-get);
//! - [`plugin`]: command dispatch, global settings, view binding and shutdown;
//! - [`builder`]: assembles a plugin and starts its subscriber listener.

mod builder;
mod config;
mod plugin;
mod registry;

pub use builder::PluginBuilder;
pub use config::Config;
pub use plugin::Plugin;
pub use registry::Registry;
