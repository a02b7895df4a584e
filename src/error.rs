//! Error types used by the controllers, the registry and the transport binding.
//!
//! This module defines two main error enums:
//!
//! - [`ControlError`]: synchronous failures of a host call (bad arguments, unknown
//!   controller, reload before any ad unit). Returned to the caller; never changes
//!   a controller's load state.
//! - [`AdLoadError`]: failures reported by an [`AdLoader`](crate::AdLoader).
//!   Never returned from a controller operation; turned into a `loadError`
//!   notification instead.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;

use thiserror::Error;

/// # Errors produced by a host call.
///
/// These represent configuration or programming errors on the caller's side.
/// They are surfaced through the call result, not through the notification stream.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// `reload` was requested before any ad unit was set on the controller.
    #[error("controller {controller:?} has no ad unit to load")]
    NoAdUnit {
        /// Placement key of the controller.
        controller: String,
    },

    /// An ad unit identifier was empty.
    #[error("ad unit id must not be empty")]
    EmptyAdUnit,

    /// A named operation referenced a controller that is not registered.
    #[error("unknown controller {controller:?}")]
    UnknownController {
        /// Placement key that was looked up.
        controller: String,
    },

    /// A named operation referenced a view that is not attached.
    #[error("unknown view {view:?} on controller {controller:?}")]
    UnknownView {
        /// Placement key of the controller.
        controller: String,
        /// View identifier that was looked up.
        view: String,
    },

    /// The transport delivered a method name the plugin does not handle.
    #[error("method {method:?} is not implemented")]
    UnknownMethod {
        /// The offending method name.
        method: String,
    },

    /// A required argument was absent.
    #[error("missing argument {name:?} for {method:?}")]
    MissingArgument {
        /// Method being dispatched.
        method: String,
        /// Name of the argument.
        name: &'static str,
    },

    /// Arguments were present but could not be decoded.
    #[error("invalid arguments for {method:?}: {reason}")]
    InvalidArgument {
        /// Method being dispatched.
        method: String,
        /// Decoder message.
        reason: String,
    },
}

impl ControlError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use admob_native::ControlError;
    ///
    /// let err = ControlError::NoAdUnit { controller: "home".into() };
    /// assert_eq!(err.as_label(), "control_no_ad_unit");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlError::NoAdUnit { .. } => "control_no_ad_unit",
            ControlError::EmptyAdUnit => "control_empty_ad_unit",
            ControlError::UnknownController { .. } => "control_unknown_controller",
            ControlError::UnknownView { .. } => "control_unknown_view",
            ControlError::UnknownMethod { .. } => "control_unknown_method",
            ControlError::MissingArgument { .. } => "control_missing_argument",
            ControlError::InvalidArgument { .. } => "control_invalid_argument",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ControlError::NoAdUnit { controller } => {
                format!("reload before set_ad_unit; controller={controller}")
            }
            ControlError::EmptyAdUnit => "empty ad unit id".to_string(),
            ControlError::UnknownController { controller } => {
                format!("not registered; controller={controller}")
            }
            ControlError::UnknownView { controller, view } => {
                format!("not attached; controller={controller} view={view}")
            }
            ControlError::UnknownMethod { method } => format!("not implemented; method={method}"),
            ControlError::MissingArgument { method, name } => {
                format!("missing argument; method={method} name={name}")
            }
            ControlError::InvalidArgument { method, reason } => {
                format!("invalid arguments; method={method} reason={reason}")
            }
        }
    }

    pub(crate) fn invalid(method: &str, reason: impl ToString) -> Self {
        ControlError::InvalidArgument {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// # Errors produced by an ad load.
///
/// The controller does not interpret these beyond "the load failed"; the code and
/// message are carried through to events and renderers untouched.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdLoadError {
    /// The ad network answered but had no inventory for the request.
    #[error("no fill")]
    NoFill,

    /// The request could not reach the ad network.
    #[error("network error: {message}")]
    Network {
        /// Transport-level description.
        message: String,
    },

    /// The SDK reported an error with its own code.
    #[error("sdk error {code}: {message}")]
    Sdk {
        /// SDK-defined error code.
        code: i32,
        /// SDK-provided description.
        message: String,
    },

    /// The load did not resolve within the configured load timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },
}

impl AdLoadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use admob_native::AdLoadError;
    ///
    /// let err = AdLoadError::Sdk { code: 3, message: "no ad config".into() };
    /// assert_eq!(err.as_label(), "load_sdk_error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AdLoadError::NoFill => "load_no_fill",
            AdLoadError::Network { .. } => "load_network_error",
            AdLoadError::Sdk { .. } => "load_sdk_error",
            AdLoadError::Timeout { .. } => "load_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            AdLoadError::NoFill => "no fill".to_string(),
            AdLoadError::Network { message } => format!("network: {message}"),
            AdLoadError::Sdk { code, message } => format!("sdk: code={code} {message}"),
            AdLoadError::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }

    /// Indicates whether a host-driven reload has a reasonable chance to succeed.
    ///
    /// The controller never retries on its own; this is advice for the host.
    /// Returns `true` for [`AdLoadError::Network`], [`AdLoadError::Timeout`] and
    /// [`AdLoadError::NoFill`].
    ///
    /// # Example
    /// ```
    /// use admob_native::AdLoadError;
    ///
    /// assert!(AdLoadError::NoFill.is_retryable());
    /// assert!(!AdLoadError::Sdk { code: 1, message: "invalid request".into() }.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AdLoadError::NoFill | AdLoadError::Network { .. } | AdLoadError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_labels_are_stable() {
        let err = ControlError::MissingArgument {
            method: "reloadAd".into(),
            name: "controllerID",
        };
        assert_eq!(err.as_label(), "control_missing_argument");
        assert_eq!(
            err.as_message(),
            "missing argument; method=reloadAd name=controllerID"
        );
    }

    #[test]
    fn test_load_error_display() {
        let err = AdLoadError::Sdk {
            code: 3,
            message: "no ad config".into(),
        };
        assert_eq!(err.to_string(), "sdk error 3: no ad config");
        assert_eq!(
            AdLoadError::Timeout {
                timeout: Duration::from_secs(2)
            }
            .as_label(),
            "load_timeout"
        );
    }
}
