//! # Inbound named calls.
//!
//! The host sends a method name plus an untyped argument map. [`Command::parse`]
//! validates that pair at the boundary and produces a typed [`Command`]; nothing past
//! this point sees untyped data.
//!
//! | method                                              | command                     |
//! |-----------------------------------------------------|-----------------------------|
//! | `initController`                                    | [`Command::InitController`] |
//! | `disposeController`                                 | [`Command::DisposeController`] |
//! | `setAdUnit`, `initAd`                               | [`Command::SetAdUnit`]      |
//! | `reloadAd`                                          | [`Command::Reload`]         |
//! | `setTestDeviceIds`, `setGlobalTestDeviceIds`        | [`Command::SetTestDeviceIds`] |
//! | `setNonPersonalizedAds`, `setGlobalNonPersonalizedAds` | [`Command::SetNonPersonalizedAds`] |
//! | `setOptions`                                        | [`Command::SetOptions`]     |

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::content::{AdUnitId, PlacementKey};
use crate::error::ControlError;
use crate::loader::AdRequest;
use crate::options::OptionsPatch;

/// Method name plus untyped arguments, as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Typed inbound operation.
#[derive(Debug, Clone)]
pub enum Command {
    InitController {
        key: PlacementKey,
    },
    DisposeController {
        key: PlacementKey,
    },
    SetAdUnit {
        key: PlacementKey,
        ad_unit: AdUnitId,
        request: AdRequest,
    },
    Reload {
        key: PlacementKey,
        force_refresh: bool,
    },
    SetTestDeviceIds {
        ids: Vec<String>,
    },
    SetNonPersonalizedAds {
        enabled: bool,
    },
    SetOptions {
        key: PlacementKey,
        view: String,
        patch: OptionsPatch,
    },
}

#[derive(Deserialize)]
struct ControllerArgs {
    #[serde(rename = "controllerID")]
    controller_id: Option<String>,
}

#[derive(Deserialize)]
struct SetAdUnitArgs {
    #[serde(rename = "controllerID")]
    controller_id: Option<String>,
    #[serde(rename = "adUnitID")]
    ad_unit_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReloadArgs {
    #[serde(rename = "controllerID")]
    controller_id: Option<String>,
    #[serde(default)]
    force_refresh: bool,
}

#[derive(Deserialize)]
struct TestDeviceArgs {
    ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalizationArgs {
    non_personalized_ads: Option<bool>,
}

#[derive(Deserialize)]
struct OptionsArgs {
    #[serde(rename = "controllerID")]
    controller_id: Option<String>,
    #[serde(rename = "viewID")]
    view_id: Option<String>,
    #[serde(default)]
    options: Value,
}

impl Command {
    /// Validates a host call.
    ///
    /// # Example
    /// ```
    /// use admob_native::{Command, MethodCall};
    /// use serde_json::json;
    ///
    /// let call = MethodCall::new("reloadAd", json!({ "controllerID": "home", "forceRefresh": true }));
    /// match Command::parse(&call).unwrap() {
    ///     Command::Reload { key, force_refresh } => {
    ///         assert_eq!(key.as_str(), "home");
    ///         assert!(force_refresh);
    ///     }
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    pub fn parse(call: &MethodCall) -> Result<Self, ControlError> {
        let method = call.method.as_str();
        let args = &call.arguments;

        match method {
            "initController" => {
                let a: ControllerArgs = decode(method, args)?;
                Ok(Command::InitController {
                    key: required(method, "controllerID", a.controller_id)?.into(),
                })
            }
            "disposeController" => {
                let a: ControllerArgs = decode(method, args)?;
                Ok(Command::DisposeController {
                    key: required(method, "controllerID", a.controller_id)?.into(),
                })
            }
            "setAdUnit" | "initAd" => {
                let a: SetAdUnitArgs = decode(method, args)?;
                let key: PlacementKey = required(method, "controllerID", a.controller_id)?.into();
                let ad_unit = AdUnitId::new(required(method, "adUnitID", a.ad_unit_id)?)?;
                let request: AdRequest = decode(method, args)?;
                Ok(Command::SetAdUnit {
                    key,
                    ad_unit,
                    request,
                })
            }
            "reloadAd" => {
                let a: ReloadArgs = decode(method, args)?;
                Ok(Command::Reload {
                    key: required(method, "controllerID", a.controller_id)?.into(),
                    force_refresh: a.force_refresh,
                })
            }
            "setTestDeviceIds" | "setGlobalTestDeviceIds" => {
                let a: TestDeviceArgs = decode(method, args)?;
                Ok(Command::SetTestDeviceIds {
                    ids: required(method, "ids", a.ids)?,
                })
            }
            "setNonPersonalizedAds" | "setGlobalNonPersonalizedAds" => {
                let a: PersonalizationArgs = decode(method, args)?;
                Ok(Command::SetNonPersonalizedAds {
                    enabled: required(method, "nonPersonalizedAds", a.non_personalized_ads)?,
                })
            }
            "setOptions" => {
                let a: OptionsArgs = decode(method, args)?;
                let key: PlacementKey = required(method, "controllerID", a.controller_id)?.into();
                let view = required(method, "viewID", a.view_id)?;
                let patch = OptionsPatch::from_value(&a.options).map_err(|e| {
                    ControlError::invalid(method, e.as_message())
                })?;
                Ok(Command::SetOptions { key, view, patch })
            }
            other => Err(ControlError::UnknownMethod {
                method: other.to_string(),
            }),
        }
    }

    /// Returns the placement key the command targets, if any.
    pub fn controller(&self) -> Option<&PlacementKey> {
        match self {
            Command::InitController { key }
            | Command::DisposeController { key }
            | Command::SetAdUnit { key, .. }
            | Command::Reload { key, .. }
            | Command::SetOptions { key, .. } => Some(key),
            Command::SetTestDeviceIds { .. } | Command::SetNonPersonalizedAds { .. } => None,
        }
    }
}

/// Decodes arguments; `null` is treated as an empty map.
fn decode<T: DeserializeOwned>(method: &str, args: &Value) -> Result<T, ControlError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args.clone()
    };
    serde_json::from_value(args).map_err(|e| ControlError::invalid(method, e))
}

fn required<T>(method: &str, name: &'static str, value: Option<T>) -> Result<T, ControlError> {
    value.ok_or_else(|| ControlError::MissingArgument {
        method: method.to_string(),
        name,
    })
}
