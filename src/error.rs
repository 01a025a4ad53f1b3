use crate::host::HostValue;
use wasm_bindgen::JsValue;

/// Failures of the detection helpers themselves.
///
/// Downstream failures (e.g. the user refusing a connection) never show up
/// here, they are reported by the provider as a [`ProviderError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    /// nothing responded before the timeout elapsed
    #[error("No provider detected at `window.{slot}' within {timeout_ms}ms (found: {observed}).")]
    Timeout {
        timeout_ms: u64,
        slot: String,
        observed: String,
    },
    /// something announced itself as ready but the object is missing or
    /// does not expose the expected operations
    #[error("Received `{event}' but `window.{slot}' is not a valid provider (found: {observed}).")]
    InvalidAnnouncement {
        event: String,
        slot: String,
        observed: String,
    },
    #[error("No browser window available, providers cannot be injected here.")]
    Unavailable,
    #[error("The wait for the provider was interrupted before settling.")]
    Interrupted,
    /// the host refused to arm the timeout, the wait could never end
    #[error("Couldn't arm the detection timeout: {0}")]
    Timer(#[source] HostError),
}

/// Failures of the hosting environment. These are recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("No global window object")]
    NoWindow,
    #[error("Couldn't dispatch `{event}': {reason}")]
    Dispatch { event: String, reason: String },
    #[error("Couldn't arm a timer: {reason}")]
    Timer { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum ProviderErrorCode {
    #[error("The user rejected the request.")]
    UserRejected,
    #[error("The requested method and/or account has not been authorized by the user.")]
    Unauthorized,
    #[error("The provider does not support the requested method.")]
    UnsupportedMethod,
    /// If this error happens we might need to wait for the wallet to reconnect.
    #[error("The provider is disconnected from all chains.")]
    Disconnected,
    #[error("The provider is not connected to the requested chain.")]
    ChainDisconnected,
    #[error("Invalid method parameters.")]
    InvalidParams,
    #[error("An error occured during the execution of this API call.")]
    Internal,
    #[error("Unknown error code `{0}'")]
    Unknown(i64),
}

impl From<i64> for ProviderErrorCode {
    fn from(code: i64) -> Self {
        match code {
            4001 => Self::UserRejected,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 => Self::Disconnected,
            4901 => Self::ChainDisconnected,
            -32602 => Self::InvalidParams,
            -32603 => Self::Internal,
            unknown => Self::Unknown(unknown),
        }
    }
}

/// Error reported by an injected provider, as `{ code, message }`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error, serde::Deserialize,
)]
#[error("{code} {message}")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub message: String,
}

impl ProviderError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ProviderErrorCode::Internal,
            message: message.into(),
        }
    }

    /// decode the value a provider's promise was rejected with
    ///
    /// Hosts are not always consistent: plain `Error` objects without a
    /// `code` are reported as [`ProviderErrorCode::Internal`] keeping the
    /// original message.
    pub(crate) fn from_js(error: JsValue) -> Self {
        match serde_wasm_bindgen::from_value::<ProviderError>(error.clone()) {
            Ok(error) => error,
            Err(decode_error) => Self::from_rejection(&error, decode_error),
        }
    }

    /// rejections that aren't `{ code, message }`: plain strings, then
    /// anything with a `message`
    fn from_rejection<V: HostValue>(error: &V, decode_error: impl std::fmt::Display) -> Self {
        if let Some(message) = error.as_string() {
            return Self::internal(message);
        }
        match error.property("message").and_then(|message| message.as_string()) {
            Some(message) => Self::internal(message),
            None => Self::internal(format!(
                "Couldn't decode the error content: {decode_error} ({})",
                error.describe()
            )),
        }
    }
}

impl<'de> serde::Deserialize<'de> for ProviderErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = ProviderErrorCode;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "Expecting an integer ProviderErrorCode")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ProviderErrorCode::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v)
                    .map(ProviderErrorCode::from)
                    .map_err(|_| E::custom(format!("error code `{v}' out of range")))
            }

            // JS numbers come as floats through serde-wasm-bindgen
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.fract() == 0.0 {
                    Ok(ProviderErrorCode::from(v as i64))
                } else {
                    Err(E::custom(format!("error code `{v}' is not an integer")))
                }
            }
        }

        deserializer.deserialize_i64(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_error_code_json() {
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { 4001 }).unwrap(),
            ProviderErrorCode::UserRejected
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { 4100 }).unwrap(),
            ProviderErrorCode::Unauthorized
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { 4200 }).unwrap(),
            ProviderErrorCode::UnsupportedMethod
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { 4900 }).unwrap(),
            ProviderErrorCode::Disconnected
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { 4901 }).unwrap(),
            ProviderErrorCode::ChainDisconnected
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { -32602 }).unwrap(),
            ProviderErrorCode::InvalidParams
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { -32603 }).unwrap(),
            ProviderErrorCode::Internal
        );
        assert_eq!(
            serde_json::from_value::<ProviderErrorCode>(json! { 42 }).unwrap(),
            ProviderErrorCode::Unknown(42)
        );
    }

    #[test]
    fn provider_error_json() {
        assert_eq!(
            serde_json::from_value::<ProviderError>(json! { {
                "code": 4001,
                "message": "User rejected the request.",
            }})
            .unwrap(),
            ProviderError {
                code: ProviderErrorCode::UserRejected,
                message: "User rejected the request.".to_owned()
            }
        );

        assert_eq!(
            serde_json::from_value::<ProviderError>(json! { {
                "code": 4200,
                "message": "signPskt is not implemented",
                "stack": "Error: signPskt is not implemented",
            }})
            .unwrap(),
            ProviderError {
                code: ProviderErrorCode::UnsupportedMethod,
                message: "signPskt is not implemented".to_owned()
            }
        );

        assert!(serde_json::from_value::<ProviderError>(json! { { "message": "boom" } }).is_err());
    }

    #[test]
    fn timeout_message_mentions_the_duration() {
        let error = DetectError::Timeout {
            timeout_ms: 3000,
            slot: "kaspa".to_owned(),
            observed: "undefined".to_owned(),
        };
        let message = error.to_string();
        assert!(message.contains("3000ms"), "{message}");
        assert!(message.contains("window.kaspa"), "{message}");
        assert!(message.contains("undefined"), "{message}");
    }

    #[test]
    fn string_rejections_keep_their_text() {
        use crate::host::mock::MockValue;

        let error = ProviderError::from_rejection(
            &MockValue::Str("User rejected the request".to_owned()),
            "invalid type: string",
        );
        assert_eq!(error.code, ProviderErrorCode::Internal);
        assert_eq!(error.message, "User rejected the request");

        let error = ProviderError::from_rejection(
            &MockValue::object([("message", MockValue::Str("Wallet locked".to_owned()))]),
            "missing field `code`",
        );
        assert_eq!(error.message, "Wallet locked");

        let error = ProviderError::from_rejection(&MockValue::Bool(false), "invalid type: boolean");
        assert_eq!(
            error.message,
            "Couldn't decode the error content: invalid type: boolean (false)"
        );
    }
}
