//! Orchestration of the fetch-and-persist cycle and of typed reads.

use log::{debug, warn};

use crate::context::Context;
use crate::error::FetchError;
use crate::store::{ConfigMap, ConfigStore};
use crate::transport::Transport;
use crate::value::Value;

/// Projection from a stored [`Value`] to a caller-facing accessor type.
///
/// Implemented for the closed set `bool`, `i64`, `f64`, `String`,
/// `Vec<String>`, and `Vec<i64>`. A projection returns `None` on any shape
/// mismatch; it never fails loudly.
pub trait FromConfig: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromConfig for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromConfig for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromConfig for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        // Stored numbers are f64; only exact whole values in range project
        // to an integer.
        value.as_i64()
    }
}

impl FromConfig for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromConfig for Vec<String> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(String::from_value).collect()
    }
}

impl FromConfig for Vec<i64> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(i64::from_value).collect()
    }
}

/// Runs one fetch-and-persist cycle and serves typed reads.
///
/// The dispatcher owns no configuration state of its own: every read loads
/// from the store, and every successful fetch replaces the store wholesale.
/// No ordering is guaranteed across concurrently in-flight fetches; the
/// store reflects whichever persist lands last.
pub struct Dispatcher<T, S> {
    transport: T,
    store: S,
}

impl<T: Transport, S: ConfigStore> Dispatcher<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self { transport, store }
    }

    /// Fetches the configuration for `context` and commits it locally.
    ///
    /// Any classified failure leaves the previously stored configuration
    /// untouched; there is no partial write, no merge, and no automatic
    /// retry.
    pub async fn fetch(&self, context: &Context) -> Result<(), FetchError> {
        let payload = serde_json::to_vec(context).map_err(|_| FetchError::BadInput)?;

        let response = self.transport.send(payload).await?;
        if !(200..300).contains(&response.status) {
            return Err(FetchError::from_status(response.status, response.body));
        }

        let config: ConfigMap = serde_json::from_slice(&response.body).map_err(|e| {
            debug!("response body is not a flat object: {e}");
            FetchError::BadResponseFormat
        })?;

        self.store.replace(&config).map_err(|e| {
            warn!("failed to persist fetched configuration: {e}");
            FetchError::Unknown
        })
    }

    /// Reads `key` from the stored configuration, projected to `V`.
    ///
    /// Returns `default` when no configuration was ever stored, when the
    /// key is absent, or when the stored value has the wrong shape. The
    /// shape-mismatch case is deliberately silent towards the caller (a
    /// single malformed server field must not break every accessor); it is
    /// reported through the `log` facade instead.
    pub fn get<V: FromConfig>(&self, key: &str, default: V) -> V {
        let Some(config) = self.store.load() else {
            return default;
        };
        let Some(value) = config.get(key) else {
            return default;
        };
        match V::from_value(value) {
            Some(projected) => projected,
            None => {
                debug!("stored value for '{key}' does not match the requested type");
                default
            }
        }
    }

    /// The entire stored configuration, if any fetch ever succeeded.
    pub fn raw_config(&self) -> Option<ConfigMap> {
        self.store.load()
    }
}
