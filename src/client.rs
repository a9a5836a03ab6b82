//! Public entry point wiring the default collaborators together.

use std::path::Path;

use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::error::FetchError;
use crate::store::{ConfigMap, FileStore};
use crate::transport::{Environment, HttpTransport};

/// Remote-configuration client with typed, default-backed reads.
///
/// Wraps a [`Dispatcher`] over the default collaborators: an HTTP transport
/// built from the given [`Environment`] and a file-backed store under
/// `store_dir`. Callers needing a custom transport or store can assemble a
/// [`Dispatcher`] directly.
///
/// ## Example
///
/// ```no_run
/// use confetch::{Confetch, Context, Environment, Platform};
///
/// # async fn run() -> Result<(), confetch::FetchError> {
/// let environment = Environment::new("testToken", "baseConfig1", "config.example.com");
/// let client = Confetch::new(environment, "/var/lib/myapp");
///
/// let context = Context::new("8.6.0", "en_US", Platform::Ios, "11.0");
/// client.render(&context).await?;
///
/// let enabled = client.get_bool("newOnboarding", false);
/// # Ok(())
/// # }
/// ```
pub struct Confetch {
    dispatcher: Dispatcher<HttpTransport, FileStore>,
}

impl Confetch {
    /// Creates a client talking to `environment`, persisting fetched
    /// configuration under `store_dir`.
    pub fn new(environment: Environment, store_dir: impl AsRef<Path>) -> Self {
        Self {
            dispatcher: Dispatcher::new(
                HttpTransport::new(environment),
                FileStore::new(store_dir),
            ),
        }
    }

    /// Fetches the configuration for `context` and commits it locally.
    ///
    /// On failure the previously cached configuration stays readable and
    /// unchanged. Fetching again is the caller's decision; nothing is
    /// retried here.
    pub async fn render(&self, context: &Context) -> Result<(), FetchError> {
        self.dispatcher.fetch(context).await
    }

    /// The boolean for `key`, or `default` if the key is missing, the store
    /// is empty, or the stored value has another shape.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.dispatcher.get(key, default)
    }

    /// The string for `key`, or `default` on any miss or shape mismatch.
    pub fn get_string(&self, key: &str, default: String) -> String {
        self.dispatcher.get(key, default)
    }

    /// The integer for `key`, or `default` on any miss or shape mismatch.
    /// Stored whole-valued floats project to integers.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.dispatcher.get(key, default)
    }

    /// The string list for `key`, or `default` on any miss or mismatch
    /// (including lists with non-string elements).
    pub fn get_string_list(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.dispatcher.get(key, default)
    }

    /// The integer list for `key`, or `default` on any miss or mismatch
    /// (including lists with non-integer elements).
    pub fn get_int_list(&self, key: &str, default: Vec<i64>) -> Vec<i64> {
        self.dispatcher.get(key, default)
    }

    /// The entire stored configuration, or `None` before the first
    /// successful fetch.
    pub fn raw_config(&self) -> Option<ConfigMap> {
        self.dispatcher.raw_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(dir: &Path) -> Confetch {
        let environment = Environment::new("testToken", "baseConfig1", "config.example.com");
        Confetch::new(environment, dir)
    }

    #[test]
    fn test_reads_before_first_fetch_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(dir.path());

        assert_eq!(client.get_bool("boolVal1", false), false);
        assert_eq!(client.get_int("numberVal1", 1234), 1234);
        assert_eq!(
            client.get_string("stringVal1", "defaultStringValue".into()),
            "defaultStringValue"
        );
        assert_eq!(
            client.get_string_list("stringListVal1", vec!["v1".into(), "v2".into()]),
            vec!["v1", "v2"]
        );
        assert_eq!(
            client.get_int_list("numberListVal1", vec![1, 2, 3, 4, 5]),
            vec![1, 2, 3, 4, 5]
        );
        assert!(client.raw_config().is_none());
    }

    #[test]
    fn test_reads_see_previously_persisted_configuration() {
        use crate::store::{ConfigStore, FileStore};
        use crate::value::Value;

        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path())
            .replace(&[("n".to_string(), Value::from(42))].into_iter().collect())
            .unwrap();

        let client = client(dir.path());
        assert_eq!(client.get_int("n", 7), 42);
        assert!(client.raw_config().is_some());
    }
}
