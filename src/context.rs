//! The outbound request payload describing app, device, user, and metadata.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Platform the SDK is embedded in. Closed set; the wire strings are fixed
/// by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "android")]
    Android,
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "watchOS")]
    WatchOs,
}

/// Optional user attributes attached to a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<u32>,
}

impl User {
    pub fn new(age: Option<u32>) -> Self {
        Self { age }
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct App {
    version: String,
}

/// Operating system identity, nested under [`Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Os {
    platform: Platform,
    version: String,
}

impl Os {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Locale and timezone of the device, nested under [`Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    locale: String,
    #[serde(rename = "timezoneOffset")]
    timezone_offset: i32,
}

impl Location {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Seconds east of UTC, captured when the context was built.
    pub fn timezone_offset(&self) -> i32 {
        self.timezone_offset
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Device {
    location: Location,
    os: Os,
}

/// Immutable request payload sent with each fetch.
///
/// A context is built once per [`render`](crate::Confetch::render) call and
/// serialized exactly once. The wire form is a JSON object with exactly the
/// keys `app`, `device`, `metadata`, `user`; the optional two are omitted
/// entirely when absent, never emitted as `null`.
///
/// ## Example
///
/// ```
/// use confetch::{Context, Platform, User, Value};
///
/// let context = Context::new("8.6.0", "en_US", Platform::Ios, "11.0")
///     .with_user(User::new(Some(20)))
///     .with_metadata([("name", Value::from("testName"))].into_iter().collect());
///
/// assert_eq!(context.os().version(), "11.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    app: App,
    device: Device,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl Context {
    /// Builds a context for the current device state.
    ///
    /// The timezone offset is computed here from the caller's current local
    /// timezone; it is not accepted as an input.
    pub fn new(
        app_version: impl Into<String>,
        locale: impl Into<String>,
        platform: Platform,
        os_version: impl Into<String>,
    ) -> Self {
        let timezone_offset = chrono::Local::now().offset().local_minus_utc();

        Self {
            app: App {
                version: app_version.into(),
            },
            device: Device {
                location: Location {
                    locale: locale.into(),
                    timezone_offset,
                },
                os: Os {
                    platform,
                    version: os_version.into(),
                },
            },
            metadata: None,
            user: None,
        }
    }

    /// Attaches a free-form metadata blob.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attaches user attributes.
    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// The operating system identity. Derived from the nested device block;
    /// never stored separately from it.
    pub fn os(&self) -> &Os {
        &self.device.os
    }

    /// The device location. Derived from the nested device block; never
    /// stored separately from it.
    pub fn location(&self) -> &Location {
        &self.device.location
    }

    pub fn app_version(&self) -> &str {
        &self.app.version
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
