//! Client SDK for a remote configuration service.
//!
//! The SDK sends an app/device/user [`Context`] to the service, receives a
//! flat key→value configuration document, persists it locally, and serves
//! type-checked reads with caller-supplied defaults. A failed fetch never
//! touches the previously cached configuration; a read never touches the
//! network.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod store;
pub mod transport;
pub mod value;

mod client;

pub use client::Confetch;
pub use context::{Context, Location, Os, Platform, User};
pub use dispatcher::{Dispatcher, FromConfig};
pub use error::{FetchError, StoreError, ValueError};
pub use store::{ConfigMap, ConfigStore, FileStore, MemoryStore};
pub use transport::{Environment, HttpTransport, RawResponse, Transport};
pub use value::Value;
