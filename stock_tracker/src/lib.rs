//! Stock tracker widget core.
//!
//! The [`RefreshController`] keeps a widget's quotes in sync with its
//! attributes. Around it:
//! - `api`: the [`QuoteApi`] boundary and the Finnhub implementation.
//! - `credentials`: ambient sources of a default API key.
//! - `observer`: structural change detection on watched attributes.
//! - `timer`: the auto-refresh timer handle.
//! - `state`: fetch progress and the snapshot handed to the presentation.
//! - `view`: which placeholder, error or grid the presentation draws.
#![warn(missing_docs)]
pub mod api;
pub mod controller;
pub mod credentials;
pub mod observer;
pub mod state;
pub mod timer;
pub mod view;

pub use api::{FetchError, FinnhubClient, FinnhubConfig, QuoteApi};
pub use controller::{ControllerBuilder, RefreshController};
pub use credentials::{
    CredentialChain, CredentialSource, EnvCredential, KeyFileCredential, StaticCredential,
};
pub use state::{FetchState, WidgetSnapshot};
pub use view::{GridRow, WidgetView};
