//! Ambient credential sources.
//!
//! A widget whose author did not type an API key may pick up a site-wide
//! default. The source is injected into the controller and consulted once,
//! at mount.

use std::env;
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

/// Environment variable read by [`EnvCredential::default`].
pub const DEFAULT_CREDENTIAL_VAR: &str = "FINNHUB_API_KEY";

/// Provider of a default API key.
pub trait CredentialSource: Send + Sync {
    /// The default key, or `None` if this source has none.
    fn default_credential(&self) -> Option<String>;
}

/// A fixed key, mostly useful for hosts that already resolved one.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(pub Option<String>);

impl CredentialSource for StaticCredential {
    fn default_credential(&self) -> Option<String> {
        self.0.as_deref().and_then(non_empty)
    }
}

/// Reads the key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential(pub String);

impl Default for EnvCredential {
    fn default() -> Self {
        Self(DEFAULT_CREDENTIAL_VAR.to_string())
    }
}

impl CredentialSource for EnvCredential {
    fn default_credential(&self) -> Option<String> {
        env::var(&self.0).ok().as_deref().and_then(non_empty)
    }
}

/// Reads the key from a file holding nothing but the key, such as `.key`.
#[derive(Debug, Clone)]
pub struct KeyFileCredential(pub PathBuf);

impl CredentialSource for KeyFileCredential {
    fn default_credential(&self) -> Option<String> {
        match fs::read_to_string(&self.0) {
            Ok(text) => non_empty(&text),
            Err(e) => {
                if self.0.exists() {
                    warn!("Failed to read key file {}: {}", self.0.display(), e);
                } else {
                    debug!("No key file at {}", self.0.display());
                }
                None
            }
        }
    }
}

/// Tries each source in order; the first non-empty key wins.
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `source` to the chain.
    pub fn with(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CredentialSource for CredentialChain {
    fn default_credential(&self) -> Option<String> {
        self.sources.iter().find_map(|s| s.default_credential())
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
