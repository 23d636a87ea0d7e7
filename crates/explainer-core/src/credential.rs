//! API key handling
//!
//! The key is read from several sources in precedence order and validated
//! once per analysis request. An invalid key never fails a request; it only
//! switches the pipeline to the synthesized (demo) path.

use explainer_shared::CredentialError;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Sentinel meaning "no remote calls"
pub const DEMO_MODE: &str = "demo-mode";

/// Required key prefix
pub const KEY_PREFIX: &str = "sk-";

/// Minimum length accepted when a key is stored from settings
pub const MIN_STORED_KEY_LENGTH: usize = 20;

/// A validated API key
pub struct Credential {
    secret: SecretString,
}

impl Credential {
    /// Validate `raw` and wrap it
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let trimmed = raw.trim();
        validate_format(trimmed)?;
        Ok(Self {
            secret: SecretString::from(trimmed.to_string()),
        })
    }

    /// Value for the `Authorization: Bearer` header
    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self {
            secret: SecretString::from(self.expose().to_string()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("secret", &"[REDACTED]").finish()
    }
}

/// Format predicate: non-empty, not the demo sentinel, `sk-` prefixed
pub fn validate_format(key: &str) -> Result<(), CredentialError> {
    if key.is_empty() {
        return Err(CredentialError::Empty);
    }
    if key == DEMO_MODE {
        return Err(CredentialError::DemoMode);
    }
    if !key.starts_with(KEY_PREFIX) {
        return Err(CredentialError::MissingPrefix);
    }
    Ok(())
}

pub fn is_valid_format(key: &str) -> bool {
    validate_format(key).is_ok()
}

/// Stricter check applied before a key is persisted from settings
pub fn validate_for_storage(key: &str) -> Result<(), CredentialError> {
    validate_format(key)?;
    if key.len() < MIN_STORED_KEY_LENGTH {
        return Err(CredentialError::TooShort {
            length: key.len(),
            min_length: MIN_STORED_KEY_LENGTH,
        });
    }
    Ok(())
}

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Override,
    Environment,
    Settings,
    DemoMode,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Override => write!(f, "override"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Settings => write!(f, "settings"),
            CredentialSource::DemoMode => write!(f, "demo-mode"),
        }
    }
}

/// Raw candidate values, highest precedence first
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialSources<'a> {
    pub override_key: Option<&'a str>,
    pub env_key: Option<&'a str>,
    pub persisted_key: Option<&'a str>,
}

/// Outcome of credential resolution
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub source: CredentialSource,
    pub credential: Option<Credential>,
    pub rejected: Option<CredentialError>,
}

impl ResolvedCredential {
    fn demo() -> Self {
        Self {
            source: CredentialSource::DemoMode,
            credential: None,
            rejected: None,
        }
    }
}

/// Pick the first non-blank source, then validate it.
///
/// A rejected key does not fall through to lower-precedence sources.
pub fn resolve_credential(sources: CredentialSources<'_>) -> ResolvedCredential {
    let candidates = [
        (CredentialSource::Override, sources.override_key),
        (CredentialSource::Environment, sources.env_key),
        (CredentialSource::Settings, sources.persisted_key),
    ];

    let Some((source, raw)) = candidates
        .into_iter()
        .find_map(|(source, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (source, v)))
    else {
        return ResolvedCredential::demo();
    };

    match Credential::parse(raw) {
        Ok(credential) => ResolvedCredential {
            source,
            credential: Some(credential),
            rejected: None,
        },
        Err(error) => ResolvedCredential {
            source,
            credential: None,
            rejected: Some(error),
        },
    }
}
