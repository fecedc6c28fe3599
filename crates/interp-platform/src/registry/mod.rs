//! Windows registry access
//!
//! [`RegistryBackend`] is the raw, fallible view of the registry.
//! [`RegistryReader`] wraps a backend and converts every failure into an
//! empty answer: a missing key, a denied read and a platform without a
//! registry all look the same to callers, because for discovery they mean
//! the same thing.

mod reg_exe;

pub use reg_exe::RegExeBackend;

use crate::error::RegistryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Registry root namespace.
///
/// Only the current-user and local-machine hives are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hive {
    #[serde(rename = "HKCU")]
    CurrentUser,
    #[serde(rename = "HKLM")]
    LocalMachine,
}

impl Hive {
    /// Parse a hive name in short (`HKCU`) or long (`HKEY_CURRENT_USER`)
    /// form. Any other hive yields `None`, which makes the query
    /// unresolvable.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "HKCU" | "HKEY_CURRENT_USER" => Some(Self::CurrentUser),
            "HKLM" | "HKEY_LOCAL_MACHINE" => Some(Self::LocalMachine),
            _ => None,
        }
    }

    /// Short form accepted by `reg.exe`.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
        }
    }

    /// Long form printed by `reg.exe` in query output.
    pub fn long_name(&self) -> &'static str {
        match self {
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
        }
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Registry view on a dual-architecture OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    /// Parse `x86` or `x64`. Anything else means "no preference".
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x86" => Some(Self::X86),
            "x64" => Some(Self::X64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }

    /// Human-readable bitness; empty when no architecture is known.
    pub fn display_name(arch: Option<Self>) -> &'static str {
        match arch {
            Some(Self::X64) => "64-bit",
            Some(Self::X86) => "32-bit",
            None => "",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryQuery {
    pub hive: Hive,
    /// `None` lets the backend pick its default view
    pub arch: Option<Architecture>,
    pub key: String,
}

impl RegistryQuery {
    pub fn new(hive: Hive, arch: Option<Architecture>, key: impl Into<String>) -> Self {
        Self {
            hive,
            arch,
            key: key.into(),
        }
    }

    /// `HKEY_...\key`, with surrounding backslashes removed from the key.
    pub fn full_key(&self) -> String {
        let key = self.key.trim_matches('\\');
        if key.is_empty() {
            self.hive.long_name().to_string()
        } else {
            format!("{}\\{}", self.hive.long_name(), key)
        }
    }
}

/// A typed registry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryValue {
    /// `REG_SZ`
    String(String),
    /// `REG_EXPAND_SZ`, unexpanded
    ExpandString(String),
    /// Any other type; only the type name is kept
    Other { kind: String },
}

impl RegistryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::ExpandString(s) => Some(s),
            Self::Other { .. } => None,
        }
    }
}

/// Raw registry access.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Names of the immediate subkeys of `query.key`.
    async fn subkeys(&self, query: &RegistryQuery) -> Result<Vec<String>, RegistryError>;

    /// The value called `name` under `query.key`; an empty name means the
    /// key's default value. `Ok(None)` when the key exists but the value
    /// does not.
    async fn value(
        &self,
        query: &RegistryQuery,
        name: &str,
    ) -> Result<Option<RegistryValue>, RegistryError>;
}

/// Backend for hosts without a registry.
#[derive(Debug, Clone, Default)]
pub struct NoRegistryBackend;

#[async_trait]
impl RegistryBackend for NoRegistryBackend {
    async fn subkeys(&self, _query: &RegistryQuery) -> Result<Vec<String>, RegistryError> {
        Err(RegistryError::Unavailable)
    }

    async fn value(
        &self,
        _query: &RegistryQuery,
        _name: &str,
    ) -> Result<Option<RegistryValue>, RegistryError> {
        Err(RegistryError::Unavailable)
    }
}

/// Infallible registry reads.
#[derive(Clone)]
pub struct RegistryReader {
    backend: Arc<dyn RegistryBackend>,
}

impl RegistryReader {
    pub fn new(backend: Arc<dyn RegistryBackend>) -> Self {
        Self { backend }
    }

    /// Reader over `reg.exe` on Windows and over [`NoRegistryBackend`]
    /// everywhere else.
    pub fn for_host() -> Self {
        if cfg!(windows) {
            Self::new(Arc::new(RegExeBackend::new(Arc::new(
                crate::process::TokioProcessService::new(),
            ))))
        } else {
            Self::new(Arc::new(NoRegistryBackend))
        }
    }

    /// Subkey names under `key`; empty when the key is missing or
    /// unreadable.
    pub async fn keys(&self, key: &str, hive: Hive, arch: Option<Architecture>) -> Vec<String> {
        let query = RegistryQuery::new(hive, arch, key);
        tracing::debug!(hive = %hive, arch = ?arch, key, "reading registry subkeys");

        match self.backend.subkeys(&query).await {
            Ok(keys) => keys,
            Err(e) => {
                log_failure(&query, &e);
                Vec::new()
            }
        }
    }

    /// String value `name` under `key` (`""` for the default value); `None`
    /// when missing, not a string, or unreadable.
    pub async fn value(
        &self,
        key: &str,
        hive: Hive,
        arch: Option<Architecture>,
        name: &str,
    ) -> Option<String> {
        let query = RegistryQuery::new(hive, arch, key);
        tracing::debug!(hive = %hive, arch = ?arch, key, name, "reading registry value");

        match self.backend.value(&query, name).await {
            Ok(Some(value)) => value.as_str().map(str::to_string),
            Ok(None) => None,
            Err(e) => {
                log_failure(&query, &e);
                None
            }
        }
    }
}

fn log_failure(query: &RegistryQuery, error: &RegistryError) {
    match error {
        RegistryError::KeyNotFound { .. } | RegistryError::Unavailable => {
            tracing::debug!(key = %query.full_key(), %error, "registry lookup found nothing");
        }
        RegistryError::Backend { .. } => {
            tracing::warn!(key = %query.full_key(), %error, "registry lookup failed");
        }
    }
}
