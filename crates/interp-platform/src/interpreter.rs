//! Interpreter records and the sources that produce them

use crate::registry::Architecture;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One discovered interpreter installation.
///
/// Produced by an [`InterpreterSource`] and only ever read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterRecord {
    /// Path to the interpreter executable
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Vendor display name, e.g. "Continuum Analytics, Inc."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Registry company key the record was found under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
}

impl InterpreterRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_company_display_name(mut self, name: impl Into<String>) -> Self {
        self.company_display_name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_architecture(mut self, arch: Architecture) -> Self {
        self.architecture = Some(arch);
        self
    }
}

/// Produces the interpreter installations known to some discovery backend.
///
/// Sources swallow their own failures: an unreadable backend yields an
/// empty list.
#[async_trait]
pub trait InterpreterSource: Send + Sync {
    async fn interpreters(&self) -> Vec<InterpreterRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_sets_fields() {
        let record = InterpreterRecord::new("C:\\Anaconda3\\python.exe")
            .with_display_name("Anaconda 5.2.0 (64-bit)")
            .with_company_display_name("Anaconda, Inc.")
            .with_version("3.6.5")
            .with_architecture(Architecture::X64);

        assert_eq!(record.path, "C:\\Anaconda3\\python.exe");
        assert_eq!(record.display_name.as_deref(), Some("Anaconda 5.2.0 (64-bit)"));
        assert_eq!(record.version.as_deref(), Some("3.6.5"));
        assert_eq!(record.architecture, Some(Architecture::X64));
        assert!(record.company.is_none());
    }
}
