//! Registry backend that shells out to `reg.exe query`

use super::{Architecture, RegistryBackend, RegistryQuery, RegistryValue};
use crate::error::{ProcessError, RegistryError};
use crate::process::{ExecOptions, ProcessService};
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// `<indent><name><4 spaces>REG_<TYPE>[<4 spaces><data>]`
static VALUE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(.+?)\s{4}(REG_[A-Z0-9_]+)(?:\s{4}(.*))?$").unwrap());

const REG_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// [`RegistryBackend`] that runs `reg.exe query` through a
/// [`ProcessService`] and parses its text output.
#[derive(Clone)]
pub struct RegExeBackend {
    process: Arc<dyn ProcessService>,
    program: String,
}

impl RegExeBackend {
    pub fn new(process: Arc<dyn ProcessService>) -> Self {
        Self {
            process,
            program: "reg".to_string(),
        }
    }

    async fn query(&self, query: &RegistryQuery, extra: &[&str]) -> Result<String, RegistryError> {
        let mut args = vec!["query".to_string(), query.full_key()];
        args.extend(extra.iter().map(|s| s.to_string()));
        if let Some(arch) = query.arch {
            args.push(view_flag(arch).to_string());
        }

        let options = ExecOptions::default().with_timeout(REG_QUERY_TIMEOUT);
        match self.process.exec(&self.program, &args, &options).await {
            Ok(output) => Ok(output.stdout),
            // reg.exe exits 1 for a missing key or value
            Err(ProcessError::NonZeroExit { code: Some(1), .. }) => {
                Err(RegistryError::KeyNotFound {
                    key: query.full_key(),
                })
            }
            Err(e) => Err(RegistryError::backend(query.full_key(), e.to_string())),
        }
    }
}

#[async_trait]
impl RegistryBackend for RegExeBackend {
    async fn subkeys(&self, query: &RegistryQuery) -> Result<Vec<String>, RegistryError> {
        let output = self.query(query, &[]).await?;
        Ok(parse_subkeys(&output, &query.full_key()))
    }

    async fn value(
        &self,
        query: &RegistryQuery,
        name: &str,
    ) -> Result<Option<RegistryValue>, RegistryError> {
        let output = if name.is_empty() {
            self.query(query, &["/ve"]).await
        } else {
            self.query(query, &["/v", name]).await
        };

        match output {
            Ok(output) => Ok(parse_value(&output, name)),
            // A missing value is not an error once we know the key exists
            Err(RegistryError::KeyNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn view_flag(arch: Architecture) -> &'static str {
    match arch {
        Architecture::X86 => "/reg:32",
        Architecture::X64 => "/reg:64",
    }
}

/// Subkey lines are unindented full key paths one level below `full_key`.
fn parse_subkeys(output: &str, full_key: &str) -> Vec<String> {
    let prefix = format!("{}\\", full_key.to_ascii_lowercase());

    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with(char::is_whitespace))
        .filter_map(|line| {
            // ASCII lowercasing keeps byte offsets aligned with `line`
            if !line.to_ascii_lowercase().starts_with(&prefix) {
                return None;
            }
            let rest = &line[prefix.len()..];
            (!rest.is_empty() && !rest.contains('\\')).then(|| rest.to_string())
        })
        .collect()
}

/// Find `name` in `reg query` output. An empty `name` means the default
/// value as printed by `/ve`.
///
/// `reg.exe` localizes the default value's label (`(Default)`,
/// `(Standard)`, ...) and its "not set" placeholder, so the default value is
/// taken from the only value line of `/ve` output, whatever its label. A
/// placeholder is recognized by shape: label and data both in parentheses.
fn parse_value(output: &str, name: &str) -> Option<RegistryValue> {
    output.lines().map(str::trim_end).find_map(|line| {
        let caps = VALUE_LINE.captures(line)?;
        let value_name = caps.get(1)?.as_str().trim();
        if !name.is_empty() && !value_name.eq_ignore_ascii_case(name) {
            return None;
        }
        let kind = caps.get(2)?.as_str();
        let data = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

        Some(match kind {
            "REG_SZ" if name.is_empty() && is_placeholder(value_name, data) => return None,
            "REG_SZ" => RegistryValue::String(data.to_string()),
            "REG_EXPAND_SZ" => RegistryValue::ExpandString(data.to_string()),
            other => RegistryValue::Other {
                kind: other.to_string(),
            },
        })
    })
}

fn is_placeholder(label: &str, data: &str) -> bool {
    let parenthesized = |text: &str| text.len() > 2 && text.starts_with('(') && text.ends_with(')');
    parenthesized(label) && parenthesized(data)
}
