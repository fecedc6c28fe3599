//! Command implementations

use colored::Colorize;
use interp_locator::{CondaResolver, InterpreterRecord, InterpreterSource, ResolverConfig};
use interp_platform::Architecture;
use std::path::Path;
use std::process::ExitCode;

use crate::error::{CliError, Result};

/// Load the resolver configuration, falling back to defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading resolver config");
            Ok(ResolverConfig::load(path)?)
        }
        None => Ok(ResolverConfig::default()),
    }
}

pub async fn run_conda_path(resolver: &CondaResolver) -> Result<ExitCode> {
    println!("{}", resolver.executable_path().await);
    Ok(ExitCode::SUCCESS)
}

pub async fn run_conda_version(resolver: &CondaResolver) -> Result<ExitCode> {
    match resolver.conda_version().await {
        Some(version) => {
            println!("{version}");
            Ok(ExitCode::SUCCESS)
        }
        None => Err(CliError::user(format!(
            "conda not available (tried {})",
            resolver.executable_path().await
        ))),
    }
}

pub async fn run_conda_available(resolver: &CondaResolver) -> Result<ExitCode> {
    let available = resolver.is_conda_available().await;
    println!("{available}");
    Ok(if available {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn run_interpreters(
    source: Option<&dyn InterpreterSource>,
    json: bool,
) -> Result<ExitCode> {
    let records = match source {
        Some(source) => source.interpreters().await,
        None => Vec::new(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(ExitCode::SUCCESS);
    }

    if records.is_empty() {
        println!("{}", "No registered interpreters found.".dimmed());
        return Ok(ExitCode::SUCCESS);
    }

    let latest_conda = latest_conda_path(&records);
    println!("{}", "Registered Interpreters".bold());
    for record in &records {
        println!("  {}", describe(record, latest_conda == Some(record.path.as_str())));
    }
    Ok(ExitCode::SUCCESS)
}

/// Path of the newest conda interpreter, the one the registry stage would pick.
fn latest_conda_path(records: &[InterpreterRecord]) -> Option<&str> {
    let conda: Vec<InterpreterRecord> = records
        .iter()
        .filter(|record| CondaResolver::is_conda_environment(record))
        .cloned()
        .collect();
    let latest = CondaResolver::latest_version(&conda)?;
    records
        .iter()
        .find(|record| record.path == latest.path)
        .map(|record| record.path.as_str())
}

fn describe(record: &InterpreterRecord, latest_conda: bool) -> String {
    let mut line = record.path.clone();
    if let Some(version) = &record.version {
        line.push_str(&format!(" {}", version.cyan()));
    }
    let arch = Architecture::display_name(record.architecture);
    if !arch.is_empty() {
        line.push_str(&format!(" ({arch})"));
    }
    if CondaResolver::is_conda_environment(record) {
        line.push_str(&format!(" {}", "[conda]".green()));
    }
    if latest_conda {
        line.push_str(&format!(" {}", "latest".green().bold()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.command, "conda");
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let result = load_config(Some(Path::new("/nonexistent/interp/resolver.toml")));
        assert!(matches!(result, Err(CliError::Locator(_))));
    }

    #[test]
    fn test_describe_marks_conda_environments() {
        colored::control::set_override(false);
        let record = InterpreterRecord::new("C:\\Anaconda3\\python.exe")
            .with_display_name("Anaconda 2020.11")
            .with_version("3.8")
            .with_architecture(Architecture::X64);

        assert_eq!(
            describe(&record, true),
            "C:\\Anaconda3\\python.exe 3.8 (64-bit) [conda] latest"
        );
    }

    #[test]
    fn test_latest_conda_ignores_newer_plain_interpreters() {
        let records = vec![
            InterpreterRecord::new("C:\\Anaconda3\\python.exe")
                .with_display_name("Anaconda3")
                .with_version("3.6"),
            InterpreterRecord::new("C:\\Python311\\python.exe")
                .with_display_name("Python 3.11 (64-bit)")
                .with_version("3.11.4"),
        ];

        assert_eq!(latest_conda_path(&records), Some("C:\\Anaconda3\\python.exe"));
    }

    #[test]
    fn test_latest_conda_without_conda_records() {
        let records = vec![InterpreterRecord::new("C:\\Python311\\python.exe").with_version("3.11.4")];
        assert_eq!(latest_conda_path(&records), None);
    }

    #[test]
    fn test_describe_plain_interpreter() {
        colored::control::set_override(false);
        let record = InterpreterRecord::new("C:\\Python39\\python.exe");
        assert_eq!(describe(&record, false), "C:\\Python39\\python.exe");
    }
}
