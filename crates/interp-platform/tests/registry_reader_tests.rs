//! Integration tests for RegistryReader over stub and reg.exe backends

use interp_platform::{
    Architecture, Hive, RegExeBackend, RegistryReader, RegistryValue,
};
use interp_test_utils::{StubProcess, StubRegistry};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const PYTHON: &str = "Software\\Python";

// ==========================================================================
// Failure conversion
// ==========================================================================

#[tokio::test]
async fn test_keys_empty_when_backend_fails() {
    let reader = RegistryReader::new(Arc::new(StubRegistry::failing()));

    let keys = reader.keys(PYTHON, Hive::CurrentUser, None).await;

    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_value_none_when_backend_fails() {
    let reader = RegistryReader::new(Arc::new(StubRegistry::failing()));

    let value = reader
        .value(PYTHON, Hive::LocalMachine, Some(Architecture::X64), "DisplayName")
        .await;

    assert_eq!(value, None);
}

#[tokio::test]
async fn test_missing_key_is_empty_not_error() {
    let reader = RegistryReader::new(Arc::new(StubRegistry::new()));

    assert!(reader.keys(PYTHON, Hive::CurrentUser, None).await.is_empty());
    assert_eq!(reader.value(PYTHON, Hive::CurrentUser, None, "").await, None);
}

#[tokio::test]
async fn test_non_string_value_is_none() {
    let registry = StubRegistry::new().with_typed_value(
        Hive::CurrentUser,
        None,
        PYTHON,
        "Flags",
        RegistryValue::Other {
            kind: "REG_DWORD".to_string(),
        },
    );
    let reader = RegistryReader::new(Arc::new(registry));

    assert_eq!(reader.value(PYTHON, Hive::CurrentUser, None, "Flags").await, None);
}

// ==========================================================================
// Successful reads
// ==========================================================================

#[tokio::test]
async fn test_keys_and_values_per_view() {
    let registry = StubRegistry::new()
        .with_key(Hive::LocalMachine, Some(Architecture::X64), PYTHON, &["PythonCore"])
        .with_key(Hive::LocalMachine, Some(Architecture::X86), PYTHON, &["ContinuumAnalytics"])
        .with_value(
            Hive::LocalMachine,
            Some(Architecture::X86),
            PYTHON,
            "",
            "default data",
        );
    let reader = RegistryReader::new(Arc::new(registry));

    assert_eq!(
        reader.keys(PYTHON, Hive::LocalMachine, Some(Architecture::X64)).await,
        vec!["PythonCore"]
    );
    assert_eq!(
        reader.keys(PYTHON, Hive::LocalMachine, Some(Architecture::X86)).await,
        vec!["ContinuumAnalytics"]
    );
    assert_eq!(
        reader
            .value(PYTHON, Hive::LocalMachine, Some(Architecture::X86), "")
            .await
            .as_deref(),
        Some("default data")
    );
    // No preference view is a distinct view
    assert!(reader.keys(PYTHON, Hive::LocalMachine, None).await.is_empty());
}

// ==========================================================================
// reg.exe backend
// ==========================================================================

#[tokio::test]
async fn test_reg_exe_backend_lists_subkeys() {
    let process = Arc::new(StubProcess::new().succeed_with_args(
        "reg",
        &["query", "HKEY_CURRENT_USER\\Software\\Python", "/reg:64"],
        "\nHKEY_CURRENT_USER\\Software\\Python\\ContinuumAnalytics\nHKEY_CURRENT_USER\\Software\\Python\\PythonCore\n",
    ));
    let reader = RegistryReader::new(Arc::new(RegExeBackend::new(process.clone())));

    let keys = reader
        .keys(PYTHON, Hive::CurrentUser, Some(Architecture::X64))
        .await;

    assert_eq!(keys, vec!["ContinuumAnalytics", "PythonCore"]);
    assert_eq!(process.call_count(), 1);
}

#[tokio::test]
async fn test_reg_exe_backend_reads_named_value() {
    let process = Arc::new(StubProcess::new().succeed_with_args(
        "reg",
        &[
            "query",
            "HKEY_LOCAL_MACHINE\\Software\\Python\\ContinuumAnalytics",
            "/v",
            "DisplayName",
        ],
        "\nHKEY_LOCAL_MACHINE\\Software\\Python\\ContinuumAnalytics\n    DisplayName    REG_SZ    Continuum Analytics, Inc.\n",
    ));
    let reader = RegistryReader::new(Arc::new(RegExeBackend::new(process)));

    let value = reader
        .value(
            "Software\\Python\\ContinuumAnalytics",
            Hive::LocalMachine,
            None,
            "DisplayName",
        )
        .await;

    assert_eq!(value.as_deref(), Some("Continuum Analytics, Inc."));
}

#[tokio::test]
async fn test_reg_exe_missing_key_is_empty() {
    let process = Arc::new(StubProcess::new().exit(
        "reg",
        1,
        "ERROR: The system was unable to find the specified registry key or value.",
    ));
    let reader = RegistryReader::new(Arc::new(RegExeBackend::new(process)));

    assert!(reader.keys(PYTHON, Hive::CurrentUser, None).await.is_empty());
    assert_eq!(reader.value(PYTHON, Hive::CurrentUser, None, "").await, None);
}

#[tokio::test]
async fn test_reg_exe_not_installed_is_empty() {
    // StubProcess::new() knows no commands, like a host without reg.exe
    let reader = RegistryReader::new(Arc::new(RegExeBackend::new(Arc::new(StubProcess::new()))));

    assert!(reader.keys(PYTHON, Hive::LocalMachine, None).await.is_empty());
}
