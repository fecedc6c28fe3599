//! Interpreters registered in the Windows registry (PEP 514)
//!
//! Layout: `Software\Python\<Company>\<Tag>` under HKCU and under both
//! architecture views of HKLM. The company key carries a `DisplayName`; each
//! tag carries `DisplayName`, `Version`/`SysVersion`, `SysArchitecture` and an
//! `InstallPath` subkey whose `ExecutablePath` (or default value, the install
//! directory) locates the interpreter.

use async_trait::async_trait;
use interp_platform::{Architecture, Hive, InterpreterRecord, InterpreterSource, RegistryReader};
use std::collections::HashSet;

const PYTHON_KEY: &str = "Software\\Python";

/// Company key of the `py.exe` launcher, which is not an interpreter.
const PY_LAUNCHER: &str = "PyLauncher";

const SEARCH_VIEWS: [(Hive, Option<Architecture>); 3] = [
    (Hive::CurrentUser, None),
    (Hive::LocalMachine, Some(Architecture::X64)),
    (Hive::LocalMachine, Some(Architecture::X86)),
];

/// [`InterpreterSource`] enumerating PEP 514 registrations.
#[derive(Clone)]
pub struct WindowsRegistrySource {
    registry: RegistryReader,
}

impl WindowsRegistrySource {
    pub fn new(registry: RegistryReader) -> Self {
        Self { registry }
    }

    async fn read_tag(
        &self,
        hive: Hive,
        arch: Option<Architecture>,
        company: &str,
        company_display_name: Option<&str>,
        tag: &str,
    ) -> Option<InterpreterRecord> {
        let tag_key = format!("{PYTHON_KEY}\\{company}\\{tag}");
        let install_key = format!("{tag_key}\\InstallPath");

        let path = match self
            .registry
            .value(&install_key, hive, arch, "ExecutablePath")
            .await
        {
            Some(exe) if !exe.is_empty() => exe,
            _ => {
                let dir = self.registry.value(&install_key, hive, arch, "").await?;
                if dir.is_empty() {
                    return None;
                }
                join_windows(&dir, "python.exe")
            }
        };

        let mut record = InterpreterRecord::new(path).with_company(company);
        record.company_display_name = company_display_name.map(str::to_string);
        record.display_name = self.registry.value(&tag_key, hive, arch, "DisplayName").await;

        record.version = match self.registry.value(&tag_key, hive, arch, "Version").await {
            Some(v) if !v.is_empty() => Some(v),
            _ => self.registry.value(&tag_key, hive, arch, "SysVersion").await,
        };

        record.architecture = self
            .registry
            .value(&tag_key, hive, arch, "SysArchitecture")
            .await
            .and_then(|a| parse_sys_architecture(&a))
            .or(arch);

        Some(record)
    }
}

#[async_trait]
impl InterpreterSource for WindowsRegistrySource {
    async fn interpreters(&self) -> Vec<InterpreterRecord> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for (hive, arch) in SEARCH_VIEWS {
            for company in self.registry.keys(PYTHON_KEY, hive, arch).await {
                if company.eq_ignore_ascii_case(PY_LAUNCHER) {
                    continue;
                }
                let company_key = format!("{PYTHON_KEY}\\{company}");
                let company_display_name = self
                    .registry
                    .value(&company_key, hive, arch, "DisplayName")
                    .await;

                for tag in self.registry.keys(&company_key, hive, arch).await {
                    let Some(record) = self
                        .read_tag(hive, arch, &company, company_display_name.as_deref(), &tag)
                        .await
                    else {
                        tracing::debug!(%hive, %company, %tag, "registered interpreter has no install path");
                        continue;
                    };
                    // HKLM views can alias each other on 32-bit hosts
                    if seen.insert(record.path.to_lowercase()) {
                        records.push(record);
                    }
                }
            }
        }

        tracing::debug!(count = records.len(), "registry interpreters found");
        records
    }
}

/// `SysArchitecture` values are `"32bit"` / `"64bit"`.
fn parse_sys_architecture(value: &str) -> Option<Architecture> {
    match value.to_ascii_lowercase().as_str() {
        "32bit" => Some(Architecture::X86),
        "64bit" => Some(Architecture::X64),
        _ => None,
    }
}

fn join_windows(dir: &str, file: &str) -> String {
    if dir.ends_with(['\\', '/']) {
        format!("{dir}{file}")
    } else {
        format!("{dir}\\{file}")
    }
}
