//! Conda executable resolution
//!
//! Resolution pipeline, first success wins:
//!
//! 1. **PATH**: `conda --version` prints something, so the bare command name
//!    is used and the OS keeps resolving it at every invocation.
//! 2. **Registry**: only with an [`InterpreterSource`] on a registry-bearing
//!    platform. The newest Anaconda/Continuum interpreter's sibling
//!    `conda.exe` is used if it exists; otherwise the bare command name.
//! 3. **Known locations**: the configured `~`-relative candidates are checked
//!    concurrently and the first existing one in list order is used;
//!    otherwise the bare command name.
//!
//! The result is memoized for the lifetime of the resolver and never
//! invalidated.

use crate::config::ResolverConfig;
use crate::registry_source::WindowsRegistrySource;
use crate::version::compare_versions;
use futures_util::future::join_all;
use interp_platform::{
    ExecOptions, FilesystemProbe, HomeExpander, InterpreterRecord, InterpreterSource,
    PathExpander, ProcessService, RegExeBackend, RegistryReader, TokioFilesystemProbe,
    TokioProcessService,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;

/// Vendor markers, matched case-insensitively. Branding differs between
/// releases, so either one identifies a conda distribution.
const DISPLAY_NAME_MARKER: &str = "ANACONDA";
const COMPANY_MARKER: &str = "CONTINUUM";

/// Where the memoized executable path is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Resolving,
    Resolved,
}

/// Cached outcome of [`CondaResolver::is_conda_available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityState {
    Unknown,
    Available,
    Unavailable,
}

/// Finds the conda executable and answers version/availability queries.
///
/// Construct with [`CondaResolver::builder`] or [`CondaResolver::for_host`].
/// None of the operations fail: "conda is not installed" is reported as
/// `None`/`false` or as a path that does not work, never as an error.
pub struct CondaResolver {
    process: Arc<dyn ProcessService>,
    filesystem: Arc<dyn FilesystemProbe>,
    expander: Arc<dyn PathExpander>,
    interpreter_source: Option<Arc<dyn InterpreterSource>>,
    registry_platform: bool,
    config: ResolverConfig,
    conda_file: OnceCell<String>,
    resolving: AtomicBool,
    availability: OnceCell<bool>,
}

/// Builder for [`CondaResolver`].
pub struct CondaResolverBuilder {
    process: Arc<dyn ProcessService>,
    filesystem: Option<Arc<dyn FilesystemProbe>>,
    expander: Option<Arc<dyn PathExpander>>,
    interpreter_source: Option<Arc<dyn InterpreterSource>>,
    registry_platform: bool,
    config: ResolverConfig,
}

impl CondaResolverBuilder {
    /// Existence checks; defaults to [`TokioFilesystemProbe`].
    pub fn filesystem(mut self, filesystem: Arc<dyn FilesystemProbe>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    /// `~` expansion; defaults to [`HomeExpander`].
    pub fn expander(mut self, expander: Arc<dyn PathExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    /// Registry-derived interpreters. Without one the registry stage is
    /// skipped entirely.
    pub fn interpreter_source(mut self, source: Arc<dyn InterpreterSource>) -> Self {
        self.interpreter_source = Some(source);
        self
    }

    /// Whether the registry stage may run. Defaults to `cfg!(windows)`.
    pub fn registry_platform(mut self, registry_platform: bool) -> Self {
        self.registry_platform = registry_platform;
        self
    }

    /// Command name, version arguments and known locations; defaults to
    /// [`ResolverConfig::default`].
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Finish construction. Nothing is probed until the first query.
    pub fn build(self) -> CondaResolver {
        CondaResolver {
            process: self.process,
            filesystem: self
                .filesystem
                .unwrap_or_else(|| Arc::new(TokioFilesystemProbe::new())),
            expander: self
                .expander
                .unwrap_or_else(|| Arc::new(HomeExpander::new())),
            interpreter_source: self.interpreter_source,
            registry_platform: self.registry_platform,
            config: self.config,
            conda_file: OnceCell::new(),
            resolving: AtomicBool::new(false),
            availability: OnceCell::new(),
        }
    }
}

/// Clears the resolving flag even if the resolution future is dropped.
struct ResolvingGuard<'a>(&'a AtomicBool);

impl<'a> ResolvingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CondaResolver {
    /// Start building a resolver around `process`, which runs every
    /// `conda --version` probe.
    pub fn builder(process: Arc<dyn ProcessService>) -> CondaResolverBuilder {
        CondaResolverBuilder {
            process,
            filesystem: None,
            expander: None,
            interpreter_source: None,
            registry_platform: cfg!(windows),
            config: ResolverConfig::default(),
        }
    }

    /// A resolver wired to the real host: `tokio` processes and filesystem,
    /// the user's home directory, and on Windows the registry through
    /// `reg.exe`.
    pub fn for_host(config: ResolverConfig) -> Self {
        let process: Arc<dyn ProcessService> = Arc::new(TokioProcessService::new());
        let mut builder = Self::builder(process.clone()).config(config);
        if cfg!(windows) {
            let registry = RegistryReader::new(Arc::new(RegExeBackend::new(process)));
            builder = builder.interpreter_source(Arc::new(WindowsRegistrySource::new(registry)));
        }
        builder.build()
    }

    /// The configuration this resolver was built with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The conda executable to invoke.
    ///
    /// Either the bare command name (resolved through `PATH` by the OS at
    /// each use) or an absolute path. Resolved once; concurrent callers
    /// share the same in-flight resolution.
    pub async fn executable_path(&self) -> String {
        self.conda_file
            .get_or_init(|| self.resolve())
            .await
            .clone()
    }

    pub fn resolution_state(&self) -> ResolutionState {
        if self.conda_file.initialized() {
            ResolutionState::Resolved
        } else if self.resolving.load(Ordering::Acquire) {
            ResolutionState::Resolving
        } else {
            ResolutionState::Unresolved
        }
    }

    /// Whether `conda --version` succeeds. Probed once per resolver.
    pub async fn is_conda_available(&self) -> bool {
        *self
            .availability
            .get_or_init(|| async { self.conda_version().await.is_some() })
            .await
    }

    pub fn availability(&self) -> AvailabilityState {
        match self.availability.get() {
            None => AvailabilityState::Unknown,
            Some(true) => AvailabilityState::Available,
            Some(false) => AvailabilityState::Unavailable,
        }
    }

    /// Trimmed output of `<conda> --version`, or `None` if the command
    /// cannot run, fails, or prints nothing.
    pub async fn conda_version(&self) -> Option<String> {
        let conda = self.executable_path().await;
        tracing::debug!(%conda, "probing conda version");

        match self
            .process
            .exec(&conda, &self.config.version_args, &ExecOptions::default())
            .await
        {
            Ok(output) => {
                let version = output.stdout.trim();
                if version.is_empty() {
                    tracing::debug!(%conda, "conda printed no version");
                    return None;
                }
                tracing::debug!(%conda, version, "conda version found");
                Some(version.to_string())
            }
            Err(e) => {
                tracing::debug!(%conda, error = %e, "conda version probe failed (ignored)");
                None
            }
        }
    }

    /// Whether `record` looks like an Anaconda/Continuum installation.
    pub fn is_conda_environment(record: &InterpreterRecord) -> bool {
        let contains = |field: &Option<String>, marker: &str| {
            field
                .as_deref()
                .is_some_and(|value| value.to_uppercase().contains(marker))
        };
        contains(&record.display_name, DISPLAY_NAME_MARKER)
            || contains(&record.company_display_name, COMPANY_MARKER)
    }

    /// The record with the highest version. Records without a version are
    /// ignored; among equal versions the last one wins.
    pub fn latest_version(records: &[InterpreterRecord]) -> Option<&InterpreterRecord> {
        records
            .iter()
            .filter_map(|record| match record.version.as_deref() {
                Some(version) if !version.is_empty() => Some((version, record)),
                _ => None,
            })
            .max_by(|(a, _), (b, _)| compare_versions(a, b))
            .map(|(_, record)| record)
    }

    /// Whether the bare command runs and prints something.
    pub async fn is_conda_in_current_path(&self) -> bool {
        match self
            .process
            .exec(
                &self.config.command,
                &self.config.version_args,
                &ExecOptions::default(),
            )
            .await
        {
            Ok(output) => !output.stdout.is_empty(),
            Err(e) => {
                tracing::debug!(error = %e, "conda is not on PATH");
                false
            }
        }
    }

    async fn resolve(&self) -> String {
        let _guard = ResolvingGuard::enter(&self.resolving);

        tracing::debug!("checking for conda on PATH");
        if self.is_conda_in_current_path().await {
            tracing::debug!(command = %self.config.command, "conda found on PATH");
            return self.config.command.clone();
        }

        if self.registry_platform {
            if let Some(source) = &self.interpreter_source {
                return self.conda_file_from_registry(source.as_ref()).await;
            }
        }

        self.conda_file_from_known_locations().await
    }

    async fn conda_file_from_registry(&self, source: &dyn InterpreterSource) -> String {
        let interpreters = source.interpreters().await;
        let conda_interpreters: Vec<InterpreterRecord> = interpreters
            .into_iter()
            .filter(Self::is_conda_environment)
            .collect();

        let Some(latest) = Self::latest_version(&conda_interpreters) else {
            tracing::debug!("no versioned conda interpreter in the registry");
            return self.config.command.clone();
        };

        let candidate = sibling_executable(&latest.path, &self.config.windows_executable);
        if self.filesystem.exists(Path::new(&candidate)).await {
            tracing::debug!(conda = %candidate, "conda found via registry");
            candidate
        } else {
            // No retry with the next-best registered interpreter
            tracing::debug!(conda = %candidate, "registry-derived conda does not exist");
            self.config.command.clone()
        }
    }

    async fn conda_file_from_known_locations(&self) -> String {
        let candidates: Vec<String> = self
            .config
            .known_locations
            .iter()
            .map(|location| self.expander.expand_home(location))
            .collect();

        let checks = candidates
            .iter()
            .map(|candidate| self.filesystem.exists(Path::new(candidate)));
        let results = join_all(checks).await;

        match candidates
            .into_iter()
            .zip(results)
            .find_map(|(candidate, exists)| exists.then_some(candidate))
        {
            Some(found) => {
                tracing::debug!(conda = %found, "conda found in a known location");
                found
            }
            None => {
                tracing::debug!("conda not found in any known location");
                self.config.command.clone()
            }
        }
    }
}

/// `executable` in the directory containing `interpreter`. Both `\` and `/`
/// count as separators so registry paths work on any host.
fn sibling_executable(interpreter: &str, executable: &str) -> String {
    match interpreter.rfind(['\\', '/']) {
        Some(idx) => format!("{}{}", &interpreter[..=idx], executable),
        None => executable.to_string(),
    }
}
