//! Host collaborators for interpreter resolution.
//!
//! Everything that touches the operating system lives here behind a narrow
//! trait: process execution, registry reads, filesystem existence checks and
//! home-directory expansion. Discovery logic in `interp-locator` only ever
//! sees these traits, so every strategy can be exercised with stubs.

pub mod error;
pub mod expand;
pub mod fs;
pub mod interpreter;
pub mod logging;
pub mod process;
pub mod registry;

pub use error::{ProcessError, RegistryError};
pub use expand::{HomeExpander, PathExpander};
pub use fs::{FilesystemProbe, TokioFilesystemProbe};
pub use interpreter::{InterpreterRecord, InterpreterSource};
pub use process::{ExecOptions, ProcessOutput, ProcessService, TokioProcessService};
pub use registry::{
    Architecture, Hive, NoRegistryBackend, RegExeBackend, RegistryBackend, RegistryQuery,
    RegistryReader, RegistryValue,
};
