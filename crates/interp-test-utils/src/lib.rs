//! Stub host collaborators for the interpreter-resolver workspace.
//!
//! Every stub counts the calls it receives so tests can assert which
//! discovery stages ran. Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`process`]: [`StubProcess`] with per-command canned responses
//! - [`fs`]: [`StubFilesystem`] and [`StubExpander`]
//! - [`registry`]: [`StubRegistry`] backend and [`StubInterpreterSource`]

pub mod fs;
pub mod process;
pub mod registry;

pub use fs::{StubExpander, StubFilesystem};
pub use process::StubProcess;
pub use registry::{StubInterpreterSource, StubRegistry};
