//! Conda executable resolution.
//!
//! [`CondaResolver`] finds the `conda` executable by trying, in order, the
//! `PATH`, interpreters registered in the Windows registry, and a list of
//! well-known install locations. The winning path is memoized for the life
//! of the resolver. Discovery never fails: every strategy that cannot
//! answer hands over to the next, and the last resort is the bare command
//! name.

pub mod conda;
pub mod config;
pub mod error;
pub mod registry_source;
pub mod version;

pub use conda::{AvailabilityState, CondaResolver, CondaResolverBuilder, ResolutionState};
pub use config::ResolverConfig;
pub use error::{Error, Result};
pub use interp_platform::{InterpreterRecord, InterpreterSource};
pub use registry_source::WindowsRegistrySource;
pub use version::{compare_versions, sort_versions};
