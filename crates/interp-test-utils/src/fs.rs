//! In-memory filesystem probe and fixed-home expander

use async_trait::async_trait;
use interp_platform::{FilesystemProbe, PathExpander};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// [`FilesystemProbe`] over a fixed set of existing paths.
#[derive(Debug, Default)]
pub struct StubFilesystem {
    existing: HashSet<PathBuf>,
    checked: Mutex<Vec<PathBuf>>,
}

impl StubFilesystem {
    /// A filesystem where nothing exists.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.existing.insert(path.into());
        self
    }

    /// Every path passed to `exists`, in call order.
    pub fn checked(&self) -> Vec<PathBuf> {
        self.checked.lock().unwrap().clone()
    }

    pub fn check_count(&self) -> usize {
        self.checked.lock().unwrap().len()
    }
}

#[async_trait]
impl FilesystemProbe for StubFilesystem {
    async fn exists(&self, path: &Path) -> bool {
        self.checked.lock().unwrap().push(path.to_path_buf());
        self.existing.contains(path)
    }
}

/// [`PathExpander`] that replaces a leading `~` with a fixed string.
#[derive(Debug)]
pub struct StubExpander {
    home: String,
    expansions: Mutex<usize>,
}

impl StubExpander {
    pub fn new(home: &str) -> Self {
        Self {
            home: home.to_string(),
            expansions: Mutex::new(0),
        }
    }

    pub fn expansion_count(&self) -> usize {
        *self.expansions.lock().unwrap()
    }
}

impl PathExpander for StubExpander {
    fn expand_home(&self, path: &str) -> String {
        *self.expansions.lock().unwrap() += 1;
        match path.strip_prefix('~') {
            Some(rest) => format!("{}{}", self.home, rest),
            None => path.to_string(),
        }
    }
}
