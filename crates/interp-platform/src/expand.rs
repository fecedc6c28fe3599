//! Home-directory (`~`) expansion

use std::path::PathBuf;

/// Expands a leading `~` to the user's home directory.
///
/// Pure and deterministic: no I/O beyond what the implementation captured
/// at construction time.
pub trait PathExpander: Send + Sync {
    fn expand_home(&self, path: &str) -> String;
}

/// [`PathExpander`] using the home directory reported by `dirs`.
///
/// `~`, `~/rest` and `~\rest` are expanded. `~user` forms and paths without
/// a leading tilde pass through unchanged, as does everything when no home
/// directory is known.
#[derive(Debug, Clone)]
pub struct HomeExpander {
    home: Option<PathBuf>,
}

impl HomeExpander {
    /// Create an expander for the current user's home directory.
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Create an expander with a fixed home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
        }
    }
}

impl Default for HomeExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PathExpander for HomeExpander {
    fn expand_home(&self, path: &str) -> String {
        let Some(home) = &self.home else {
            return path.to_string();
        };
        let Some(rest) = path.strip_prefix('~') else {
            return path.to_string();
        };

        if rest.is_empty() {
            return home.to_string_lossy().into_owned();
        }

        match rest.strip_prefix(['/', '\\']) {
            Some(relative) => home.join(relative).to_string_lossy().into_owned(),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case("/usr/bin/conda", "/usr/bin/conda")]
    #[case("conda", "conda")]
    #[case("~other/bin/conda", "~other/bin/conda")]
    #[case("bin/~/conda", "bin/~/conda")]
    fn test_paths_without_home_prefix_pass_through(#[case] input: &str, #[case] expected: &str) {
        let expander = HomeExpander::with_home("/home/tester");
        assert_eq!(expander.expand_home(input), expected);
    }

    #[test]
    fn test_bare_tilde_is_home() {
        let expander = HomeExpander::with_home("/home/tester");
        assert_eq!(expander.expand_home("~"), "/home/tester");
    }

    #[test]
    fn test_tilde_slash_joins_home() {
        let expander = HomeExpander::with_home("/home/tester");
        let expanded = expander.expand_home("~/miniconda3/bin/conda");
        assert_eq!(
            Path::new(&expanded),
            Path::new("/home/tester").join("miniconda3/bin/conda")
        );
    }

    #[test]
    fn test_no_home_leaves_path_unchanged() {
        let expander = HomeExpander { home: None };
        assert_eq!(expander.expand_home("~/anaconda/bin/conda"), "~/anaconda/bin/conda");
    }
}
