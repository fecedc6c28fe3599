//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize a tracing subscriber that writes compact logs to stderr.
///
/// The `RUST_LOG` environment variable takes precedence; `default_directive`
/// (e.g. `"warn"` or `"interp_locator=debug"`) applies when it is unset.
/// Stdout is left alone so command output stays scriptable.
pub fn init(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, warn};

    #[test]
    fn test_logging_init() {
        // Only the first init in a process succeeds
        let _ = init("debug");

        debug!("This is a debug message");
        info!("This is an info message");
        warn!("This is a warning message");
    }

    #[test]
    fn test_second_init_fails_cleanly() {
        let _ = init("info");
        assert!(init("info").is_err());
    }
}
