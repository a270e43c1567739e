//! Diagnostic logging for the binary

use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when `RUST_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "stockup=debug"
    } else {
        "warn"
    }
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins over `-v`. Calling this twice is harmless; the second
/// subscriber is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "stockup=debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
