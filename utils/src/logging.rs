//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Pick the default filter directive for the session layer.
///
/// The session config's debug flag (`BECOMING_DEBUG=1`) turns on debug
/// logging; `RUST_LOG` overrides everything when set.
fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the tracing subscriber.
pub fn init_tracing() {
    let debug = std::env::var("BECOMING_DEBUG").as_deref() == Ok("1");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_widens_filter() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }
}
