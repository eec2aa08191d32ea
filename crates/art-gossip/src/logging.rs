//! Tracing subscriber setup.
//!
//! Our own crates log at the configured level while dependencies (reqwest,
//! hyper, rustls) stay at `warn`. `RUST_LOG` replaces the whole directive.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events follow the configured level.
const OWN_TARGETS: [&str; 2] = ["art_gossip", "art_gossip_core"];

/// Level for everything outside [`OWN_TARGETS`].
const DEPENDENCY_LEVEL: &str = "warn";

/// Map a configured level name onto a filter level. Unknown names fall back to `info`.
fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Build the `EnvFilter` directive for `level`; `verbose` forces at least `debug`.
pub fn filter_directive(level: &str, verbose: bool) -> String {
    let level = match normalize_level(level) {
        "trace" => "trace",
        _ if verbose => "debug",
        other => other,
    };
    let mut directive = DEPENDENCY_LEVEL.to_string();
    for target in OWN_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

/// Install the global subscriber. Output goes to stderr; stdout carries
/// dry-run captions and config output.
pub fn init(directive: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let registry = tracing_subscriber::registry().with(filter);

    if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// Initialize from the `[logging]` section. `--verbose` and `--json-logs` win.
pub fn init_from_config(config: &art_gossip_core::Config, verbose: bool, json_logs: bool) {
    let directive = filter_directive(&config.logging.level, verbose);
    let json_format = json_logs || config.logging.format.eq_ignore_ascii_case("json");
    init(&directive, json_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_applies_to_own_crates_only() {
        assert_eq!(
            filter_directive("info", false),
            "warn,art_gossip=info,art_gossip_core=info"
        );
        assert_eq!(
            filter_directive("error", false),
            "warn,art_gossip=error,art_gossip_core=error"
        );
    }

    #[test]
    fn level_names_are_normalized() {
        assert_eq!(filter_directive(" WARNING ", false), filter_directive("warn", false));
        assert_eq!(filter_directive("Debug", false), filter_directive("debug", false));
        assert_eq!(filter_directive("loud", false), filter_directive("info", false));
    }

    #[test]
    fn verbose_raises_to_debug_but_keeps_trace() {
        assert_eq!(
            filter_directive("warn", true),
            "warn,art_gossip=debug,art_gossip_core=debug"
        );
        assert_eq!(
            filter_directive("trace", true),
            "warn,art_gossip=trace,art_gossip_core=trace"
        );
    }

    #[test]
    fn directive_parses_as_env_filter() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(EnvFilter::try_new(filter_directive(level, false)).is_ok());
        }
    }
}
