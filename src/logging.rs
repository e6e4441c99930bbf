use tracing::level_filters::LevelFilter;

/// Install the stderr log subscriber.
///
/// The level comes from `RUST_LOG`. Calling this more than once (tests,
/// embedding applications that set their own subscriber) is not an error.
pub fn init_logging() {
    let level = resolve_log_level();
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_log_level() -> LevelFilter {
    match std::env::var("RUST_LOG") {
        Ok(val) => level_from_str(&val),
        Err(_) => LevelFilter::INFO,
    }
}

fn level_from_str(value: &str) -> LevelFilter {
    match value.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_loosely() {
        assert_eq!(level_from_str("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(level_from_str(" warning "), LevelFilter::WARN);
        assert_eq!(level_from_str("harlens=trace"), LevelFilter::INFO);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
