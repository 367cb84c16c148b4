use env_logger::{Builder, Env};
use log::{warn, LevelFilter};

/// `RUST_LOG` wins over the configured level; an unknown level falls back to info.
pub fn init(level: &str) {
    let filter = parse_level(level).unwrap_or(LevelFilter::Info);
    let env = Env::default().default_filter_or(filter.as_str());
    let _ = Builder::from_env(env).format_timestamp_secs().try_init();
    if parse_level(level).is_none() {
        warn!("unknown log level {level:?}, using info");
    }
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" warn "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("bogus"), None);
    }
}
