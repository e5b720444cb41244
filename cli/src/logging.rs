use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;

fn filter_level(quiet: bool, verbose: u8) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`/`-q`.
pub fn setup_logging(args: &Cli) {
    let level = filter_level(args.quiet, args.verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("registry_check={level},registry_check_core={level}"))
    });

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_flags() {
        assert_eq!(filter_level(true, 0), Level::ERROR);
        assert_eq!(filter_level(false, 0), Level::WARN);
        assert_eq!(filter_level(false, 1), Level::INFO);
        assert_eq!(filter_level(false, 2), Level::DEBUG);
        assert_eq!(filter_level(false, 9), Level::TRACE);
    }
}
