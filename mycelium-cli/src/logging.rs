//! Logger setup for the command-line runner.

use log::LevelFilter;

/// Initializes `env_logger` for the given crates.
///
/// The default level is [`Info`](LevelFilter::Info) in debug builds and
/// [`Warn`](LevelFilter::Warn) in release builds, raised by one step per
/// `verbose` count. Setting `RUST_LOG` overrides all of this:
///
/// ```sh
/// $> RUST_LOG=mycelium_core=trace mycelium --shape sphere
/// ```
pub fn init(crates: &[&str], verbose: u8) {
    let filter = default_filter(crates, level_for(verbose));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn level_for(verbose: u8) -> LevelFilter {
    let base = if cfg!(debug_assertions) {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    match (base, verbose) {
        (level, 0) => level,
        (LevelFilter::Warn, 1) => LevelFilter::Info,
        (LevelFilter::Warn, 2) | (LevelFilter::Info, 1) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Builds the `RUST_LOG`-style filter string, e.g. `a=info,b=info`.
fn default_filter(crates: &[&str], level: LevelFilter) -> String {
    let level = level.as_str().to_ascii_lowercase();
    crates
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_lists_every_crate() {
        assert_eq!(
            default_filter(&["mycelium_core", "mycelium"], LevelFilter::Debug),
            "mycelium_core=debug,mycelium=debug"
        );
    }

    #[test]
    fn verbosity_raises_the_level() {
        assert!(level_for(1) > level_for(0));
        assert_eq!(level_for(5), LevelFilter::Trace);
    }
}
