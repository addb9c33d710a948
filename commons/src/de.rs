//! Conversions from raw option values.

/// Map the number of `-v` occurrences to a log-level filter.
pub fn verbosity_to_level(occurrences: u64) -> log::LevelFilter {
    match occurrences {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
