use std::io;

use tracing::Level;

/// Install a compact stderr subscriber at `level`. Safe to call multiple
/// times; subsequent calls are no-ops for the global subscriber.
pub fn init_default(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .compact()
        .try_init();
}

/// Level for a `-v` count: warnings by default, then debug, then trace.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
