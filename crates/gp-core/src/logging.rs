//! Logging setup

use tracing::Level;

/// Install a global `fmt` subscriber at the given level.
///
/// Returns `false` if a global subscriber was already installed, which is
/// the normal case when several tests initialise logging.
pub fn init_logging(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}
