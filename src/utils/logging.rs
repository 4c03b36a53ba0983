use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Logs always go to stderr, since stdout may be carrying image or payload
/// bytes. `RUST_LOG`, when set, overrides `level`.
/// Format: `[HH:MM:SS] [LEVEL] message`
pub fn init_logger(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .init();
}
