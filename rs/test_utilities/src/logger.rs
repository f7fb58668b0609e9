//! Logger helpers for tests.

use keel_logger::NodeLogger;
use slog::Drain;

/// Runs `run` with a synchronous logger that writes to the test's captured
/// stdout, so log output shows up next to the failing assertion.
pub fn with_test_logger<T>(run: impl FnOnce(NodeLogger) -> T) -> T {
    let decorator = slog_term::PlainSyncDecorator::new(slog_term::TestStdoutWriter);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    run(slog::Logger::root(drain, slog::o!()))
}
