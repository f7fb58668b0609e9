//! Structured logging for keel node components.
//!
//! A thin layer over `slog` that builds the drain stack described by
//! [`keel_config::logger::Config`] and re-exports the logging macros, so call
//! sites read
//!
//! ```ignore
//! info!(log, "Upgrade scheduled"; "name" => %plan.name, "height" => plan.height.get());
//! ```

pub use slog::{crit, debug, error, info, o, trace, warn};

use keel_config::logger::{Config, LogTarget};
use slog::Drain;
use slog_async::{Async, OverflowStrategy};
use std::fs::OpenOptions;

/// The logger handle threaded through every component.
pub type NodeLogger = slog::Logger;

/// A logger that discards everything. For tools that do not log.
pub fn no_op_logger() -> NodeLogger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// Builds the process-wide logger described by `config`.
///
/// Records are queued to a dedicated drain thread; the queue's overflow
/// behavior follows `config.block_on_overflow`.
pub fn new_node_logger(config: &Config) -> NodeLogger {
    match &config.target {
        LogTarget::Stdout => {
            with_decorator(slog_term::TermDecorator::new().stdout().build(), config)
        }
        LogTarget::Stderr => {
            with_decorator(slog_term::TermDecorator::new().stderr().build(), config)
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .unwrap_or_else(|err| {
                    panic!("failed to open log file {}: {}", path.display(), err)
                });
            with_decorator(slog_term::PlainDecorator::new(file), config)
        }
    }
}

fn with_decorator<D>(decorator: D, config: &Config) -> NodeLogger
where
    D: slog_term::Decorator + Send + 'static,
{
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let overflow_strategy = if config.block_on_overflow {
        OverflowStrategy::Block
    } else {
        OverflowStrategy::DropAndReport
    };
    let drain = Async::new(drain)
        .overflow_strategy(overflow_strategy)
        .build()
        .fuse();
    let drain = drain.filter_level(config.level).fuse();
    slog::Logger::root(drain, slog::o!())
}
