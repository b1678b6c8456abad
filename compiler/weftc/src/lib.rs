//! Weft command-line front end.
//!
//! The binary (`weft`) only parses arguments and dispatches; everything it
//! does lives here so it can be tested.

pub mod commands;
pub mod error;
pub mod source;
pub mod style_file;

pub use error::CliError;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Nothing is installed unless `RUST_LOG` is set or `verbose` is true.
/// `verbose` without `RUST_LOG` shows debug events from the formatter.
/// Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) if verbose => EnvFilter::new("weft_fmt=debug,weftc=debug"),
            Err(_) => return,
        };
        tracing_subscriber::registry()
            .with(
                HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true),
            )
            .with(filter)
            .init();
    });
}
