//! Builds a small tree, looks a key up, then empties it again.
//!
//! `RBSET_LOG` sets the log filter (default `info`). `RBSET_DOT=1` streams a
//! Graphviz frame to stdout for every insertion checkpoint and rotation.

use std::process::ExitCode;

use rbset::{DotDumper, RbTree};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("RBSET_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut tree: RbTree<i32> = RbTree::new();
    if std::env::var("RBSET_DOT").is_ok_and(|v| v == "1") {
        tree.set_observer(DotDumper::new(std::io::stdout()));
    }

    for key in [5, 7, 9, 8, 2] {
        tree.insert(key)?;
        info!(key, len = tree.len(), height = tree.height(), "inserted");
    }

    let found = tree.find(&9).map(|n| *n.key());
    info!(?found, "lookup");

    for key in [7, 5, 2, 9, 8] {
        tree.remove(&key)?;
        let black_height = tree.validate()?;
        info!(key, len = tree.len(), black_height, "removed");
    }

    info!(empty = tree.is_empty(), "done");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}
