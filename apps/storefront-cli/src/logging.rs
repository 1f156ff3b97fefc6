//! Tracing subscriber for the interactive client.
//!
//! Filter priority: `STOREFRONT_LOG`, then `RUST_LOG`, then `--verbose`
//! (debug) or the default `warn`. Output goes to stderr so it never
//! interleaves with rendered results on stdout.

use std::env;

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = ["STOREFRONT_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
