use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

/// Installs the global subscriber. `RUST_LOG` picks the filter, `info` otherwise.
///
/// Output goes to stderr as an indented span tree, so nested layout edits show
/// up under the engine call that caused them.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let tree = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true)
        .with_indent_lines(true);
    // A second call (e.g. from a test harness) keeps the first subscriber.
    let _ = Registry::default().with(filter).with(tree).try_init();
}
