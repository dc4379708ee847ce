use crate::activity_layer::{ActivityEvent, ActivityLayer};
use tokio::sync::mpsc;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable overriding the configured log level.
pub const LOG_ENV: &str = "COMPOSER_LOG";

/// Installs the global subscriber: formatted output on stderr filtered by
/// `COMPOSER_LOG` (falling back to `level`), plus an [`ActivityLayer`] that
/// sees every `composer` event regardless of that filter.
pub fn init(level: &str) -> mpsc::UnboundedReceiver<ActivityEvent> {
    let (sender, receiver) = mpsc::unbounded_channel();
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter),
        )
        .with(
            ActivityLayer::new(sender)
                .with_filter(filter_fn(|metadata| metadata.target().starts_with("composer"))),
        )
        .try_init();

    receiver
}
