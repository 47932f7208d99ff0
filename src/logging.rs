use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, FmtSubscriber};

use crate::formatter::FrameFormatter;

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Installs the global tracing subscriber. Safe to call more than once.
///
/// `RUST_LOG` overrides the default filter of `warn` elsewhere and `info` for this crate.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let subscriber = FmtSubscriber::builder()
            .with_target(true)
            .event_format(FrameFormatter)
            .with_env_filter(filter)
            .finish()
            .with(ErrorLayer::default());

        // An embedding application may already own the global subscriber
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!("Global subscriber already installed");
        }
    });
}
