//! Optional event publishing for pipeline stages.
//!
//! With the `publish` feature enabled, stage events are sent to a RabbitMQ
//! exchange through `awful_publish`. Without it every function and macro here
//! is a no-op, so callers never need `#[cfg]` of their own.
//!
//! # Events Published
//!
//! | Event Kind | Description |
//! |------------|-------------|
//! | `pipeline.started` | Seeds validated, crawl about to begin |
//! | `pipeline.failed` | Configuration rejected before any request |
//! | `discovery.completed` | Candidate and failed-seed counts |
//! | `extraction.completed` | Succeeded and failed article counts |
//! | `pipeline.completed` | Duration and document size |
//! | `summary.completed` | Summarizer answered (binary only) |
//! | `summary.failed` | Summarizer gave up after retries (binary only) |
//!
//! # Usage
//!
//! ```ignore
//! publish::init(Some("amqp://localhost:5672"), "events").await;
//!
//! publish_info!(
//!     "news_digest",
//!     event_kind = "discovery.completed",
//!     candidates = 12,
//!     "Link discovery completed"
//! );
//! ```

/// Connect to the AMQP broker at `amqp_url`, if one is given.
///
/// Returns whether events will actually be published. A failed connection is
/// logged and the run continues without events.
#[cfg(feature = "publish")]
pub async fn init(amqp_url: Option<&str>, exchange: &str) -> bool {
    use awful_publish::BusConfig;
    use tracing::{info, warn};

    let Some(url) = amqp_url else {
        return false;
    };
    match awful_publish::init_global(BusConfig::new(url.to_string(), exchange.to_string())).await {
        Ok(_) => {
            info!(%exchange, "Message bus initialized");
            true
        }
        Err(e) => {
            warn!(
                error = %e,
                "Failed to initialize message bus; continuing without event publishing"
            );
            false
        }
    }
}

/// No-op without the `publish` feature.
#[cfg(not(feature = "publish"))]
pub async fn init(_amqp_url: Option<&str>, _exchange: &str) -> bool {
    false
}

/// Publish an info-level stage event.
///
/// Takes tracing-style `key = value` pairs followed by a message literal.
#[cfg(feature = "publish")]
#[macro_export]
macro_rules! publish_info {
    ($service:expr, $($($k:ident).+ = $val:expr),+ , $msg:literal) => {
        awful_publish::publish(
            $service,
            tracing::Level::INFO,
            $msg,
            vec![$(
                (stringify!($($k).+), serde_json::json!($val)),
            )+],
        )
    };
    ($service:expr, $msg:literal) => {
        awful_publish::publish($service, tracing::Level::INFO, $msg, vec![])
    };
}

#[cfg(not(feature = "publish"))]
#[macro_export]
macro_rules! publish_info {
    ($service:expr, $($tt:tt)*) => {};
}

/// Publish an error-level stage event. Same syntax as [`publish_info!`].
#[cfg(feature = "publish")]
#[macro_export]
macro_rules! publish_error {
    ($service:expr, $($($k:ident).+ = $val:expr),+ , $msg:literal) => {
        awful_publish::publish(
            $service,
            tracing::Level::ERROR,
            $msg,
            vec![$(
                (stringify!($($k).+), serde_json::json!($val)),
            )+],
        )
    };
    ($service:expr, $msg:literal) => {
        awful_publish::publish($service, tracing::Level::ERROR, $msg, vec![])
    };
}

#[cfg(not(feature = "publish"))]
#[macro_export]
macro_rules! publish_error {
    ($service:expr, $($tt:tt)*) => {};
}
