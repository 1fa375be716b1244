//! Logging and metrics setup

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize tracing/logging. `RUST_LOG` wins over the defaults.
pub fn init_tracing(production: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if production {
            "foodbuddy_backend=info,tower_http=info".into()
        } else {
            "foodbuddy_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if production {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Install the global Prometheus recorder. Safe to call more than once.
pub fn init_metrics() -> Result<&'static PrometheusHandle> {
    PROMETHEUS.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        Ok(handle)
    })
}

/// Current metrics in the Prometheus text format, empty before `init_metrics`
pub fn render_metrics() -> String {
    PROMETHEUS.get().map(PrometheusHandle::render).unwrap_or_default()
}
