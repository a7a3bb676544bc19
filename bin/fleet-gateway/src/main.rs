use anyhow::Result;
use fleet_core::{PortCatalog, VesselRegistry};
use fleet_http::{FleetService, LoggingMiddleware, MetricsCollector, MetricsMiddleware, MiddlewareChain};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{GatewayConfig, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::load()?;
    init_tracing(config.log_format);

    info!("Starting fleet-gateway...");

    let registry = Arc::new(VesselRegistry::new());
    let catalog = PortCatalog::standard();
    info!("Port catalog initialized with {} ports", catalog.len());

    let mut middleware = MiddlewareChain::new().add(LoggingMiddleware);
    let mut service = FleetService::new(registry, catalog).with_body_limit(config.max_body_bytes);

    if config.metrics_enabled {
        let metrics_collector = MetricsCollector::new()?;
        middleware = middleware.add(MetricsMiddleware::new(metrics_collector.clone()));
        service = service.with_metrics(metrics_collector);
        info!("Metrics collector initialized");
    } else {
        warn!("Metrics disabled - /metrics will return 404");
    }

    info!("Middleware chain initialized with {} middleware", middleware.len());
    let service = Arc::new(service.with_middleware(middleware));

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("HTTP server listening on {}", config.listen_addr);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Error accepting connection: {}", e);
                        continue;
                    }
                };
                let io = TokioIo::new(stream);
                let service = service.clone();

                tokio::task::spawn(async move {
                    let handler = service_fn(move |req| {
                        let service = service.clone();
                        async move { Ok::<_, Infallible>(service.call(req).await) }
                    });

                    if let Err(e) = http1::Builder::new()
                        .serve_connection(io, handler)
                        .await
                    {
                        debug!("Error serving HTTP connection from {}: {}", peer_addr, e);
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received, exiting...");
                break;
            }
        }
    }

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the default `info` filter
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
