//! HTTP binding for the fleet registry
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod service;

pub use metrics::{MetricsCollector, MetricsMiddleware};
pub use middleware::{LoggingMiddleware, Middleware, MiddlewareChain, MiddlewareContext};
pub use router::{match_route, Route, RouteMatch};
pub use service::{FleetService, MAX_BODY_BYTES};
