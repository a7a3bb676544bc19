//! Request handling for the fleet API

use crate::metrics::MetricsCollector;
use crate::middleware::{MiddlewareChain, MiddlewareContext};
use crate::router::{match_route, Route, RouteMatch};
use fleet_api::{ErrorBody, PortListResponse, ShipListResponse, ShipResponse, VelocityUpdate, Vessel};
use fleet_core::{ClosestPortResolver, FleetError, PortCatalog, VesselRegistry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::debug;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";
const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";

/// Default cap on request body size
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Failure while handling a matched route
#[derive(Debug)]
enum RequestError {
    /// The request body could not be read or parsed
    Body(String),
    Fleet(FleetError),
}

impl From<FleetError> for RequestError {
    fn from(err: FleetError) -> Self {
        RequestError::Fleet(err)
    }
}

/// HTTP front for the vessel registry and the closest-port resolver.
///
/// The registry is injected, so several services (or tests) can share one
/// instance or each own an isolated one.
pub struct FleetService {
    registry: Arc<VesselRegistry>,
    resolver: ClosestPortResolver,
    middleware: MiddlewareChain,
    metrics: Option<MetricsCollector>,
    max_body_bytes: usize,
}

impl FleetService {
    pub fn new(registry: Arc<VesselRegistry>, catalog: PortCatalog) -> Self {
        Self {
            resolver: ClosestPortResolver::new(registry.clone(), catalog),
            registry,
            middleware: MiddlewareChain::new(),
            metrics: None,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    pub fn with_middleware(mut self, middleware: MiddlewareChain) -> Self {
        self.middleware = middleware;
        self
    }

    /// Enable `/metrics` and the domain gauges/counters
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Reject request bodies larger than `limit` bytes with 413
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Handle one request end to end, including middleware hooks
    pub async fn call<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let matched = match_route(req.method(), req.uri().path());
        let context = MiddlewareContext::from_request(&req, matched.label());

        if let Err(e) = self.middleware.on_request(&context).await {
            debug!("Middleware on_request error: {}", e);
        }

        let body = Limited::new(req.into_body(), self.max_body_bytes);
        let response = match body.collect().await {
            Ok(collected) => self.dispatch(matched, collected.to_bytes()).await,
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body exceeds {} bytes.", self.max_body_bytes),
            ),
            Err(e) => error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read request body: {}", e),
            ),
        };

        let status = response.status();
        if status.is_server_error() {
            if let Err(e) = self
                .middleware
                .on_error(&context, status.canonical_reason().unwrap_or("server error"))
                .await
            {
                debug!("Middleware on_error error: {}", e);
            }
        }
        if let Err(e) = self.middleware.on_response(&context, status.as_u16()).await {
            debug!("Middleware on_response error: {}", e);
        }

        response
    }

    async fn dispatch(&self, matched: RouteMatch, body: Bytes) -> Response<Full<Bytes>> {
        match matched {
            RouteMatch::Matched(route) => {
                debug!("Dispatching {:?}", route);
                match self.handle_route(route, body).await {
                    Ok(response) => response,
                    Err(RequestError::Body(message)) => {
                        error_response(StatusCode::BAD_REQUEST, message)
                    }
                    Err(RequestError::Fleet(err)) => fleet_error_response(&err),
                }
            }
            RouteMatch::MethodNotAllowed(_) => {
                error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
            }
            RouteMatch::InvalidId { value, .. } => error_response(
                StatusCode::BAD_REQUEST,
                format!("The value '{}' is not valid.", value),
            ),
            RouteMatch::NotFound => error_response(StatusCode::NOT_FOUND, "Resource not found."),
        }
    }

    async fn handle_route(
        &self,
        route: Route,
        body: Bytes,
    ) -> Result<Response<Full<Bytes>>, RequestError> {
        let response = match route {
            Route::Health => text_response(StatusCode::OK, PLAIN_TEXT, "OK\n"),
            Route::Metrics => match &self.metrics {
                Some(metrics) => match metrics.gather() {
                    Ok(text) => text_response(StatusCode::OK, PROMETHEUS_TEXT, text),
                    Err(e) => error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to gather metrics: {}", e),
                    ),
                },
                None => error_response(StatusCode::NOT_FOUND, "Metrics are disabled."),
            },
            Route::ListPorts => json_response(
                StatusCode::OK,
                &PortListResponse {
                    message: "Port details".to_string(),
                    ports: self.resolver.catalog().ports().to_vec(),
                },
            ),
            Route::ListShips => {
                let listing = self.registry.list().await;
                json_response(
                    StatusCode::OK,
                    &ShipListResponse {
                        message: listing.summary().to_string(),
                        ships: listing.vessels,
                    },
                )
            }
            Route::AddShip => {
                let vessel: Vessel = parse_json(&body)?;
                let (ship, count) = self.registry.add_with_count(vessel).await?;
                self.set_vessel_count(count);
                json_response(
                    StatusCode::OK,
                    &ShipResponse::new("Ship added successfully.", ship),
                )
            }
            Route::GetShip(id) => {
                let ship = self.registry.get(id).await?;
                json_response(StatusCode::OK, &ShipResponse::new("Ship details", ship))
            }
            Route::UpdateShip(id) => {
                let vessel: Vessel = parse_json(&body)?;
                let ship = self.registry.update(id, vessel).await?;
                json_response(
                    StatusCode::OK,
                    &ShipResponse::new("Ship updated successfully.", ship),
                )
            }
            Route::UpdateVelocity(id) => {
                let update: VelocityUpdate = parse_json(&body)?;
                let ship = self.registry.update_velocity(id, update.velocity()).await?;
                json_response(
                    StatusCode::OK,
                    &ShipResponse::new("Ship velocity updated successfully.", ship),
                )
            }
            Route::RemoveShip(id) => {
                let (ship, count) = self.registry.remove_with_count(id).await?;
                self.set_vessel_count(count);
                json_response(
                    StatusCode::OK,
                    &ShipResponse::new("Ship removed successfully.", ship),
                )
            }
            Route::ClosestPort(id) => {
                let resolution = self.resolver.resolve(id).await?;
                if let Some(metrics) = &self.metrics {
                    metrics.record_resolution(&resolution.port.name);
                }
                json_response(StatusCode::OK, &resolution.to_response())
            }
        };

        Ok(response)
    }

    fn set_vessel_count(&self, count: usize) {
        if let Some(metrics) = &self.metrics {
            metrics.set_vessel_count(count);
        }
    }
}

fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, RequestError> {
    serde_json::from_slice(body)
        .map_err(|e| RequestError::Body(format!("Invalid request body: {}", e)))
}

/// HTTP status for a registry or resolver failure
pub fn status_for(err: &FleetError) -> StatusCode {
    match err {
        FleetError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FleetError::Conflict(_) => StatusCode::CONFLICT,
        FleetError::NotFound(_) => StatusCode::NOT_FOUND,
        FleetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn fleet_error_response(err: &FleetError) -> Response<Full<Bytes>> {
    error_response(status_for(err), err.to_string())
}

/// Create a JSON `{"message": ...}` error response
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response<Full<Bytes>> {
    json_response(status, &ErrorBody::new(message))
}

/// Serialize `value` as a JSON response body
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = Response::new(Full::new(Bytes::from(bytes)));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => text_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            PLAIN_TEXT,
            format!("Failed to encode response: {}\n", e),
        ),
    }
}

fn text_response(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<String>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.into())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
