//! Middleware hooks around every API request

use anyhow::Result;
use hyper::Request;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Instrument, Level};

/// Context passed through the middleware chain
#[derive(Clone, Debug)]
pub struct MiddlewareContext {
    /// Request method
    pub method: String,
    /// Raw request path
    pub path: String,
    /// Templated route used for metric labels (e.g. `/api/ships/{id}`)
    pub route: String,
    /// Request headers
    pub request_headers: HashMap<String, String>,
    /// When the request entered the chain
    pub started: Instant,
}

impl MiddlewareContext {
    /// Create a context from an incoming request and its matched route label
    pub fn from_request<B>(req: &Request<B>, route: &str) -> Self {
        let mut headers = HashMap::new();
        for (k, v) in req.headers() {
            if let Ok(v_str) = v.to_str() {
                headers.insert(k.to_string(), v_str.to_string());
            }
        }

        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            route: route.to_string(),
            request_headers: headers,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Request method folded into a fixed set; extension methods become `OTHER`
    pub fn method_label(&self) -> &'static str {
        match self.method.as_str() {
            "GET" => "GET",
            "HEAD" => "HEAD",
            "POST" => "POST",
            "PUT" => "PUT",
            "PATCH" => "PATCH",
            "DELETE" => "DELETE",
            "OPTIONS" => "OPTIONS",
            _ => "OTHER",
        }
    }
}

/// Middleware trait for observing requests and responses
#[async_trait::async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str {
        "UnnamedMiddleware"
    }

    /// Called before the request is dispatched
    async fn on_request(&self, _context: &MiddlewareContext) -> Result<()> {
        Ok(())
    }

    /// Called once the response status is known
    async fn on_response(&self, _context: &MiddlewareContext, _status: u16) -> Result<()> {
        Ok(())
    }

    /// Called when the request failed on the server side
    async fn on_error(&self, _context: &MiddlewareContext, _error: &str) -> Result<()> {
        Ok(())
    }
}

/// Chain of middleware to execute in order
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add middleware to the chain
    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    pub async fn on_request(&self, context: &MiddlewareContext) -> Result<()> {
        for mw in &self.middleware {
            let span = span!(Level::DEBUG, "middleware", name = mw.name());
            mw.on_request(context).instrument(span).await?;
        }
        Ok(())
    }

    /// Process response through all middleware (in reverse order)
    pub async fn on_response(&self, context: &MiddlewareContext, status: u16) -> Result<()> {
        for mw in self.middleware.iter().rev() {
            let span = span!(Level::DEBUG, "middleware", name = mw.name());
            mw.on_response(context, status).instrument(span).await?;
        }
        Ok(())
    }

    pub async fn on_error(&self, context: &MiddlewareContext, error: &str) -> Result<()> {
        for mw in &self.middleware {
            let span = span!(Level::DEBUG, "middleware", name = mw.name());
            mw.on_error(context, error).instrument(span).await?;
        }
        Ok(())
    }
}

/// Logs one line per request with status and latency
pub struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    fn name(&self) -> &'static str {
        "LoggingMiddleware"
    }

    async fn on_request(&self, context: &MiddlewareContext) -> Result<()> {
        debug!(
            "Request: {} {} (headers: {})",
            context.method,
            context.path,
            context.request_headers.len()
        );
        Ok(())
    }

    async fn on_response(&self, context: &MiddlewareContext, status: u16) -> Result<()> {
        info!(
            method = %context.method,
            path = %context.path,
            status,
            duration_ms = context.elapsed().as_millis() as u64,
            "request completed"
        );
        Ok(())
    }

    async fn on_error(&self, context: &MiddlewareContext, error: &str) -> Result<()> {
        warn!("Error: {} {} - {}", context.method, context.path, error);
        Ok(())
    }
}
