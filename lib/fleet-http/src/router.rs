//! Route table for the fleet API

use fleet_api::VesselId;
use hyper::Method;

/// A matched API operation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route {
    Health,
    Metrics,
    ListPorts,
    ListShips,
    AddShip,
    GetShip(VesselId),
    UpdateShip(VesselId),
    RemoveShip(VesselId),
    UpdateVelocity(VesselId),
    ClosestPort(VesselId),
}

impl Route {
    /// Templated path, used as a low-cardinality metric label
    pub fn label(&self) -> &'static str {
        match self {
            Route::Health => "/healthz",
            Route::Metrics => "/metrics",
            Route::ListPorts => "/api/ports",
            Route::ListShips | Route::AddShip => "/api/ships",
            Route::GetShip(_) | Route::UpdateShip(_) | Route::RemoveShip(_) => "/api/ships/{id}",
            Route::UpdateVelocity(_) => "/api/ships/{id}/velocity",
            Route::ClosestPort(_) => "/api/ships/{id}/closestPort",
        }
    }
}

/// Result of matching a request line against the route table
#[derive(Clone, Debug, PartialEq)]
pub enum RouteMatch {
    Matched(Route),
    /// The path exists but not for this method
    MethodNotAllowed(&'static str),
    /// The path has the right shape but the id segment is not an integer
    InvalidId { label: &'static str, value: String },
    NotFound,
}

impl RouteMatch {
    pub fn label(&self) -> &'static str {
        match self {
            RouteMatch::Matched(route) => route.label(),
            RouteMatch::MethodNotAllowed(label) => *label,
            RouteMatch::InvalidId { label, .. } => *label,
            RouteMatch::NotFound => "unmatched",
        }
    }
}

/// Match a method and path to a route.
///
/// Literal segments compare case-insensitively and a trailing slash is ignored.
pub fn match_route(method: &Method, path: &str) -> RouteMatch {
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    fn is(segment: &str, literal: &str) -> bool {
        segment.eq_ignore_ascii_case(literal)
    }

    match segments.as_slice() {
        [health] if is(health, "healthz") => by_method(method, "/healthz", |m| {
            (*m == Method::GET).then_some(Route::Health)
        }),
        [metrics] if is(metrics, "metrics") => by_method(method, "/metrics", |m| {
            (*m == Method::GET).then_some(Route::Metrics)
        }),
        [api, ports] if is(api, "api") && is(ports, "ports") => {
            by_method(method, "/api/ports", |m| (*m == Method::GET).then_some(Route::ListPorts))
        }
        [api, ships] if is(api, "api") && is(ships, "ships") => {
            by_method(method, "/api/ships", |m| match *m {
                Method::GET => Some(Route::ListShips),
                Method::POST => Some(Route::AddShip),
                _ => None,
            })
        }
        [api, ships, id] if is(api, "api") && is(ships, "ships") => {
            with_id(id, "/api/ships/{id}", |id| {
                by_method(method, "/api/ships/{id}", |m| match *m {
                    Method::GET => Some(Route::GetShip(id)),
                    Method::PUT => Some(Route::UpdateShip(id)),
                    Method::DELETE => Some(Route::RemoveShip(id)),
                    _ => None,
                })
            })
        }
        [api, ships, id, velocity] if is(api, "api") && is(ships, "ships") && is(velocity, "velocity") => {
            with_id(id, "/api/ships/{id}/velocity", |id| {
                by_method(method, "/api/ships/{id}/velocity", |m| {
                    (*m == Method::PUT).then_some(Route::UpdateVelocity(id))
                })
            })
        }
        [api, ships, id, closest] if is(api, "api") && is(ships, "ships") && is(closest, "closestPort") => {
            with_id(id, "/api/ships/{id}/closestPort", |id| {
                by_method(method, "/api/ships/{id}/closestPort", |m| {
                    (*m == Method::GET).then_some(Route::ClosestPort(id))
                })
            })
        }
        _ => RouteMatch::NotFound,
    }
}

fn by_method<F>(method: &Method, label: &'static str, select: F) -> RouteMatch
where
    F: FnOnce(&Method) -> Option<Route>,
{
    match select(method) {
        Some(route) => RouteMatch::Matched(route),
        None => RouteMatch::MethodNotAllowed(label),
    }
}

fn with_id<F>(segment: &str, label: &'static str, next: F) -> RouteMatch
where
    F: FnOnce(VesselId) -> RouteMatch,
{
    match segment.parse::<VesselId>() {
        Ok(id) => next(id),
        Err(_) => RouteMatch::InvalidId {
            label,
            value: segment.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_routes() {
        assert_eq!(
            match_route(&Method::GET, "/api/ships"),
            RouteMatch::Matched(Route::ListShips)
        );
        assert_eq!(
            match_route(&Method::POST, "/api/ships/"),
            RouteMatch::Matched(Route::AddShip)
        );
        assert_eq!(
            match_route(&Method::GET, "/api/ports"),
            RouteMatch::Matched(Route::ListPorts)
        );
    }

    #[test]
    fn test_item_routes() {
        assert_eq!(
            match_route(&Method::PUT, "/api/ships/7"),
            RouteMatch::Matched(Route::UpdateShip(7))
        );
        assert_eq!(
            match_route(&Method::DELETE, "/api/ships/7"),
            RouteMatch::Matched(Route::RemoveShip(7))
        );
        assert_eq!(
            match_route(&Method::PUT, "/api/ships/7/velocity"),
            RouteMatch::Matched(Route::UpdateVelocity(7))
        );
        assert_eq!(
            match_route(&Method::GET, "/api/ships/7/closestPort"),
            RouteMatch::Matched(Route::ClosestPort(7))
        );
    }

    #[test]
    fn test_case_insensitive_literals() {
        assert_eq!(
            match_route(&Method::GET, "/API/Ships/3/closestport"),
            RouteMatch::Matched(Route::ClosestPort(3))
        );
    }

    #[test]
    fn test_method_not_allowed() {
        assert_eq!(
            match_route(&Method::DELETE, "/api/ships"),
            RouteMatch::MethodNotAllowed("/api/ships")
        );
        assert_eq!(
            match_route(&Method::POST, "/api/ships/1/closestPort"),
            RouteMatch::MethodNotAllowed("/api/ships/{id}/closestPort")
        );
    }

    #[test]
    fn test_invalid_id() {
        assert_eq!(
            match_route(&Method::GET, "/api/ships/abc"),
            RouteMatch::InvalidId {
                label: "/api/ships/{id}",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(match_route(&Method::GET, "/"), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/api/boats"), RouteMatch::NotFound);
        assert_eq!(
            match_route(&Method::GET, "/api/ships/1/position"),
            RouteMatch::NotFound
        );
        assert_eq!(RouteMatch::NotFound.label(), "unmatched");
    }
}
