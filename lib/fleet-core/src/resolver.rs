//! Nearest-port resolution for registered vessels

use crate::eta::{estimate_arrival, estimate_hours};
use crate::geo::haversine_km;
use crate::{FleetError, PortCatalog, Result, VesselRegistry};
use chrono::TimeDelta;
use fleet_api::{ClosestPortResponse, Port, Vessel, VesselId};
use std::sync::Arc;
use tracing::debug;

/// A port paired with its distance to one vessel
#[derive(Clone, Copy, Debug)]
pub struct DistanceCandidate<'a> {
    pub port: &'a Port,
    pub distance_km: f64,
}

/// Outcome of resolving the closest port for a vessel
#[derive(Clone, Debug)]
pub struct PortResolution {
    pub vessel_id: VesselId,
    pub port: Port,
    pub distance_km: f64,
    pub estimated_hours: f64,
    pub estimated_arrival: TimeDelta,
}

impl PortResolution {
    pub fn message(&self) -> String {
        format!("Your closest port is {}", self.port.name)
    }

    pub fn to_response(&self) -> ClosestPortResponse {
        ClosestPortResponse::new(
            self.message(),
            &self.port,
            self.distance_km,
            self.estimated_hours,
            self.estimated_arrival,
        )
    }
}

/// Resolves the nearest catalog port for vessels held in a registry
pub struct ClosestPortResolver {
    registry: Arc<VesselRegistry>,
    catalog: PortCatalog,
}

impl ClosestPortResolver {
    pub fn new(registry: Arc<VesselRegistry>, catalog: PortCatalog) -> Self {
        Self { registry, catalog }
    }

    pub fn catalog(&self) -> &PortCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<VesselRegistry> {
        &self.registry
    }

    /// Find the closest port to `ship_id` and estimate its arrival
    pub async fn resolve(&self, ship_id: VesselId) -> Result<PortResolution> {
        let vessel = self.registry.get(ship_id).await?;
        if self.catalog.is_empty() {
            return Err(FleetError::Internal("port catalog is empty".to_string()));
        }

        let candidates = self.candidates(&vessel);
        let closest = select_closest(&candidates).ok_or_else(|| {
            FleetError::Internal(format!("no port reachable from ship {}", ship_id))
        })?;

        let estimated_hours = estimate_hours(closest.distance_km, vessel.velocity);
        debug!(
            "Ship {} is {:.3} km from {} ({:.4} h)",
            ship_id, closest.distance_km, closest.port.name, estimated_hours
        );

        Ok(PortResolution {
            vessel_id: ship_id,
            port: closest.port.clone(),
            distance_km: closest.distance_km,
            estimated_hours,
            estimated_arrival: estimate_arrival(closest.distance_km, vessel.velocity),
        })
    }

    /// Distance from `vessel` to every port, in catalog order
    pub fn candidates<'a>(&'a self, vessel: &Vessel) -> Vec<DistanceCandidate<'a>> {
        let position = (vessel.latitude, vessel.longitude);
        self.catalog
            .iter()
            .map(|port| DistanceCandidate {
                port,
                distance_km: haversine_km(position, (port.latitude, port.longitude)),
            })
            .collect()
    }
}

/// Pick the strictly smallest distance; on ties the earlier candidate wins
pub fn select_closest<'a>(candidates: &[DistanceCandidate<'a>]) -> Option<DistanceCandidate<'a>> {
    let mut shortest = f64::MAX;
    let mut closest = None;
    for candidate in candidates {
        if candidate.distance_km < shortest {
            shortest = candidate.distance_km;
            closest = Some(*candidate);
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ClosestPortResolver {
        ClosestPortResolver::new(Arc::new(VesselRegistry::new()), PortCatalog::standard())
    }

    #[tokio::test]
    async fn test_resolves_mundra() {
        let resolver = resolver();
        let ship = resolver
            .registry()
            .add(Vessel::new(0, "Alpha", 20.0, 22.75, 69.71))
            .await
            .unwrap();

        let resolution = resolver.resolve(ship.id).await.unwrap();
        assert_eq!(resolution.port.name, "Mundra Port");
        assert!((resolution.distance_km - 1.5126).abs() < 0.001);
        assert!((resolution.estimated_hours - 0.07563).abs() < 0.0001);
        assert_eq!(resolution.estimated_arrival.num_seconds(), 272);
        assert_eq!(resolution.message(), "Your closest port is Mundra Port");
    }

    #[tokio::test]
    async fn test_unknown_ship_is_not_found() {
        let err = resolver().resolve(3).await.unwrap_err();
        assert!(matches!(err, FleetError::NotFound(_)));
        assert_eq!(err.to_string(), "Ship not found.");
    }

    #[tokio::test]
    async fn test_resolution_is_deterministic() {
        let resolver = resolver();
        resolver
            .registry()
            .add(Vessel::new(0, "Alpha", 12.0, 22.9, 70.1))
            .await
            .unwrap();

        let first = resolver.resolve(1).await.unwrap();
        for _ in 0..5 {
            let again = resolver.resolve(1).await.unwrap();
            assert_eq!(again.port, first.port);
            assert_eq!(again.distance_km, first.distance_km);
        }
        assert_eq!(first.port.name, "Kandla Port");
    }

    #[tokio::test]
    async fn test_follows_position_updates() {
        let resolver = resolver();
        resolver
            .registry()
            .add(Vessel::new(0, "Alpha", 10.0, 22.75, 69.71))
            .await
            .unwrap();
        resolver
            .registry()
            .update(1, Vessel::new(1, "Alpha", 10.0, 22.46, 70.06))
            .await
            .unwrap();

        assert_eq!(resolver.resolve(1).await.unwrap().port.name, "Jamnagar Port");
    }

    #[tokio::test]
    async fn test_negative_velocity_gives_negative_arrival() {
        let resolver = resolver();
        resolver
            .registry()
            .add(Vessel::new(0, "Astern", -20.0, 22.75, 69.71))
            .await
            .unwrap();

        let resolution = resolver.resolve(1).await.unwrap();
        assert!(resolution.estimated_hours < 0.0);
        assert!(resolution.estimated_arrival < TimeDelta::zero());
    }

    #[test]
    fn test_tie_keeps_first_port() {
        let first = Port::new(1, "First", 10.0, 10.0);
        let second = Port::new(2, "Second", 10.0, 10.0);
        let candidates = vec![
            DistanceCandidate { port: &first, distance_km: 5.0 },
            DistanceCandidate { port: &second, distance_km: 5.0 },
        ];

        let closest = select_closest(&candidates).unwrap();
        assert_eq!(closest.port.name, "First");
    }

    #[test]
    fn test_select_closest_empty() {
        assert!(select_closest(&[]).is_none());
    }

    #[tokio::test]
    async fn test_empty_catalog_is_internal_error() {
        let resolver =
            ClosestPortResolver::new(Arc::new(VesselRegistry::new()), PortCatalog::from_ports(vec![]));
        resolver
            .registry()
            .add(Vessel::new(0, "Alpha", 10.0, 10.0, 10.0))
            .await
            .unwrap();

        let err = resolver.resolve(1).await.unwrap_err();
        assert!(matches!(err, FleetError::Internal(_)));
        assert_eq!(err.to_string(), "Internal error: port catalog is empty");
    }

    #[tokio::test]
    async fn test_response_matches_resolution() {
        let resolver = resolver();
        resolver
            .registry()
            .add(Vessel::new(0, "Alpha", 20.0, 22.75, 69.71))
            .await
            .unwrap();

        let resolution = resolver.resolve(1).await.unwrap();
        assert_eq!(
            resolution.estimated_arrival,
            estimate_arrival(resolution.distance_km, 20.0)
        );

        let response = resolution.to_response();
        assert_eq!(response.message, resolution.message());
        assert_eq!(response.port_name, "Mundra Port");
    }

    #[test]
    fn test_candidates_follow_catalog_order() {
        let resolver = resolver();
        let vessel = Vessel::new(1, "Alpha", 10.0, 22.75, 69.71);
        let names: Vec<&str> = resolver
            .candidates(&vessel)
            .iter()
            .map(|c| c.port.name.as_str())
            .collect();
        assert_eq!(names, vec!["Kandla Port", "Mundra Port", "Jamnagar Port"]);
    }
}
