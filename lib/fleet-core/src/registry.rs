//! Vessel registry with identity management and validation

use crate::{FleetError, Result};
use fleet_api::{Vessel, VesselId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// VesselRegistry owns every tracked vessel.
///
/// Writes hold the write lock across the whole validate-then-mutate sequence,
/// so concurrent adds cannot observe the same count. Reads work on a
/// consistent snapshot and hand out clones.
///
/// Note the two contracts that differ from a typical CRUD store:
/// - [`add`](Self::add) assigns `count + 1`, not `max(id) + 1`. After a removal
///   the next add can reuse an id that is still live.
/// - [`remove`](Self::remove) reports an absent id as [`FleetError::Conflict`],
///   not `NotFound`.
pub struct VesselRegistry {
    vessels: Arc<RwLock<Vec<Vessel>>>,
}

/// Snapshot of the registry returned by [`VesselRegistry::list`]
#[derive(Clone, Debug, Default)]
pub struct VesselListing {
    pub vessels: Vec<Vessel>,
}

impl VesselListing {
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// Human-readable summary of the listing
    pub fn summary(&self) -> &'static str {
        if self.is_empty() {
            "No ship available"
        } else {
            "Ship details"
        }
    }
}

impl VesselRegistry {
    pub fn new() -> Self {
        Self {
            vessels: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a new vessel.
    ///
    /// Rejects, in order: an id already present, an empty name, then zero
    /// velocity, latitude or longitude. The stored id is always
    /// `count_before_insert + 1`, whatever the caller supplied.
    pub async fn add(&self, vessel: Vessel) -> Result<Vessel> {
        self.add_with_count(vessel).await.map(|(vessel, _)| vessel)
    }

    /// Like [`add`](Self::add), also returning the vessel count observed
    /// under the same write lock.
    pub async fn add_with_count(&self, mut vessel: Vessel) -> Result<(Vessel, usize)> {
        let mut vessels = self.vessels.write().await;

        if vessels.iter().any(|v| v.id == vessel.id) {
            return Err(FleetError::duplicate_id());
        }
        validate_fields(&vessel)?;

        vessel.id = vessels.len() as VesselId + 1;
        if vessels.iter().any(|v| v.id == vessel.id) {
            // Count-based assignment after a removal; kept for compatibility
            warn!("Assigned ship id {} is already in use", vessel.id);
        }

        vessels.push(vessel.clone());
        debug!("Added ship {} ({})", vessel.id, vessel.name);
        Ok((vessel, vessels.len()))
    }

    /// Get a vessel by id
    pub async fn get(&self, id: VesselId) -> Result<Vessel> {
        let vessels = self.vessels.read().await;
        vessels
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(FleetError::ship_not_found)
    }

    /// Replace name, velocity and position of an existing vessel.
    ///
    /// The stored id never changes. A differing id in `update` is only checked
    /// for collisions with another vessel.
    pub async fn update(&self, id: VesselId, update: Vessel) -> Result<Vessel> {
        let mut vessels = self.vessels.write().await;

        let index = vessels
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(FleetError::ship_not_found)?;

        if update.id != id && vessels.iter().any(|v| v.id == update.id) {
            return Err(FleetError::duplicate_id());
        }
        validate_fields(&update)?;

        let existing = &mut vessels[index];
        existing.name = update.name;
        existing.velocity = update.velocity;
        existing.latitude = update.latitude;
        existing.longitude = update.longitude;

        debug!("Updated ship {}", id);
        Ok(existing.clone())
    }

    /// Change only the velocity of an existing vessel
    pub async fn update_velocity(&self, id: VesselId, velocity: f64) -> Result<Vessel> {
        if velocity == 0.0 {
            return Err(FleetError::zero_velocity());
        }

        let mut vessels = self.vessels.write().await;
        let existing = vessels
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(FleetError::ship_not_found)?;

        existing.velocity = velocity;
        debug!("Updated velocity of ship {} to {}", id, velocity);
        Ok(existing.clone())
    }

    /// Remove a vessel, returning the removed record.
    ///
    /// An unknown id is a [`FleetError::Conflict`].
    pub async fn remove(&self, id: VesselId) -> Result<Vessel> {
        self.remove_with_count(id).await.map(|(vessel, _)| vessel)
    }

    /// Like [`remove`](Self::remove), also returning the vessel count left
    /// under the same write lock.
    pub async fn remove_with_count(&self, id: VesselId) -> Result<(Vessel, usize)> {
        let mut vessels = self.vessels.write().await;
        let index = vessels
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(FleetError::ship_not_exists)?;

        let removed = vessels.remove(index);
        debug!("Removed ship {}", id);
        Ok((removed, vessels.len()))
    }

    /// List all vessels in insertion order
    pub async fn list(&self) -> VesselListing {
        let vessels = self.vessels.read().await;
        VesselListing {
            vessels: vessels.clone(),
        }
    }

    /// Get count of registered vessels
    pub async fn len(&self) -> usize {
        let vessels = self.vessels.read().await;
        vessels.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for VesselRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_fields(vessel: &Vessel) -> Result<()> {
    if vessel.name.trim().is_empty() {
        return Err(FleetError::empty_name());
    }
    if vessel.velocity == 0.0 {
        return Err(FleetError::zero_velocity());
    }
    if vessel.latitude == 0.0 {
        return Err(FleetError::zero_latitude());
    }
    if vessel.longitude == 0.0 {
        return Err(FleetError::zero_longitude());
    }
    Ok(())
}
