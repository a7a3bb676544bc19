use serde::{Deserialize, Deserializer, Serialize};

pub type VesselId = i64;

/// Vessel represents a ship tracked by the registry.
///
/// Every field defaults to its zero value when absent from a request body, so a
/// missing `name` or `velocity` is rejected by validation exactly like an
/// explicit empty string or zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vessel {
    /// Registry-assigned identifier. Ignored on creation.
    pub id: VesselId,

    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,

    /// Speed in kilometres per hour. Zero is invalid, negative values are accepted.
    pub velocity: f64,

    /// Latitude in degrees. Zero is treated as unset.
    pub latitude: f64,

    /// Longitude in degrees. Zero is treated as unset.
    pub longitude: f64,
}

impl Vessel {
    pub fn new(
        id: VesselId,
        name: impl Into<String>,
        velocity: f64,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            velocity,
            latitude,
            longitude,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a velocity-only update.
///
/// Accepts either a bare JSON number (`12.5`) or an object (`{"velocity": 12.5}`).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VelocityUpdate {
    Bare(f64),
    Wrapped { velocity: f64 },
}

impl VelocityUpdate {
    pub fn velocity(self) -> f64 {
        match self {
            VelocityUpdate::Bare(velocity) => velocity,
            VelocityUpdate::Wrapped { velocity } => velocity,
        }
    }
}
