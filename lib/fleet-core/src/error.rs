use thiserror::Error;

pub type Result<T> = std::result::Result<T, FleetError>;

/// Failures reported by registry and resolver operations.
///
/// Every variant is recoverable by the caller; a rejected write leaves the
/// registry untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FleetError {
    /// Empty name or a zero velocity/latitude/longitude
    #[error("{0}")]
    InvalidInput(String),

    /// Duplicate id on add/update, or an absent id on remove
    #[error("{0}")]
    Conflict(String),

    /// Unknown id on update, velocity update or resolution
    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FleetError {
    pub(crate) fn duplicate_id() -> Self {
        FleetError::Conflict("A ship with the same ID already exists.".to_string())
    }

    pub(crate) fn empty_name() -> Self {
        FleetError::InvalidInput("Please enter a non-empty name.".to_string())
    }

    pub(crate) fn zero_velocity() -> Self {
        FleetError::InvalidInput("Please enter a non-zero velocity.".to_string())
    }

    pub(crate) fn zero_latitude() -> Self {
        FleetError::InvalidInput("Please enter a non-zero value for Latitude.".to_string())
    }

    pub(crate) fn zero_longitude() -> Self {
        FleetError::InvalidInput("Please enter a non-zero value for Longitude.".to_string())
    }

    pub(crate) fn ship_not_found() -> Self {
        FleetError::NotFound("Ship not found.".to_string())
    }

    pub(crate) fn ship_not_exists() -> Self {
        FleetError::Conflict("Ship not exists.".to_string())
    }
}
