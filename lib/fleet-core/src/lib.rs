//! Core fleet tracking functionality
//!
//! This library provides:
//! - Vessel registry with identity management and field validation
//! - Fixed port catalog
//! - Great-circle distance and arrival-time estimation
//! - Nearest-port resolution for a registered vessel

pub mod catalog;
pub mod error;
pub mod eta;
pub mod geo;
pub mod registry;
pub mod resolver;

pub use catalog::PortCatalog;
pub use error::{FleetError, Result};
pub use registry::{VesselListing, VesselRegistry};
pub use resolver::{ClosestPortResolver, DistanceCandidate, PortResolution};
