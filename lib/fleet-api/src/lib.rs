//! Fleet tracker API types
//!
//! This library defines the wire-level resources exposed by the fleet gateway:
//! - Vessel: a tracked ship with name, velocity and last known position
//! - Port: a fixed reference location vessels can be routed to
//! - Response envelopes returned by the HTTP binding

pub mod v1;

pub use v1::{
    ClosestPortResponse, ErrorBody, Port, PortId, PortListResponse, ShipListResponse,
    ShipResponse, VelocityUpdate, Vessel, VesselId,
};
