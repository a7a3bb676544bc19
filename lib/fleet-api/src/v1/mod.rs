//! v1 API resources

pub mod envelope;
pub mod port;
pub mod vessel;

pub use envelope::{
    format_arrival_time, ClosestPortResponse, ErrorBody, PortListResponse, ShipListResponse,
    ShipResponse,
};
pub use port::{Port, PortId};
pub use vessel::{VelocityUpdate, Vessel, VesselId};
