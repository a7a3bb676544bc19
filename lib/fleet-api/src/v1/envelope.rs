//! Response bodies returned by the HTTP binding

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::{Port, PortId, Vessel};

/// Single-ship response: a status message plus the affected record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShipResponse {
    pub message: String,
    pub ship: Vessel,
}

impl ShipResponse {
    pub fn new(message: impl Into<String>, ship: Vessel) -> Self {
        Self {
            message: message.into(),
            ship,
        }
    }
}

/// Listing response for all registered ships
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShipListResponse {
    pub message: String,
    pub ships: Vec<Vessel>,
}

/// Listing response for the port catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortListResponse {
    pub message: String,
    pub ports: Vec<Port>,
}

/// Nearest port for a ship together with the arrival estimate
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestPortResponse {
    pub port_id: PortId,
    pub port_name: String,
    pub port_latitude: f64,
    pub port_longitude: f64,
    /// Great-circle distance from the ship to the port in kilometres
    pub distance_km: f64,
    pub estimated_arrival_hours: f64,
    /// Arrival estimate formatted as `[-][d.]hh:mm:ss[.ffffff]`
    pub estimated_arrival_time: String,
    pub message: String,
}

impl ClosestPortResponse {
    pub fn new(
        message: impl Into<String>,
        port: &Port,
        distance_km: f64,
        hours: f64,
        arrival: TimeDelta,
    ) -> Self {
        Self {
            port_id: port.id,
            port_name: port.name.clone(),
            port_latitude: port.latitude,
            port_longitude: port.longitude,
            distance_km,
            estimated_arrival_hours: hours,
            estimated_arrival_time: format_arrival_time(&arrival),
            message: message.into(),
        }
    }
}

/// Error body shared by every failed request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Render a signed duration as `[-][d.]hh:mm:ss[.ffffff]`
pub fn format_arrival_time(delta: &TimeDelta) -> String {
    let (sign, abs) = if *delta < TimeDelta::zero() {
        ("-", -*delta)
    } else {
        ("", *delta)
    };

    let days = abs.num_days();
    let hours = abs.num_hours() % 24;
    let minutes = abs.num_minutes() % 60;
    let seconds = abs.num_seconds() % 60;
    let micros = abs.subsec_nanos() / 1_000;

    let mut out = String::from(sign);
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}
