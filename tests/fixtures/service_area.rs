//! Real Las Vegas / Henderson addresses for route fixtures.

use job_planner::Location;

/// A named place with coordinates.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub location: Location,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            location: Location::new(lat, lng),
        }
    }
}

/// Depot used as the route origin.
pub const DEPOT: Place = Place::new("Yard - Henderson", 36.0395, -114.9817);

pub const CUSTOMERS: &[Place] = &[
    Place::new("Wynn Las Vegas", 36.1263781, -115.1658180),
    Place::new("MGM Grand", 36.1023654, -115.1688720),
    Place::new("Longhorn Casino", 36.1070664, -115.0591256),
    Place::new("Green Valley Ranch", 36.0118, -115.0861),
    Place::new("Bellagio", 36.1126, -115.1767),
    Place::new("Caesars Palace", 36.1162, -115.1745),
];
