use geo::{Distance, Geodesic};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Straight-line distance to `to` in kilometers, on the ellipsoidal
    /// Earth model.
    pub fn geodesic_distance_km(&self, to: &Location) -> f64 {
        Geodesic.distance(self.point, to.point) / 1000.0
    }
}

/// Coordinate ranges are a caller contract; a violation names the offending
/// team or incident.
pub(crate) fn check_location(id: &str, location: &Location) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&location.lat()) {
        return Err(ValidationError::InvalidLatitude {
            id: id.to_owned(),
            latitude: location.lat(),
        });
    }

    if !(-180.0..=180.0).contains(&location.lon()) {
        return Err(ValidationError::InvalidLongitude {
            id: id.to_owned(),
            longitude: location.lon(),
        });
    }

    Ok(())
}
