use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Distance;

/// OSM stores coordinates with 7 decimal places.
const DM7_PER_DEGREE: f64 = 10_000_000.0;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    pub fn gps_dist(self, other: LonLat) -> Distance {
        // Haversine distance
        let earth_radius_m = 6_371_000.0;
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(earth_radius_m * c)
    }

    /// Rounds to OSM precision, producing something usable as a map key.
    pub fn to_hashable(self) -> HashableLonLat {
        HashableLonLat {
            lon_dm7: (self.longitude * DM7_PER_DEGREE).round() as i64,
            lat_dm7: (self.latitude * DM7_PER_DEGREE).round() as i64,
        }
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// A location in fixed-point degrees * 10^7. Two `LonLat`s that OSM would consider the same place
/// hash the same.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HashableLonLat {
    lon_dm7: i64,
    lat_dm7: i64,
}

impl HashableLonLat {
    pub fn to_lonlat(self) -> LonLat {
        LonLat::new(
            self.lon_dm7 as f64 / DM7_PER_DEGREE,
            self.lat_dm7 as f64 / DM7_PER_DEGREE,
        )
    }
}
