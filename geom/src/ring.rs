use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::LonLat;

/// Maybe a misnomer, but like a PolyLine, but closed: the first and last point are the same.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pts: Vec<LonLat>,
}

impl Ring {
    pub fn new(pts: Vec<LonLat>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with < 4 points");
        }
        if pts[0].to_hashable() != pts.last().unwrap().to_hashable() {
            bail!("Can't make a ring with mismatching first/last points");
        }
        Ok(Ring { pts })
    }

    pub fn points(&self) -> &Vec<LonLat> {
        &self.pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_only() {
        let a = LonLat::new(0.0, 0.0);
        let b = LonLat::new(1.0, 0.0);
        let c = LonLat::new(1.0, 1.0);
        assert!(Ring::new(vec![a, b, c, a]).is_ok());
        assert!(Ring::new(vec![a, b, c]).is_err());
        assert!(Ring::new(vec![a, b, c, b]).is_err());
    }
}
