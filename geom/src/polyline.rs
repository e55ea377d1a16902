use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{Distance, LonLat};

/// An ordered sequence of at least two GPS points. Consecutive points may coincide; a section
/// between two visits of the same node has zero length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<LonLat>,
}

impl PolyLine {
    pub fn new(pts: Vec<LonLat>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine, got {}", pts.len());
        }
        Ok(PolyLine { pts })
    }

    /// Like `new`, but for callers that have already checked the length.
    pub fn must_new(pts: Vec<LonLat>) -> PolyLine {
        PolyLine::new(pts).unwrap()
    }

    pub fn reversed(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.reverse();
        PolyLine { pts }
    }

    pub fn points(&self) -> &Vec<LonLat> {
        &self.pts
    }

    pub fn first_pt(&self) -> LonLat {
        self.pts[0]
    }

    pub fn last_pt(&self) -> LonLat {
        *self.pts.last().unwrap()
    }

    pub fn length(&self) -> Distance {
        self.pts.windows(2).map(|pair| pair[0].gps_dist(pair[1])).sum()
    }

    pub fn is_zero_length(&self) -> bool {
        let first = self.first_pt().to_hashable();
        self.pts.iter().all(|pt| pt.to_hashable() == first)
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  LonLat::new({}, {}),", pt.longitude, pt.latitude)?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversing() {
        let pl = PolyLine::must_new(vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(0.0, 1.0),
            LonLat::new(1.0, 1.0),
        ]);
        let rev = pl.reversed();
        assert_eq!(rev.first_pt(), pl.last_pt());
        assert_eq!(rev.last_pt(), pl.first_pt());
        assert_eq!(rev.reversed(), pl);
        assert!(!pl.is_zero_length());
    }

    #[test]
    fn degenerate() {
        assert!(PolyLine::new(vec![LonLat::new(0.0, 0.0)]).is_err());
        let pt = LonLat::new(3.0, 4.0);
        let pl = PolyLine::must_new(vec![pt, pt]);
        assert!(pl.is_zero_length());
        assert_eq!(pl.length(), Distance::ZERO);
    }
}
