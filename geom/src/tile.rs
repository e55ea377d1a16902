use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A square in the standard web-mercator tiling. The world is divided into one shard per tile at
/// some zoom level, and every shard is processed independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlippyTile {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl SlippyTile {
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<SlippyTile> {
        if zoom > 30 {
            bail!("Zoom {} is too deep", zoom);
        }
        let max = SlippyTile::tiles_per_side(zoom);
        if x >= max || y >= max {
            bail!("{}-{}-{} is outside the tiling", zoom, x, y);
        }
        Ok(SlippyTile { zoom, x, y })
    }

    fn tiles_per_side(zoom: u8) -> u32 {
        1 << zoom
    }

    /// The up to 8 tiles sharing an edge or corner with this one. Longitude wraps around the
    /// antimeridian; there's nothing beyond the poles.
    pub fn neighbors(&self) -> Vec<SlippyTile> {
        let n = SlippyTile::tiles_per_side(self.zoom) as i64;
        let mut result = Vec::new();
        for dy in [-1, 0, 1] {
            for dx in [-1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let y = self.y as i64 + dy;
                if y < 0 || y >= n {
                    continue;
                }
                let x = (self.x as i64 + dx).rem_euclid(n);
                let tile = SlippyTile {
                    zoom: self.zoom,
                    x: x as u32,
                    y: y as u32,
                };
                if tile != *self && !result.contains(&tile) {
                    result.push(tile);
                }
            }
        }
        result
    }
}

impl fmt::Display for SlippyTile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}-{}", self.zoom, self.x, self.y)
    }
}

impl FromStr for SlippyTile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<SlippyTile> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            bail!("{} isn't zoom-x-y", s);
        }
        let zoom = parts[0]
            .parse::<u8>()
            .with_context(|| format!("bad zoom in {}", s))?;
        let x = parts[1]
            .parse::<u32>()
            .with_context(|| format!("bad x in {}", s))?;
        let y = parts[2]
            .parse::<u32>()
            .with_context(|| format!("bad y in {}", s))?;
        SlippyTile::new(zoom, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors() {
        let tile = SlippyTile::new(10, 5, 5).unwrap();
        assert_eq!(tile.neighbors().len(), 8);

        // The top row has nothing to the north, and wraps around horizontally
        let corner = SlippyTile::new(2, 0, 0).unwrap();
        let n = corner.neighbors();
        assert_eq!(n.len(), 5);
        assert!(n.contains(&SlippyTile::new(2, 3, 0).unwrap()));
        assert!(n.contains(&SlippyTile::new(2, 3, 1).unwrap()));

        // Zoom 0 is the whole world
        assert!(SlippyTile::new(0, 0, 0).unwrap().neighbors().is_empty());
    }

    #[test]
    fn parsing() {
        let tile: SlippyTile = "12-655-1429".parse().unwrap();
        assert_eq!(tile, SlippyTile::new(12, 655, 1429).unwrap());
        assert_eq!(tile.to_string(), "12-655-1429");
        assert!("12-655".parse::<SlippyTile>().is_err());
        assert!("1-5-0".parse::<SlippyTile>().is_err());
    }
}
