use anyhow::Result;

use abstutil::Tags;
use geom::{LonLat, PolyLine, Ring};

use crate::RelationMember;

/// Receives every entity of a finished pipeline run. Implementations decide how to index and
/// store them; callers must add nodes before the edges that touch them, and members before the
/// relations that refer to them.
pub trait AtlasBuilder {
    fn add_node(&mut self, id: i64, location: LonLat, tags: Tags) -> Result<()>;
    /// `start` and `end` are node ids, already added. The polyline runs from one to the other.
    fn add_edge(
        &mut self,
        id: i64,
        start: i64,
        end: i64,
        polyline: PolyLine,
        tags: Tags,
    ) -> Result<()>;
    fn add_area(&mut self, id: i64, ring: Ring, tags: Tags) -> Result<()>;
    fn add_line(&mut self, id: i64, polyline: PolyLine, tags: Tags) -> Result<()>;
    fn add_point(&mut self, id: i64, location: LonLat, tags: Tags) -> Result<()>;
    fn add_relation(
        &mut self,
        id: i64,
        osm_id: i64,
        members: Vec<RelationMember>,
        tags: Tags,
    ) -> Result<()>;
}
