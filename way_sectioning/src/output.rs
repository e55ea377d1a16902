use std::collections::BTreeMap;

use anyhow::Result;

use abstutil::prettyprint_usize;
use atlas::{Area, Atlas, AtlasBuilder, Edge, Line, Node, Point, Relation};
use geom::Distance;
use raw_atlas::WayID;

/// Everything a run produced, held back until every phase has succeeded. Nothing reaches an
/// `AtlasBuilder` from a failed run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionedAtlas {
    pub nodes: BTreeMap<i64, Node>,
    pub edges: BTreeMap<i64, Edge>,
    pub areas: BTreeMap<i64, Area>,
    pub lines: BTreeMap<i64, Line>,
    pub points: BTreeMap<i64, Point>,
    pub relations: BTreeMap<i64, Relation>,
    /// Main edge ids of each sectioned way, in the way's order
    pub sections_per_way: BTreeMap<WayID, Vec<i64>>,
}

impl SectionedAtlas {
    /// Nodes go in before the edges touching them, and everything goes in before relations.
    pub fn build(&self, builder: &mut dyn AtlasBuilder) -> Result<()> {
        for n in self.nodes.values() {
            builder.add_node(n.id, n.location, n.tags.clone())?;
        }
        for p in self.points.values() {
            builder.add_point(p.id, p.location, p.tags.clone())?;
        }
        for e in self.edges.values() {
            builder.add_edge(e.id, e.start, e.end, e.polyline.clone(), e.tags.clone())?;
        }
        for a in self.areas.values() {
            builder.add_area(a.id, a.ring.clone(), a.tags.clone())?;
        }
        for l in self.lines.values() {
            builder.add_line(l.id, l.polyline.clone(), l.tags.clone())?;
        }
        for r in self.relations.values() {
            builder.add_relation(r.id, r.osm_id, r.members.clone(), r.tags.clone())?;
        }
        Ok(())
    }

    pub fn into_atlas(self) -> Result<Atlas> {
        let mut atlas = Atlas::new();
        self.build(&mut atlas)?;
        Ok(atlas)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} nodes, {} edges ({} total) from {} ways, {} areas, {} lines, {} points, {} \
             relations",
            prettyprint_usize(self.nodes.len()),
            prettyprint_usize(self.edges.len()),
            self.edges
                .values()
                .map(|e| e.polyline.length())
                .sum::<Distance>(),
            prettyprint_usize(self.sections_per_way.len()),
            prettyprint_usize(self.areas.len()),
            prettyprint_usize(self.lines.len()),
            prettyprint_usize(self.points.len()),
            prettyprint_usize(self.relations.len())
        )
    }
}
