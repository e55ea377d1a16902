use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use abstutil::{MultiMap, Tags};
use geom::{LonLat, PolyLine, Ring};

use crate::{Area, AtlasBuilder, Edge, ItemType, Line, Node, Point, Relation, RelationMember};

/// A simple in-memory Atlas. Everything is keyed by identifier in sorted order, so serializing
/// the same content twice gives byte-identical output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Atlas {
    pub nodes: BTreeMap<i64, Node>,
    pub edges: BTreeMap<i64, Edge>,
    pub areas: BTreeMap<i64, Area>,
    pub lines: BTreeMap<i64, Line>,
    pub points: BTreeMap<i64, Point>,
    pub relations: BTreeMap<i64, Relation>,

    /// Node -> every edge starting or ending there
    edges_per_node: MultiMap<i64, i64>,
}

impl Atlas {
    pub fn new() -> Atlas {
        Atlas::default()
    }

    pub fn load(path: &str) -> Result<Atlas> {
        abstutil::read_json(path)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        abstutil::write_json(path, self)
    }

    /// Every edge touching a node, in or out, sorted by id.
    pub fn connected_edges(&self, node: i64) -> Vec<&Edge> {
        self.edges_per_node
            .get(node)
            .iter()
            .map(|e| &self.edges[e])
            .collect()
    }

    pub fn outgoing_edges(&self, node: i64) -> Vec<&Edge> {
        self.connected_edges(node)
            .into_iter()
            .filter(|e| e.start == node)
            .collect()
    }

    pub fn incoming_edges(&self, node: i64) -> Vec<&Edge> {
        self.connected_edges(node)
            .into_iter()
            .filter(|e| e.end == node)
            .collect()
    }

    pub fn has_member(&self, member: &RelationMember) -> bool {
        match member.item_type {
            ItemType::Node => self.nodes.contains_key(&member.id),
            ItemType::Edge => self.edges.contains_key(&member.id),
            ItemType::Area => self.areas.contains_key(&member.id),
            ItemType::Line => self.lines.contains_key(&member.id),
            ItemType::Point => self.points.contains_key(&member.id),
            ItemType::Relation => self.relations.contains_key(&member.id),
        }
    }

    /// Edges as LineStrings and nodes as Points, with tags and ids as properties.
    pub fn to_geojson(&self) -> String {
        let mut features = Vec::new();
        for edge in self.edges.values() {
            features.push(make_feature(
                geojson::Value::LineString(
                    edge.polyline
                        .points()
                        .iter()
                        .map(|pt| vec![pt.longitude, pt.latitude])
                        .collect(),
                ),
                ItemType::Edge,
                edge.id,
                &edge.tags,
            ));
        }
        for node in self.nodes.values() {
            features.push(make_feature(
                geojson::Value::Point(vec![node.location.longitude, node.location.latitude]),
                ItemType::Node,
                node.id,
                &node.tags,
            ));
        }
        let fc = geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        geojson::GeoJson::from(fc).to_string()
    }
}

fn make_feature(value: geojson::Value, item_type: ItemType, id: i64, tags: &Tags) -> geojson::Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("type".to_string(), item_type.to_string().into());
    properties.insert("id".to_string(), id.into());
    for (k, v) in tags.inner() {
        properties.insert(k.to_string(), v.to_string().into());
    }
    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl AtlasBuilder for Atlas {
    fn add_node(&mut self, id: i64, location: LonLat, tags: Tags) -> Result<()> {
        if self.nodes.contains_key(&id) {
            bail!("Duplicate node {}", id);
        }
        self.nodes.insert(id, Node { id, location, tags });
        Ok(())
    }

    fn add_edge(
        &mut self,
        id: i64,
        start: i64,
        end: i64,
        polyline: PolyLine,
        tags: Tags,
    ) -> Result<()> {
        if self.edges.contains_key(&id) {
            bail!("Duplicate edge {}", id);
        }
        // Several nodes may share a location, so the endpoints are given, never looked up by
        // location. They still have to sit where the polyline starts and ends.
        for (node, pt) in [(start, polyline.first_pt()), (end, polyline.last_pt())] {
            match self.nodes.get(&node) {
                Some(n) => {
                    if n.location.to_hashable() != pt.to_hashable() {
                        bail!(
                            "Edge {} touches node {} at {}, but that node is at {}",
                            id,
                            node,
                            pt,
                            n.location
                        );
                    }
                }
                None => bail!("Edge {} touches node {}, which hasn't been added", id, node),
            }
        }
        self.edges_per_node.insert(start, id);
        self.edges_per_node.insert(end, id);
        self.edges.insert(
            id,
            Edge {
                id,
                polyline,
                start,
                end,
                tags,
            },
        );
        Ok(())
    }

    fn add_area(&mut self, id: i64, ring: Ring, tags: Tags) -> Result<()> {
        if self.areas.contains_key(&id) {
            bail!("Duplicate area {}", id);
        }
        self.areas.insert(id, Area { id, ring, tags });
        Ok(())
    }

    fn add_line(&mut self, id: i64, polyline: PolyLine, tags: Tags) -> Result<()> {
        if self.lines.contains_key(&id) {
            bail!("Duplicate line {}", id);
        }
        self.lines.insert(id, Line { id, polyline, tags });
        Ok(())
    }

    fn add_point(&mut self, id: i64, location: LonLat, tags: Tags) -> Result<()> {
        if self.points.contains_key(&id) {
            bail!("Duplicate point {}", id);
        }
        self.points.insert(id, Point { id, location, tags });
        Ok(())
    }

    fn add_relation(
        &mut self,
        id: i64,
        osm_id: i64,
        members: Vec<RelationMember>,
        tags: Tags,
    ) -> Result<()> {
        if self.relations.contains_key(&id) {
            bail!("Duplicate relation {}", id);
        }
        for member in &members {
            // Relations can refer to each other in cycles, so those are checked later by callers
            if member.item_type != ItemType::Relation && !self.has_member(member) {
                bail!(
                    "Relation {} refers to {} {}, which hasn't been added",
                    id,
                    member.item_type,
                    member.id
                );
            }
        }
        self.relations.insert(
            id,
            Relation {
                id,
                osm_id,
                members,
                tags,
            },
        );
        Ok(())
    }
}
