use std::fmt;

use serde::{Deserialize, Serialize};

use abstutil::Tags;
use geom::{LonLat, PolyLine, Ring};

/// Which kind of Atlas entity an identifier refers to. The same number can name a `Node` and a
/// `Point` at once, so a relation member needs both.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemType {
    Node,
    Edge,
    Area,
    Line,
    Point,
    Relation,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A topological node: the start or end of at least one edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub location: LonLat,
    pub tags: Tags,
}

/// A directed, routable arc. A negative id means this is the reverse of a two-way section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: i64,
    pub polyline: PolyLine,
    pub start: i64,
    pub end: i64,
    pub tags: Tags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub ring: Ring,
    pub tags: Tags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: i64,
    pub polyline: PolyLine,
    pub tags: Tags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    pub location: LonLat,
    pub tags: Tags,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationMember {
    pub id: i64,
    pub item_type: ItemType,
    pub role: String,
}

impl RelationMember {
    pub fn new<I: Into<String>>(id: i64, item_type: ItemType, role: I) -> RelationMember {
        RelationMember {
            id,
            item_type,
            role: role.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: i64,
    pub osm_id: i64,
    /// In the original order
    pub members: Vec<RelationMember>,
    pub tags: Tags,
}
