//! The raw atlas is the input to way sectioning: plain OSM nodes, ways, and relations for one
//! shard, already sliced to a country by an upstream stage. Nothing here has any topology yet; a
//! way is just a list of node references and some tags.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use abstutil::{deserialize_btreemap, serialize_btreemap, Tags};
use geom::{LonLat, SlippyTile};

pub use self::neighbors::NeighborFetcher;
pub use self::osm::{NodeID, OsmID, RelationID, WayID};

mod neighbors;
pub mod osm;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawAtlas {
    /// Which shard this data covers. Only needed when some way leaves the shard.
    pub shard: Option<SlippyTile>,
    #[serde(
        serialize_with = "serialize_btreemap",
        deserialize_with = "deserialize_btreemap"
    )]
    pub nodes: BTreeMap<NodeID, RawNode>,
    #[serde(
        serialize_with = "serialize_btreemap",
        deserialize_with = "deserialize_btreemap"
    )]
    pub ways: BTreeMap<WayID, RawWay>,
    #[serde(
        serialize_with = "serialize_btreemap",
        deserialize_with = "deserialize_btreemap"
    )]
    pub relations: BTreeMap<RelationID, RawRelation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub pt: LonLat,
    pub tags: Tags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWay {
    /// Order matters, and the same node may appear more than once.
    pub nodes: Vec<NodeID>,
    pub tags: Tags,
}

impl RawWay {
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.nodes[0] == *self.nodes.last().unwrap()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRelation {
    /// Role, member
    pub members: Vec<(String, OsmID)>,
    pub tags: Tags,
}

impl RawAtlas {
    pub fn blank(shard: Option<SlippyTile>) -> RawAtlas {
        RawAtlas {
            shard,
            nodes: BTreeMap::new(),
            ways: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn load(path: &str) -> Result<RawAtlas> {
        abstutil::read_json(path)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        abstutil::write_json(path, self)
    }

    pub fn add_node(&mut self, id: i64, pt: LonLat, tags: Tags) -> NodeID {
        let id = NodeID(id);
        self.nodes.insert(id, RawNode { pt, tags });
        id
    }

    pub fn add_way(&mut self, id: i64, nodes: Vec<NodeID>, tags: Tags) -> WayID {
        let id = WayID(id);
        self.ways.insert(id, RawWay { nodes, tags });
        id
    }

    pub fn add_relation(&mut self, id: i64, members: Vec<(String, OsmID)>, tags: Tags) -> RelationID {
        let id = RelationID(id);
        self.relations.insert(id, RawRelation { members, tags });
        id
    }

    pub fn location(&self, id: NodeID) -> Option<LonLat> {
        self.nodes.get(&id).map(|n| n.pt)
    }
}
