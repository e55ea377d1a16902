//! OSM identifiers and the tag keys that classification and sectioning look at.

use std::fmt;

use serde::{Deserialize, Serialize};

// These are normal OSM keys.
pub const HIGHWAY: &str = "highway";
pub const ONEWAY: &str = "oneway";
pub const JUNCTION: &str = "junction";
pub const ROUTE: &str = "route";
pub const RAILWAY: &str = "railway";
pub const MAN_MADE: &str = "man_made";
pub const AREA: &str = "area";
pub const BARRIER: &str = "barrier";

// Edit metadata attached to every primitive while reading the extract.
pub const LAST_EDIT_USER_NAME: &str = "last_edit_user_name";
pub const LAST_EDIT_USER_ID: &str = "last_edit_user_id";
pub const LAST_EDIT_TIME: &str = "last_edit_time";
pub const LAST_EDIT_CHANGESET: &str = "last_edit_changeset";
pub const LAST_EDIT_VERSION: &str = "last_edit_version";

// The country slicer inserts these. They're passed through untouched.
pub const ISO_COUNTRY_CODE: &str = "iso_country_code";
pub const SYNTHETIC_BOUNDARY_NODE: &str = "synthetic_boundary_node";
pub const SYNTHETIC_NEAREST_NEIGHBOR_COUNTRY_CODE: &str =
    "synthetic_nearest_neighbor_country_code";

// Way sectioning inserts these.
/// Marks the last section of a way that hit the section cap.
pub const SYNTHETIC_INVALID_WAY_SECTION: &str = "synthetic_invalid_way_section";
/// Marks sections that end or start where the way left the shard and the neighboring data was
/// unavailable.
pub const SYNTHETIC_SHARD_CUT: &str = "synthetic_shard_cut";

/// Tags that every node may carry without being interesting on its own.
pub const BASELINE_TAG_KEYS: [&str; 8] = [
    LAST_EDIT_USER_NAME,
    LAST_EDIT_USER_ID,
    LAST_EDIT_TIME,
    LAST_EDIT_CHANGESET,
    LAST_EDIT_VERSION,
    ISO_COUNTRY_CODE,
    SYNTHETIC_BOUNDARY_NODE,
    SYNTHETIC_NEAREST_NEIGHBOR_COUNTRY_CODE,
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeID(pub i64);
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WayID(pub i64);
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationID(pub i64);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OsmID {
    Node(NodeID),
    Way(WayID),
    Relation(RelationID),
}

impl fmt::Display for OsmID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OsmID::Node(n) => write!(f, "{}", n),
            OsmID::Way(w) => write!(f, "{}", w),
            OsmID::Relation(r) => write!(f, "{}", r),
        }
    }
}

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/node/{}", self.0)
    }
}
impl fmt::Display for WayID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/way/{}", self.0)
    }
}
impl fmt::Display for RelationID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/relation/{}", self.0)
    }
}

impl OsmID {
    pub fn inner(self) -> i64 {
        match self {
            OsmID::Node(n) => n.0,
            OsmID::Way(w) => w.0,
            OsmID::Relation(r) => r.0,
        }
    }
}
