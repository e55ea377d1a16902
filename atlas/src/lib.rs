//! The Atlas is the typed output of way sectioning: nodes, directed edges, areas, lines, points,
//! and relations. The `AtlasBuilder` trait is the only way entities get in; `Atlas` is the
//! in-memory implementation used by the CLI and tests.

#[macro_use]
extern crate anyhow;

mod atlas;
mod builder;
mod entities;

pub use crate::atlas::Atlas;
pub use crate::builder::AtlasBuilder;
pub use crate::entities::{Area, Edge, ItemType, Line, Node, Point, Relation, RelationMember};
