//! Decides which Atlas entity each OSM primitive turns into. Everything here is a pure function
//! of a primitive's own tags and references.

use std::collections::BTreeSet;

use anyhow::Result;

use abstutil::Tags;
use raw_atlas::{osm, RawNode, RawWay};

use crate::{SectioningConfig, TagFilter};

/// Ways with fewer distinct nodes than this can't be areas.
const MINIMUM_AREA_DISTINCT_NODES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WayClassification {
    /// Routable; gets sectioned into directed edges
    Edge,
    Area,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClassification {
    /// The start or end of some edge section
    TopologicalNode,
    Point,
    /// Just a shape point, dropped from the output
    Neither,
}

pub struct Classifier<'a> {
    config: &'a SectioningConfig,
    edge_filter: &'a TagFilter,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a SectioningConfig) -> Result<Classifier<'a>> {
        let edge_filter = match config.edge_filter {
            Some(ref f) => f,
            None => bail!("The configuration has no edge_filter, so nothing can be classified"),
        };
        Ok(Classifier {
            config,
            edge_filter,
        })
    }

    pub fn classify_way(&self, way: &RawWay) -> WayClassification {
        if self.is_edge(&way.tags) {
            return WayClassification::Edge;
        }
        let distinct: BTreeSet<_> = way.nodes.iter().collect();
        if way.is_closed()
            && distinct.len() >= MINIMUM_AREA_DISTINCT_NODES
            && (way.tags.is(osm::AREA, "yes") || !has_area_exclusion(&way.tags))
        {
            return WayClassification::Area;
        }
        WayClassification::Line
    }

    pub fn is_edge(&self, tags: &Tags) -> bool {
        self.edge_filter.matches(tags)
    }

    /// Topological nodes come first. A topological node may also be a point; callers check
    /// `is_point` separately for that.
    pub fn classify_node(
        &self,
        node: &RawNode,
        is_referenced_by_edge: bool,
        is_referenced_by_relation: bool,
    ) -> NodeClassification {
        if is_referenced_by_edge {
            NodeClassification::TopologicalNode
        } else if self.is_point(node, is_referenced_by_relation) {
            NodeClassification::Point
        } else {
            NodeClassification::Neither
        }
    }

    pub fn is_point(&self, node: &RawNode, is_referenced_by_relation: bool) -> bool {
        (is_referenced_by_relation && self.config.in_jurisdiction(&node.tags))
            || has_meaningful_tags(&node.tags)
    }
}

/// Closed ways with these are lines, unless they're explicitly areas.
fn has_area_exclusion(tags: &Tags) -> bool {
    tags.is(osm::ROUTE, "ferry")
        || tags.is(osm::MAN_MADE, "pier")
        || tags.has_any(&[osm::RAILWAY, osm::HIGHWAY])
}

/// Anything beyond the metadata attached while reading the extract and slicing countries.
pub fn has_meaningful_tags(tags: &Tags) -> bool {
    tags.keys()
        .any(|k| !osm::BASELINE_TAG_KEYS.contains(&k.as_str()))
}
