//! Turns one shard of raw OSM primitives into Atlas entities. Routable ways are cut into sections
//! wherever they meet other routable ways, loop back on themselves, pass a barrier, or leave the
//! available data. Each section becomes one or two directed edges, and relations are rewritten to
//! point at whatever their members turned into.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod classify;
mod config;
mod counter;
mod neighbors;
mod oneway;
mod output;
mod relations;
mod split_ways;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use abstutil::{Tags, Timer};
use atlas::{Area, Edge, Line, Node, Point};
use geom::{PolyLine, Ring};
use raw_atlas::{osm, NeighborFetcher, NodeID, OsmID, RawAtlas, RawWay, WayID};

pub use crate::classify::{has_meaningful_tags, Classifier, NodeClassification, WayClassification};
pub use crate::config::{OverflowPolicy, SectioningConfig, TagFilter, TagMatch};
pub use crate::counter::NodeOccurrences;
pub use crate::neighbors::{fetch_neighbors, NodeLookup};
pub use crate::oneway::Directionality;
pub use crate::output::SectionedAtlas;
pub use crate::relations::{retarget, MemberIndex};
pub use crate::split_ways::{
    collapsed_section, section_edge_id, section_way, way_shape, EdgeSection, SectioningContext,
    WayShape, MAXIMUM_SECTIONS,
};

/// Runs every phase over one shard. Per-way problems are skipped and recorded as warnings on the
/// timer; configuration problems fail the whole run.
pub fn section_raw_atlas(
    raw: &RawAtlas,
    config: &SectioningConfig,
    fetcher: Option<&dyn NeighborFetcher>,
    timer: &mut Timer,
) -> Result<SectionedAtlas> {
    let classifier = Classifier::new(config)?;

    timer.start("classify ways");
    let mut edge_ways: Vec<(WayID, &RawWay)> = Vec::new();
    let mut other_ways: Vec<(WayID, &RawWay, WayClassification)> = Vec::new();
    for (id, way) in &raw.ways {
        match classifier.classify_way(way) {
            WayClassification::Edge => edge_ways.push((*id, way)),
            x => other_ways.push((*id, way, x)),
        }
    }
    timer.stop("classify ways");
    info!(
        "{} edge ways, {} areas and lines",
        edge_ways.len(),
        other_ways.len()
    );

    let shard_spanning: Vec<WayID> = edge_ways
        .iter()
        .filter(|(_, way)| way.nodes.iter().any(|n| !raw.nodes.contains_key(n)))
        .map(|(id, _)| *id)
        .collect();
    let neighbors = fetch_neighbors(raw, &shard_spanning, fetcher, timer)?;
    let lookup = NodeLookup::new(raw, &neighbors);

    timer.start("count node occurrences");
    // A way crossing into a neighbor shows up there too; count each way once
    let mut counted_ways: BTreeSet<WayID> = edge_ways.iter().map(|(id, _)| *id).collect();
    let mut neighbor_edge_ways: Vec<&[NodeID]> = Vec::new();
    for neighbor in lookup.neighbors() {
        for (id, way) in &neighbor.ways {
            if classifier.is_edge(&way.tags) && counted_ways.insert(*id) {
                neighbor_edge_ways.push(&way.nodes);
            }
        }
    }
    let occurrences = NodeOccurrences::count(
        edge_ways
            .iter()
            .map(|(_, way)| way.nodes.as_slice())
            .chain(neighbor_edge_ways),
    );
    timer.stop("count node occurrences");

    let mut barriers = BTreeSet::new();
    for (_, way) in &edge_ways {
        for id in &way.nodes {
            if let Some(node) = lookup.node(*id) {
                if config.barrier_filter.matches(&node.tags) {
                    barriers.insert(*id);
                }
            }
        }
    }

    let ctx = SectioningContext {
        occurrences: &occurrences,
        barriers: &barriers,
        overflow_policy: config.overflow_policy,
    };
    let keep_degenerate_ways = config.keep_degenerate_ways;
    let results = timer.parallelize("section edge ways", edge_ways.clone(), |(id, way)| {
        match way_shape(&way.nodes, |n| lookup.location(n)) {
            WayShape::Malformed => Err(anyhow!(
                "Skipping {}; it has {} node references and nothing to locate",
                id,
                way.nodes.len()
            )),
            WayShape::Collapsed => {
                if keep_degenerate_ways {
                    collapsed_section(id, way, |n| lookup.is_resolved(n)).map(|s| vec![s])
                } else {
                    Err(anyhow!("Skipping {}; all of its nodes are at one place", id))
                }
            }
            WayShape::Normal => Ok(section_way(id, way, &ctx, |n| lookup.is_resolved(n))),
        }
    });

    let mut output = SectionedAtlas::default();
    let mut endpoints: BTreeSet<NodeID> = BTreeSet::new();
    let mut cut_nodes: BTreeSet<NodeID> = BTreeSet::new();
    let mut visited: BTreeSet<NodeID> = BTreeSet::new();
    timer.start_iter("build edges", results.len());
    for ((id, way), result) in edge_ways.iter().zip(results) {
        timer.next();
        let sections = match result {
            Ok(sections) => sections,
            Err(err) => {
                timer.warn(err.to_string());
                continue;
            }
        };
        if sections.is_empty() {
            timer.warn(format!("{} has no part inside the available data", id));
            continue;
        }
        let directionality = Directionality::resolve(&way.tags);
        for section in &sections {
            endpoints.insert(section.nodes[0]);
            endpoints.insert(*section.nodes.last().unwrap());
            if section.cut_start {
                cut_nodes.insert(section.nodes[0]);
            }
            if section.cut_end {
                cut_nodes.insert(*section.nodes.last().unwrap());
            }
            visited.extend(section.nodes.iter().cloned());

            for (edge_id, nodes) in section.directed_edges(directionality) {
                let edge = make_edge(edge_id, &nodes, &section.tags, &lookup)?;
                output.edges.insert(edge_id, edge);
            }
        }
        output
            .sections_per_way
            .insert(*id, sections.iter().map(|s| s.edge_id()).collect());
    }

    timer.start("classify nodes");
    let referenced_by_relation: BTreeSet<NodeID> = raw
        .relations
        .values()
        .flat_map(|r| r.members.iter())
        .filter_map(|(_, member)| match member {
            OsmID::Node(n) => Some(*n),
            _ => None,
        })
        .collect();
    for id in &endpoints {
        let node = match lookup.node(*id) {
            Some(n) => n,
            None => bail!("{} ends a section, but has no location", id),
        };
        let mut tags = node.tags.clone();
        if cut_nodes.contains(id) {
            tags.insert(osm::SYNTHETIC_BOUNDARY_NODE, "yes");
        }
        output.nodes.insert(
            id.0,
            Node {
                id: id.0,
                location: node.pt,
                tags,
            },
        );
    }
    let mut candidates: BTreeSet<NodeID> = raw.nodes.keys().cloned().collect();
    if config.keep_all_nodes_as_points {
        candidates.extend(visited.iter().cloned());
    }
    for id in candidates {
        let node = match lookup.node(id) {
            Some(n) => n,
            None => continue,
        };
        let is_relation_member = referenced_by_relation.contains(&id);
        let mut is_point =
            match classifier.classify_node(node, endpoints.contains(&id), is_relation_member) {
                // The same OSM node can be both
                NodeClassification::TopologicalNode => {
                    classifier.is_point(node, is_relation_member)
                }
                NodeClassification::Point => true,
                NodeClassification::Neither => false,
            };
        if config.keep_all_nodes_as_points && visited.contains(&id) {
            is_point = true;
        }
        if is_point {
            output.points.insert(
                id.0,
                Point {
                    id: id.0,
                    location: node.pt,
                    tags: node.tags.clone(),
                },
            );
        }
    }
    timer.stop("classify nodes");

    timer.start("build areas and lines");
    for (id, way, classification) in other_ways {
        if classification == WayClassification::Area {
            match make_area(id, way, &lookup) {
                Ok(area) => {
                    output.areas.insert(id.0, area);
                }
                Err(err) => timer.warn(format!("Skipping area {}: {}", id, err)),
            }
        } else {
            match make_line(id, way, &lookup) {
                Ok(line) => {
                    output.lines.insert(id.0, line);
                }
                Err(err) => timer.warn(format!("Skipping line {}: {}", id, err)),
            }
        }
    }
    timer.stop("build areas and lines");

    timer.start("retarget relations");
    let index = MemberIndex {
        sections_per_way: output.sections_per_way.clone(),
        lines: output.lines.keys().cloned().collect(),
        areas: output.areas.keys().cloned().collect(),
        nodes: output.nodes.keys().cloned().collect(),
        points: output.points.keys().cloned().collect(),
    };
    output.relations = retarget(&raw.relations, &index, timer);
    timer.stop("retarget relations");

    info!("Sectioned shard: {}", output.describe());
    Ok(output)
}

fn make_edge(id: i64, nodes: &[NodeID], tags: &Tags, lookup: &NodeLookup) -> Result<Edge> {
    let mut pts = Vec::new();
    for n in nodes {
        match lookup.location(*n) {
            Some(pt) => pts.push(pt),
            None => bail!("Edge {} passes through {}, which has no location", id, n),
        }
    }
    Ok(Edge {
        id,
        polyline: PolyLine::new(pts)?,
        start: nodes[0].0,
        end: nodes[nodes.len() - 1].0,
        tags: tags.clone(),
    })
}

/// Every node of an area must be known; a partial ring isn't an area.
fn make_area(id: WayID, way: &RawWay, lookup: &NodeLookup) -> Result<Area> {
    let mut pts = Vec::new();
    for n in &way.nodes {
        match lookup.location(*n) {
            Some(pt) => pts.push(pt),
            None => bail!("{} is outside the available data", n),
        }
    }
    Ok(Area {
        id: id.0,
        ring: Ring::new(pts)?,
        tags: way.tags.clone(),
    })
}

/// Unknown nodes are left out, as long as two remain.
fn make_line(id: WayID, way: &RawWay, lookup: &NodeLookup) -> Result<Line> {
    let pts = way
        .nodes
        .iter()
        .filter_map(|n| lookup.location(*n))
        .collect();
    Ok(Line {
        id: id.0,
        polyline: PolyLine::new(pts)?,
        tags: way.tags.clone(),
    })
}
