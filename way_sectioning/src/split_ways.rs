//! Cuts edge ways into sections. A section ends wherever the way meets another edge way, revisits
//! one of its own nodes, passes a barrier, or leaves the data available for this shard. The next
//! section starts at that same node, so consecutive sections share exactly one vertex.

use std::collections::BTreeSet;

use anyhow::Result;

use abstutil::Tags;
use geom::{HashableLonLat, LonLat};
use raw_atlas::{osm, NodeID, RawWay, WayID};

use crate::{Directionality, NodeOccurrences, OverflowPolicy};

/// Section indices are packed into the last three decimal digits of an edge id.
pub const MAXIMUM_SECTIONS: usize = 999;
const SECTION_ID_MULTIPLIER: i64 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSection {
    pub way: WayID,
    /// Starts at 1
    pub index: usize,
    pub nodes: Vec<NodeID>,
    pub tags: Tags,
    /// The way continues before the first node, but that part couldn't be located
    pub cut_start: bool,
    /// The way continues after the last node, but that part couldn't be located
    pub cut_end: bool,
}

impl EdgeSection {
    /// `way * 1000 + index`. Relations and other shards depend on this exact scheme.
    pub fn edge_id(&self) -> i64 {
        section_edge_id(self.way, self.index)
    }

    /// One directed edge per allowed direction, as (id, nodes in travel order). The reverse of a
    /// two-way section gets the negated id.
    pub fn directed_edges(&self, directionality: Directionality) -> Vec<(i64, Vec<NodeID>)> {
        let mut reversed = self.nodes.clone();
        reversed.reverse();
        match directionality {
            Directionality::Forward => vec![(self.edge_id(), self.nodes.clone())],
            Directionality::Reverse => vec![(self.edge_id(), reversed)],
            Directionality::Bidirectional => vec![
                (self.edge_id(), self.nodes.clone()),
                (-self.edge_id(), reversed),
            ],
        }
    }
}

pub fn section_edge_id(way: WayID, index: usize) -> i64 {
    way.0 * SECTION_ID_MULTIPLIER + index as i64
}

/// Everything sectioning needs that isn't part of the way itself.
pub struct SectioningContext<'a> {
    pub occurrences: &'a NodeOccurrences,
    pub barriers: &'a BTreeSet<NodeID>,
    pub overflow_policy: OverflowPolicy,
}

#[derive(Debug, PartialEq)]
struct Span {
    start: usize,
    end: usize,
    cut_start: bool,
    cut_end: bool,
}

/// Splits one edge way. `is_resolved` says which node references have a known location; the
/// others are outside the available data and cut the way.
pub fn section_way<F: Fn(NodeID) -> bool>(
    id: WayID,
    way: &RawWay,
    ctx: &SectioningContext,
    is_resolved: F,
) -> Vec<EdgeSection> {
    let nodes = &way.nodes;
    if nodes.len() < 2 {
        return Vec::new();
    }
    let mut spans = find_spans(nodes, ctx, &is_resolved);
    let overflowed = apply_section_cap(&mut spans, ctx.overflow_policy);

    let num_spans = spans.len();
    spans
        .into_iter()
        .enumerate()
        .map(|(idx, span)| {
            let mut tags = way.tags.clone();
            if overflowed && idx == num_spans - 1 {
                tags.insert(osm::SYNTHETIC_INVALID_WAY_SECTION, "yes");
            }
            if span.cut_start || span.cut_end {
                tags.insert(osm::SYNTHETIC_SHARD_CUT, "yes");
            }
            EdgeSection {
                way: id,
                index: idx + 1,
                nodes: nodes[span.start..=span.end].to_vec(),
                tags,
                cut_start: span.cut_start,
                cut_end: span.cut_end,
            }
        })
        .collect()
}

fn find_spans<F: Fn(NodeID) -> bool>(
    nodes: &[NodeID],
    ctx: &SectioningContext,
    is_resolved: &F,
) -> Vec<Span> {
    let last = nodes.len() - 1;
    let mut spans = Vec::new();
    // Where the current section starts, and whether that's right after a gap
    let mut current: Option<(usize, bool)> = None;
    let mut after_gap = false;
    let mut seen = BTreeSet::new();

    for (idx, id) in nodes.iter().enumerate() {
        if !is_resolved(*id) {
            // If a section was open, it was only one node long; the crossing check below already
            // closed anything longer.
            current = None;
            after_gap = true;
            continue;
        }
        let repeat = !seen.insert(*id);
        let (start, cut_start) = match current {
            Some(x) => x,
            None => {
                current = Some((idx, after_gap));
                after_gap = false;
                continue;
            }
        };

        let crossing = idx < last && !is_resolved(nodes[idx + 1]);
        if idx == last
            || repeat
            || crossing
            || ctx.occurrences.is_section_boundary(*id)
            || ctx.barriers.contains(id)
        {
            spans.push(Span {
                start,
                end: idx,
                cut_start,
                cut_end: crossing,
            });
            current = Some((idx, false));
        }
    }
    spans
}

/// Returns true if the cap kicked in.
fn apply_section_cap(spans: &mut Vec<Span>, policy: OverflowPolicy) -> bool {
    if spans.len() <= MAXIMUM_SECTIONS {
        return false;
    }
    let last_idx = MAXIMUM_SECTIONS - 1;
    if policy == OverflowPolicy::MergeIntoLast {
        // Absorb everything up to the end of the way or the next gap, whichever comes first
        let mut end_idx = last_idx;
        while end_idx + 1 < spans.len() && spans[end_idx + 1].start == spans[end_idx].end {
            end_idx += 1;
        }
        spans[last_idx].end = spans[end_idx].end;
        spans[last_idx].cut_end = spans[end_idx].cut_end;
    }
    spans.truncate(MAXIMUM_SECTIONS);
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WayShape {
    /// Fewer than two node references, or nothing locatable at all
    Malformed,
    /// Every locatable node sits at one place
    Collapsed,
    Normal,
}

/// Classifies geometry after removing consecutive duplicate locations.
pub fn way_shape<F: Fn(NodeID) -> Option<LonLat>>(nodes: &[NodeID], location: F) -> WayShape {
    if nodes.len() < 2 {
        return WayShape::Malformed;
    }
    let mut deduped: Vec<HashableLonLat> = nodes
        .iter()
        .filter_map(|n| location(*n))
        .map(|pt| pt.to_hashable())
        .collect();
    deduped.dedup();
    let distinct: BTreeSet<HashableLonLat> = deduped.into_iter().collect();
    match distinct.len() {
        0 => WayShape::Malformed,
        1 => WayShape::Collapsed,
        _ => WayShape::Normal,
    }
}

/// The single zero-length section kept for a collapsed way. Every resolved reference stays, in
/// order.
pub fn collapsed_section<F: Fn(NodeID) -> bool>(
    id: WayID,
    way: &RawWay,
    is_resolved: F,
) -> Result<EdgeSection> {
    let mut nodes: Vec<NodeID> = way.nodes.iter().cloned().filter(|n| is_resolved(*n)).collect();
    match nodes.len() {
        0 => bail!("{} has no locatable nodes", id),
        1 => nodes.push(nodes[0]),
        _ => {}
    }
    Ok(EdgeSection {
        way: id,
        index: 1,
        nodes,
        tags: way.tags.clone(),
        cut_start: false,
        cut_end: false,
    })
}
