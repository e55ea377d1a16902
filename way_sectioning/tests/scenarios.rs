use std::collections::BTreeMap;

use abstutil::{Tags, Timer};
use atlas::{ItemType, RelationMember};
use geom::{LonLat, SlippyTile};
use raw_atlas::{osm, NodeID, OsmID, RawAtlas, WayID};
use way_sectioning::{section_raw_atlas, SectionedAtlas, SectioningConfig, MAXIMUM_SECTIONS};

fn tags(kv: &[(&str, &str)]) -> Tags {
    kv.iter().cloned().collect()
}

/// Every node id has one fixed location, no matter which shard it's in.
fn location(id: i64) -> LonLat {
    LonLat::new(-122.3 + (id as f64) * 0.0001, 47.6 + ((id % 7) as f64) * 0.0001)
}

fn shard_a() -> SlippyTile {
    SlippyTile::new(12, 100, 100).unwrap()
}

fn shard_b() -> SlippyTile {
    SlippyTile::new(12, 101, 100).unwrap()
}

fn nodes(raw: &mut RawAtlas, ids: &[i64]) {
    for id in ids {
        raw.add_node(*id, location(*id), Tags::empty());
    }
}

fn way(raw: &mut RawAtlas, id: i64, refs: &[i64], kv: &[(&str, &str)]) {
    raw.add_way(id, refs.iter().map(|n| NodeID(*n)).collect(), tags(kv));
}

fn run(raw: &RawAtlas) -> SectionedAtlas {
    section_raw_atlas(raw, &SectioningConfig::default(), None, &mut Timer::throwaway()).unwrap()
}

fn edge_ids(sectioned: &SectionedAtlas) -> Vec<i64> {
    sectioned.edges.keys().cloned().collect()
}

fn edge_members(way: i64, sections: usize, role: &str) -> Vec<RelationMember> {
    (1..=sections)
        .map(|idx| RelationMember::new(way * 1000 + idx as i64, ItemType::Edge, role))
        .collect()
}

#[test]
fn closed_highway_is_one_section() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3]);
    way(&mut raw, 10, &[1, 2, 3, 1], &[("highway", "residential"), ("oneway", "yes")]);
    let sectioned = run(&raw);
    assert_eq!(edge_ids(&sectioned), vec![10001]);
    assert!(sectioned.areas.is_empty());
    assert_eq!(sectioned.edges[&10001].polyline.points().len(), 4);
    assert_eq!(sectioned.nodes.keys().cloned().collect::<Vec<_>>(), vec![1]);

    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3]);
    way(&mut raw, 10, &[1, 2, 3, 1], &[("highway", "residential")]);
    let sectioned = run(&raw);
    assert_eq!(edge_ids(&sectioned), vec![-10001, 10001]);

    let atlas = sectioned.into_atlas().unwrap();
    assert_eq!(atlas.outgoing_edges(1).len(), 2);
    assert_eq!(atlas.incoming_edges(1).len(), 2);
}

#[test]
fn shared_node_splits_way() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3, 4]);
    way(&mut raw, 10, &[1, 2, 3], &[("highway", "residential"), ("oneway", "yes")]);
    way(&mut raw, 20, &[2, 4], &[("highway", "service"), ("oneway", "yes")]);
    let sectioned = run(&raw);

    assert_eq!(sectioned.sections_per_way[&WayID(10)], vec![10001, 10002]);
    assert_eq!(sectioned.sections_per_way[&WayID(20)], vec![20001]);
    let first = &sectioned.edges[&10001];
    let second = &sectioned.edges[&10002];
    assert_eq!((first.start, first.end), (1, 2));
    assert_eq!((second.start, second.end), (2, 3));
    assert_eq!(first.polyline.last_pt(), second.polyline.first_pt());
    assert_eq!(
        sectioned.nodes.keys().cloned().collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let atlas = sectioned.into_atlas().unwrap();
    assert_eq!(atlas.connected_edges(2).len(), 3);
}

#[test]
fn stacked_nodes_keep_their_edges() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 6]);
    // Two different OSM nodes at exactly the same place
    raw.add_node(5, location(1), Tags::empty());
    way(&mut raw, 10, &[1, 2], &[("highway", "residential"), ("oneway", "yes")]);
    way(&mut raw, 20, &[5, 6], &[("highway", "residential"), ("oneway", "yes")]);

    let atlas = run(&raw).into_atlas().unwrap();
    assert_eq!(atlas.edges[&10001].start, 1);
    assert_eq!(atlas.edges[&20001].start, 5);
    assert_eq!(atlas.connected_edges(1).len(), 1);
    assert_eq!(atlas.connected_edges(5).len(), 1);
}

#[test]
fn revisited_node_splits_way() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3, 4]);
    way(&mut raw, 10, &[1, 2, 3, 2, 4], &[("highway", "primary"), ("oneway", "yes")]);
    let sectioned = run(&raw);

    assert_eq!(sectioned.sections_per_way[&WayID(10)], vec![10001, 10002, 10003]);
    let lollipop = &sectioned.edges[&10002];
    assert_eq!((lollipop.start, lollipop.end), (2, 2));
    assert_eq!(
        lollipop.polyline.points(),
        &vec![location(2), location(3), location(2)]
    );
}

#[test]
fn relation_members_follow_sections() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3, 4, 5, 6]);
    way(&mut raw, 10, &[1, 2, 3, 4], &[("highway", "secondary")]);
    way(&mut raw, 20, &[2, 5], &[("highway", "residential")]);
    way(&mut raw, 30, &[3, 6], &[("highway", "residential")]);
    raw.add_relation(
        100,
        vec![
            ("to".to_string(), OsmID::Way(WayID(20))),
            ("from".to_string(), OsmID::Way(WayID(10))),
        ],
        tags(&[("type", "route")]),
    );
    let sectioned = run(&raw);

    let relation = &sectioned.relations[&100];
    assert_eq!(relation.osm_id, 100);
    let mut expected = edge_members(20, 1, "to");
    expected.extend(edge_members(10, 3, "from"));
    assert_eq!(relation.members, expected);

    let atlas = sectioned.into_atlas().unwrap();
    assert!(atlas.relations[&100]
        .members
        .iter()
        .all(|m| atlas.has_member(m)));
}

#[test]
fn node_and_point_are_both_members() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[2, 3]);
    raw.add_node(1, location(1), tags(&[("highway", "stop")]));
    way(&mut raw, 10, &[1, 2, 3], &[("highway", "residential")]);
    raw.add_relation(
        100,
        vec![("via".to_string(), OsmID::Node(NodeID(1)))],
        tags(&[("type", "restriction")]),
    );
    let sectioned = run(&raw);

    assert!(sectioned.nodes.contains_key(&1));
    assert!(sectioned.points.contains_key(&1));
    assert_eq!(
        sectioned.relations[&100].members,
        vec![
            RelationMember::new(1, ItemType::Node, "via"),
            RelationMember::new(1, ItemType::Point, "via"),
        ]
    );
}

#[test]
fn ids_are_consecutive_and_sections_touch() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    let main: Vec<i64> = (1..=20).collect();
    nodes(&mut raw, &main);
    nodes(&mut raw, &[101, 103, 107, 111]);
    way(&mut raw, 42, &main, &[("highway", "tertiary")]);
    for (id, crossing) in [(50, 3), (51, 7), (52, 11)] {
        way(&mut raw, id, &[crossing, 100 + crossing], &[("highway", "residential")]);
    }
    let sectioned = run(&raw);

    let ids = &sectioned.sections_per_way[&WayID(42)];
    assert_eq!(ids, &vec![42001, 42002, 42003, 42004]);
    for pair in ids.windows(2) {
        let a = &sectioned.edges[&pair[0]];
        let b = &sectioned.edges[&pair[1]];
        assert_eq!(a.end, b.start);
        assert_eq!(a.polyline.last_pt(), b.polyline.first_pt());
    }
    let total_points: usize = ids
        .iter()
        .map(|id| sectioned.edges[id].polyline.points().len())
        .sum();
    // Each boundary vertex is repeated exactly once
    assert_eq!(total_points, main.len() + ids.len() - 1);
    for id in ids {
        assert!(sectioned.edges.contains_key(&-id));
    }
}

#[test]
fn section_cap() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    let refs: Vec<i64> = (1..=1200).collect();
    for id in &refs {
        raw.add_node(*id, location(*id), tags(&[("barrier", "gate")]));
    }
    way(&mut raw, 7, &refs, &[("highway", "track"), ("oneway", "yes")]);
    let sectioned = run(&raw);

    let ids = &sectioned.sections_per_way[&WayID(7)];
    assert_eq!(ids.len(), MAXIMUM_SECTIONS);
    assert_eq!(*ids.last().unwrap(), 7999);
    let flagged: Vec<i64> = sectioned
        .edges
        .values()
        .filter(|e| e.tags.contains_key(osm::SYNTHETIC_INVALID_WAY_SECTION))
        .map(|e| e.id)
        .collect();
    assert_eq!(flagged, vec![7999]);
    assert_eq!(sectioned.edges[&7999].end, 1000);
}

#[test]
fn directionality() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    way(&mut raw, 1, &[1, 2, 3], &[("highway", "residential"), ("name", "Two way")]);
    way(&mut raw, 2, &[4, 5, 6], &[("highway", "residential"), ("oneway", "-1")]);
    way(&mut raw, 3, &[7, 8, 9], &[("highway", "primary"), ("junction", "roundabout")]);
    let sectioned = run(&raw);

    let forward = &sectioned.edges[&1001];
    let backward = &sectioned.edges[&-1001];
    assert_eq!(backward.polyline, forward.polyline.reversed());
    assert_eq!(backward.tags, forward.tags);
    assert_eq!((backward.start, backward.end), (forward.end, forward.start));

    let reversed = &sectioned.edges[&2001];
    assert_eq!((reversed.start, reversed.end), (6, 4));
    assert!(!sectioned.edges.contains_key(&-2001));

    assert!(sectioned.edges.contains_key(&3001));
    assert!(!sectioned.edges.contains_key(&-3001));
}

#[test]
fn missing_edge_filter() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2]);
    way(&mut raw, 10, &[1, 2], &[("highway", "residential")]);
    let mut config = SectioningConfig::default();
    config.edge_filter = None;
    assert!(section_raw_atlas(&raw, &config, None, &mut Timer::throwaway()).is_err());
}

#[test]
fn spanning_way_needs_a_fetcher() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2]);
    way(&mut raw, 10, &[1, 2, 3], &[("highway", "residential")]);
    let config = SectioningConfig::default();
    assert!(section_raw_atlas(&raw, &config, None, &mut Timer::throwaway()).is_err());

    // A fetcher doesn't help if there's no shard to ask about
    raw.shard = None;
    let neighbors: BTreeMap<SlippyTile, RawAtlas> = BTreeMap::new();
    assert!(
        section_raw_atlas(&raw, &config, Some(&neighbors), &mut Timer::throwaway()).is_err()
    );

    // Lines can leave the shard freely
    let mut raw = RawAtlas::blank(None);
    nodes(&mut raw, &[1, 2]);
    way(&mut raw, 10, &[1, 2, 3], &[("railway", "rail")]);
    let sectioned = run(&raw);
    assert_eq!(sectioned.lines[&10].polyline.points().len(), 2);
}

#[test]
fn missing_neighbor_cuts_way() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 4, 5]);
    way(&mut raw, 10, &[1, 2, 3, 4, 5], &[("highway", "residential")]);
    let neighbors: BTreeMap<SlippyTile, RawAtlas> = BTreeMap::new();
    let mut timer = Timer::throwaway();
    let sectioned = section_raw_atlas(
        &raw,
        &SectioningConfig::default(),
        Some(&neighbors),
        &mut timer,
    )
    .unwrap();
    assert_eq!(timer.warnings().len(), 8);

    assert_eq!(sectioned.sections_per_way[&WayID(10)], vec![10001, 10002]);
    assert_eq!(sectioned.edges[&10001].end, 2);
    assert_eq!(sectioned.edges[&10002].start, 4);
    for id in [10001, -10001, 10002, -10002] {
        assert!(sectioned.edges[&id].tags.is(osm::SYNTHETIC_SHARD_CUT, "yes"));
    }
    for id in [2, 4] {
        assert!(sectioned.nodes[&id]
            .tags
            .is(osm::SYNTHETIC_BOUNDARY_NODE, "yes"));
    }
    assert!(!sectioned.nodes[&1]
        .tags
        .contains_key(osm::SYNTHETIC_BOUNDARY_NODE));
}

#[test]
fn neighboring_shards_agree() {
    let road = [("highway", "residential"), ("oneway", "yes")];

    // Way 10 crosses from A into B, where way 20 meets it at node 3
    let mut a = RawAtlas::blank(Some(shard_a()));
    nodes(&mut a, &[1, 2]);
    way(&mut a, 10, &[1, 2, 3, 4], &road);
    let mut b = RawAtlas::blank(Some(shard_b()));
    nodes(&mut b, &[3, 4, 5]);
    way(&mut b, 10, &[1, 2, 3, 4], &road);
    way(&mut b, 20, &[3, 5], &road);

    let config = SectioningConfig::default();
    let mut from_a = BTreeMap::new();
    from_a.insert(shard_b(), b.clone());
    let mut from_b = BTreeMap::new();
    from_b.insert(shard_a(), a.clone());
    let sectioned_a =
        section_raw_atlas(&a, &config, Some(&from_a), &mut Timer::throwaway()).unwrap();
    let sectioned_b =
        section_raw_atlas(&b, &config, Some(&from_b), &mut Timer::throwaway()).unwrap();

    for sectioned in [&sectioned_a, &sectioned_b] {
        assert_eq!(sectioned.sections_per_way[&WayID(10)], vec![10001, 10002]);
        assert_eq!(
            sectioned.edges[&10001].polyline.points(),
            &vec![location(1), location(2), location(3)]
        );
        assert!(!sectioned.edges[&10001]
            .tags
            .contains_key(osm::SYNTHETIC_SHARD_CUT));
    }
    assert!(!sectioned_a.sections_per_way.contains_key(&WayID(20)));
    assert_eq!(sectioned_b.sections_per_way[&WayID(20)], vec![20001]);
}

#[test]
fn degenerate_ways() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    raw.add_node(1, location(1), Tags::empty());
    raw.add_node(2, location(1), Tags::empty());
    nodes(&mut raw, &[3]);
    way(&mut raw, 10, &[1, 2, 1], &[("highway", "residential")]);
    way(&mut raw, 11, &[3], &[("highway", "residential")]);

    let mut timer = Timer::throwaway();
    let mut config = SectioningConfig::default();
    let sectioned = section_raw_atlas(&raw, &config, None, &mut timer).unwrap();
    assert!(sectioned.edges.is_empty());
    assert_eq!(timer.warnings().len(), 2);

    config.keep_degenerate_ways = true;
    let sectioned = section_raw_atlas(&raw, &config, None, &mut Timer::throwaway()).unwrap();
    assert_eq!(edge_ids(&sectioned), vec![-10001, 10001]);
    assert!(sectioned.edges[&10001].polyline.is_zero_length());
    assert_eq!(sectioned.edges[&10001].polyline.points().len(), 3);
    assert!(!sectioned.sections_per_way.contains_key(&WayID(11)));

    // The middle reference is still part of the way
    config.keep_all_nodes_as_points = true;
    let sectioned = section_raw_atlas(&raw, &config, None, &mut Timer::throwaway()).unwrap();
    assert!(sectioned.points.contains_key(&2));
}

#[test]
fn areas_lines_and_points() {
    let mut raw = RawAtlas::blank(Some(shard_a()));
    nodes(&mut raw, &[1, 2, 3, 4, 5, 6, 7]);
    raw.add_node(8, location(8), tags(&[("amenity", "bench")]));
    raw.add_node(9, location(9), tags(&[("last_edit_user_name", "someone")]));
    way(&mut raw, 10, &[1, 2, 3, 4, 1], &[("building", "yes")]);
    way(&mut raw, 11, &[1, 2, 3, 1], &[("building", "yes")]);
    way(&mut raw, 12, &[5, 6, 7], &[("highway", "residential")]);
    raw.add_relation(
        100,
        vec![
            ("outer".to_string(), OsmID::Way(WayID(10))),
            ("".to_string(), OsmID::Way(WayID(99))),
        ],
        tags(&[("type", "multipolygon")]),
    );
    raw.add_relation(
        101,
        vec![("".to_string(), OsmID::Node(NodeID(9)))],
        tags(&[("type", "site")]),
    );

    let sectioned = run(&raw);
    assert_eq!(sectioned.areas.keys().cloned().collect::<Vec<_>>(), vec![10]);
    assert_eq!(sectioned.lines.keys().cloned().collect::<Vec<_>>(), vec![11]);
    // The bench has tags, and node 9 is in a relation. Node 6 is just a shape point.
    assert_eq!(
        sectioned.points.keys().cloned().collect::<Vec<_>>(),
        vec![8, 9]
    );
    assert_eq!(
        sectioned.relations[&100].members,
        vec![RelationMember::new(10, ItemType::Area, "outer")]
    );

    let mut config = SectioningConfig::default();
    config.keep_all_nodes_as_points = true;
    let sectioned = section_raw_atlas(&raw, &config, None, &mut Timer::throwaway()).unwrap();
    assert_eq!(
        sectioned.points.keys().cloned().collect::<Vec<_>>(),
        vec![5, 6, 7, 8, 9]
    );
}
