//! Points relation members at the Atlas entities their OSM members turned into. A way member
//! that got sectioned expands into all of its sections, in the way's order and with the same
//! role.

use std::collections::{BTreeMap, BTreeSet};

use abstutil::Timer;
use atlas::{ItemType, Relation, RelationMember};
use raw_atlas::{OsmID, RawRelation, RelationID, WayID};

/// What each OSM primitive became.
#[derive(Default)]
pub struct MemberIndex {
    /// Main edge ids, in the order of the way
    pub sections_per_way: BTreeMap<WayID, Vec<i64>>,
    pub lines: BTreeSet<i64>,
    pub areas: BTreeSet<i64>,
    pub nodes: BTreeSet<i64>,
    pub points: BTreeSet<i64>,
}

impl MemberIndex {
    /// Nothing means the member should be dropped.
    fn lookup(&self, role: &str, member: OsmID) -> Vec<RelationMember> {
        match member {
            OsmID::Node(n) => {
                // A node can be both; keep both so neither kind loses the membership
                let mut result = Vec::new();
                if self.nodes.contains(&n.0) {
                    result.push(RelationMember::new(n.0, ItemType::Node, role));
                }
                if self.points.contains(&n.0) {
                    result.push(RelationMember::new(n.0, ItemType::Point, role));
                }
                result
            }
            OsmID::Way(w) => {
                if let Some(sections) = self.sections_per_way.get(&w) {
                    sections
                        .iter()
                        .map(|id| RelationMember::new(*id, ItemType::Edge, role))
                        .collect()
                } else if self.lines.contains(&w.0) {
                    vec![RelationMember::new(w.0, ItemType::Line, role)]
                } else if self.areas.contains(&w.0) {
                    vec![RelationMember::new(w.0, ItemType::Area, role)]
                } else {
                    Vec::new()
                }
            }
            OsmID::Relation(r) => vec![RelationMember::new(r.0, ItemType::Relation, role)],
        }
    }
}

pub fn retarget(
    relations: &BTreeMap<RelationID, RawRelation>,
    index: &MemberIndex,
    timer: &mut Timer,
) -> BTreeMap<i64, Relation> {
    let mut result = BTreeMap::new();
    for (id, rel) in relations {
        let mut members = Vec::new();
        for (role, member) in &rel.members {
            let retargeted = index.lookup(role, *member);
            if retargeted.is_empty() {
                timer.warn(format!(
                    "Dropping member {} ({}) of {}; it isn't in the output",
                    member, role, id
                ));
            }
            members.extend(retargeted);
        }
        result.insert(
            id.0,
            Relation {
                id: id.0,
                osm_id: id.0,
                members,
                tags: rel.tags.clone(),
            },
        );
    }

    // Dropping an empty relation may empty out a relation containing it, so repeat until nothing
    // changes.
    loop {
        let empty: Vec<i64> = result
            .values()
            .filter(|r| r.members.is_empty())
            .map(|r| r.id)
            .collect();
        for id in &empty {
            timer.warn(format!("Dropping relation {}; none of its members survived", id));
            result.remove(id);
        }

        let mut changed = !empty.is_empty();
        let existing: BTreeSet<i64> = result.keys().cloned().collect();
        for rel in result.values_mut() {
            let before = rel.members.len();
            rel.members
                .retain(|m| m.item_type != ItemType::Relation || existing.contains(&m.id));
            if rel.members.len() != before {
                timer.warn(format!(
                    "Dropping {} relation members of {} that aren't in the output",
                    before - rel.members.len(),
                    rel.id
                ));
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    result
}
