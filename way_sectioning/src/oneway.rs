//! Which way traffic may travel along a way. This follows OSM convention: roundabouts,
//! motorways and motorway links are one-way even without an explicit tag.

use serde::{Deserialize, Serialize};

use abstutil::Tags;
use raw_atlas::osm;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directionality {
    /// Only in the order of the way's nodes
    Forward,
    /// Only against the order of the way's nodes
    Reverse,
    Bidirectional,
}

const FORWARD_VALUES: [&str; 3] = ["yes", "true", "1"];
const REVERSED_VALUES: [&str; 2] = ["-1", "reverse"];
const TWO_WAY_VALUES: [&str; 3] = ["no", "false", "0"];

impl Directionality {
    /// Never fails; anything unrecognized is two-way.
    pub fn resolve(tags: &Tags) -> Directionality {
        let roundabout = tags.is(osm::JUNCTION, "roundabout");
        if tags.is_any(osm::ONEWAY, &TWO_WAY_VALUES) {
            // Roundabouts stay one-way regardless. On a motorway, the explicit tag wins.
            if roundabout {
                return Directionality::Forward;
            }
            return Directionality::Bidirectional;
        }
        if tags.is_any(osm::ONEWAY, &FORWARD_VALUES) {
            return Directionality::Forward;
        }
        if tags.is_any(osm::ONEWAY, &REVERSED_VALUES) {
            return Directionality::Reverse;
        }
        if roundabout || tags.is_any(osm::HIGHWAY, &["motorway", "motorway_link"]) {
            return Directionality::Forward;
        }
        Directionality::Bidirectional
    }
}
