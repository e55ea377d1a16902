use anyhow::Result;
use serde::{Deserialize, Serialize};

use abstutil::Tags;
use raw_atlas::osm;

/// Everything that controls one run of way sectioning. Missing fields in a JSON file take the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectioningConfig {
    /// Which ways are routable. There's no sensible fallback if this is explicitly `null`, so the
    /// run fails.
    pub edge_filter: Option<TagFilter>,
    /// Which nodes split a way even when nothing else meets there.
    pub barrier_filter: TagFilter,
    /// Also turn every node along an edge into a point, even untagged shape points.
    pub keep_all_nodes_as_points: bool,
    /// Keep ways that collapse to a single location as one zero-length section, instead of
    /// dropping them.
    pub keep_degenerate_ways: bool,
    /// Nodes referenced by relations only become points inside these countries. Empty means
    /// everywhere.
    pub country_codes: Vec<String>,
    pub overflow_policy: OverflowPolicy,
}

/// What happens to the rest of a way once it's been cut into `MAXIMUM_SECTIONS` pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Node references after the last allowed section are dropped.
    Truncate,
    /// The last allowed section runs to the end of the way.
    MergeIntoLast,
}

impl Default for SectioningConfig {
    fn default() -> SectioningConfig {
        SectioningConfig {
            edge_filter: Some(TagFilter::default_edges()),
            barrier_filter: TagFilter::any_of(vec![TagMatch::key(osm::BARRIER)]),
            keep_all_nodes_as_points: false,
            keep_degenerate_ways: false,
            country_codes: Vec::new(),
            overflow_policy: OverflowPolicy::Truncate,
        }
    }
}

impl SectioningConfig {
    pub fn load(path: &str) -> Result<SectioningConfig> {
        abstutil::read_json(path)
    }

    /// Does a node's country tag fall inside the configured jurisdiction? Nodes without the tag
    /// haven't been sliced yet, so they match.
    pub fn in_jurisdiction(&self, tags: &Tags) -> bool {
        if self.country_codes.is_empty() {
            return true;
        }
        match tags.get(osm::ISO_COUNTRY_CODE) {
            // Nodes on a border list every country, separated by commas
            Some(codes) => codes
                .split(',')
                .any(|code| self.country_codes.iter().any(|c| c == code.trim())),
            None => true,
        }
    }
}

/// Matches a tag set if any of the `any_of` rules match and none of the `none_of` rules do.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagFilter {
    pub any_of: Vec<TagMatch>,
    pub none_of: Vec<TagMatch>,
}

/// A key with one of some values. No values means the key can have any value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagMatch {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl TagMatch {
    pub fn key(key: &str) -> TagMatch {
        TagMatch {
            key: key.to_string(),
            values: Vec::new(),
        }
    }

    pub fn values(key: &str, values: &[&str]) -> TagMatch {
        TagMatch {
            key: key.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn matches(&self, tags: &Tags) -> bool {
        match tags.get(&self.key) {
            Some(v) => self.values.is_empty() || self.values.contains(v),
            None => false,
        }
    }
}

impl TagFilter {
    pub fn any_of(rules: Vec<TagMatch>) -> TagFilter {
        TagFilter {
            any_of: rules,
            none_of: Vec::new(),
        }
    }

    pub fn matches(&self, tags: &Tags) -> bool {
        self.any_of.iter().any(|m| m.matches(tags)) && !self.none_of.iter().any(|m| m.matches(tags))
    }

    /// Car-navigable highways plus ferries.
    pub fn default_edges() -> TagFilter {
        TagFilter {
            any_of: vec![
                TagMatch::values(
                    osm::HIGHWAY,
                    &[
                        "motorway",
                        "motorway_link",
                        "trunk",
                        "trunk_link",
                        "primary",
                        "primary_link",
                        "secondary",
                        "secondary_link",
                        "tertiary",
                        "tertiary_link",
                        "unclassified",
                        "residential",
                        "living_street",
                        "service",
                        "pedestrian",
                        "track",
                        "road",
                    ],
                ),
                TagMatch::values(osm::ROUTE, &["ferry"]),
            ],
            none_of: vec![TagMatch::values(osm::AREA, &["yes"])],
        }
    }
}
