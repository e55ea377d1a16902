use anyhow::Result;

use abstutil::Timer;
use geom::LonLat;
use raw_atlas::{NeighborFetcher, NodeID, RawAtlas, RawNode, WayID};

/// Finds nodes in this shard first, then in whatever neighbors were fetched.
pub struct NodeLookup<'a> {
    local: &'a RawAtlas,
    neighbors: &'a [RawAtlas],
}

impl<'a> NodeLookup<'a> {
    pub fn new(local: &'a RawAtlas, neighbors: &'a [RawAtlas]) -> NodeLookup<'a> {
        NodeLookup { local, neighbors }
    }

    pub fn node(&self, id: NodeID) -> Option<&'a RawNode> {
        if let Some(node) = self.local.nodes.get(&id) {
            return Some(node);
        }
        self.neighbors.iter().find_map(|n| n.nodes.get(&id))
    }

    pub fn location(&self, id: NodeID) -> Option<LonLat> {
        self.node(id).map(|n| n.pt)
    }

    pub fn is_resolved(&self, id: NodeID) -> bool {
        self.node(id).is_some()
    }

    pub fn neighbors(&self) -> &'a [RawAtlas] {
        self.neighbors
    }
}

/// Fetches every neighbor of the shard once, but only if some edge way leaves it. Without a
/// fetcher or a shard to ask about, those ways can't be handled, so the run fails.
pub fn fetch_neighbors(
    raw: &RawAtlas,
    shard_spanning: &[WayID],
    fetcher: Option<&dyn NeighborFetcher>,
    timer: &mut Timer,
) -> Result<Vec<RawAtlas>> {
    if shard_spanning.is_empty() {
        return Ok(Vec::new());
    }
    let fetcher = match fetcher {
        Some(f) => f,
        None => bail!(
            "{} edge ways leave the shard (like {}), but there's no way to fetch neighboring \
             shards",
            shard_spanning.len(),
            shard_spanning[0]
        ),
    };
    let shard = match raw.shard {
        Some(s) => s,
        None => bail!(
            "{} edge ways leave the shard (like {}), but the input doesn't say what shard it is",
            shard_spanning.len(),
            shard_spanning[0]
        ),
    };

    timer.start(format!("fetch neighbors of {}", shard));
    let mut result = Vec::new();
    for neighbor in shard.neighbors() {
        match fetcher.fetch_neighbor(&neighbor) {
            Some(data) => result.push(data),
            None => timer.warn(format!(
                "Neighbor shard {} isn't available; ways crossing into it will be cut",
                neighbor
            )),
        }
    }
    timer.stop(format!("fetch neighbors of {}", shard));
    Ok(result)
}
