use std::collections::BTreeMap;

use geom::SlippyTile;

use crate::RawAtlas;

/// Supplies the raw data of shards adjacent to the one being processed, so ways crossing the
/// shard border can be sectioned consistently. Returning `None` means the neighbor isn't
/// available; that's never an error.
pub trait NeighborFetcher: Sync {
    fn fetch_neighbor(&self, shard: &SlippyTile) -> Option<RawAtlas>;
}

impl<F: Fn(&SlippyTile) -> Option<RawAtlas> + Sync> NeighborFetcher for F {
    fn fetch_neighbor(&self, shard: &SlippyTile) -> Option<RawAtlas> {
        self(shard)
    }
}

impl NeighborFetcher for BTreeMap<SlippyTile, RawAtlas> {
    fn fetch_neighbor(&self, shard: &SlippyTile) -> Option<RawAtlas> {
        self.get(shard).cloned()
    }
}
