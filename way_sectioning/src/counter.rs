use abstutil::Counter;
use raw_atlas::NodeID;

/// How many times each node is referenced across all edge ways, counting repeats within one way.
/// Built in one pass and read-only afterwards, so sectioning can read it from many threads.
pub struct NodeOccurrences {
    counts: Counter<NodeID>,
}

impl NodeOccurrences {
    pub fn count<'a, I: IntoIterator<Item = &'a [NodeID]>>(edge_ways: I) -> NodeOccurrences {
        let mut counts = Counter::new();
        for nodes in edge_ways {
            counts.extend(nodes.iter().cloned());
        }
        NodeOccurrences { counts }
    }

    pub fn get(&self, id: NodeID) -> usize {
        self.counts.get(&id)
    }

    /// Shared by more than one way, or visited more than once by the same way.
    pub fn is_section_boundary(&self, id: NodeID) -> bool {
        self.get(id) > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<NodeID> {
        raw.iter().map(|n| NodeID(*n)).collect()
    }

    #[test]
    fn counting() {
        let way1 = ids(&[1, 2, 3]);
        let way2 = ids(&[3, 4, 5, 4]);
        let occurrences = NodeOccurrences::count(vec![way1.as_slice(), way2.as_slice()]);

        assert_eq!(occurrences.get(NodeID(1)), 1);
        assert_eq!(occurrences.get(NodeID(3)), 2);
        assert_eq!(occurrences.get(NodeID(4)), 2);
        assert_eq!(occurrences.get(NodeID(99)), 0);
        assert!(occurrences.is_section_boundary(NodeID(3)));
        assert!(occurrences.is_section_boundary(NodeID(4)));
        assert!(!occurrences.is_section_boundary(NodeID(5)));
    }
}
