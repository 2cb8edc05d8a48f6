use crate::config::ClusterConfig;
use crate::matching::{decide, NormalizedRecord};
use std::collections::HashMap;
use tracing::debug;

/// Rows between progress messages in the pair loop.
const PROGRESS_EVERY: usize = 50;

/// Array-backed disjoint-set forest over `0..n`.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Partition of record indices produced by one clustering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    /// Each cluster lists its members in ascending index order; clusters are
    /// ordered by their smallest member.
    pub clusters: Vec<Vec<usize>>,
    /// Pairs actually scored (both titles non-empty).
    pub comparisons: usize,
}

/// Compare every pair `i < j` and merge matching records into clusters.
///
/// Matches close transitively: if A~B and B~C then A, B and C share a cluster
/// even when A and C would not match on their own. Records with an empty
/// title are never compared and end up as singletons.
pub fn cluster_records(normalized: &[NormalizedRecord], config: &ClusterConfig) -> Clustering {
    let n = normalized.len();
    let mut sets = DisjointSet::new(n);
    let mut comparisons = 0;

    for i in 0..n {
        if i % PROGRESS_EVERY == 0 {
            debug!(processed = i, total = n, "Comparing records");
        }
        if normalized[i].title.is_empty() {
            continue;
        }
        for j in (i + 1)..n {
            if normalized[j].title.is_empty() {
                continue;
            }
            comparisons += 1;
            if let Some(reason) = decide(&normalized[i], &normalized[j], config) {
                debug!(left = i, right = j, ?reason, "Records matched");
                sets.union(i, j);
            }
        }
    }

    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = sets.find(i);
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push(i);
    }

    Clustering {
        clusters,
        comparisons,
    }
}
