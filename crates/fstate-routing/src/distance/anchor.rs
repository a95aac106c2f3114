//! Multi-source Dijkstra from a fixed anchor set (spec.md §4.2.3).
//!
//! A single priority-queue search tagged with the originating anchor gives,
//! in one pass: each node's nearest anchor (and the path from it) and every
//! ordered anchor-to-anchor distance/first-hop. Paths are reconstructed on
//! demand from a predecessor map (spec.md §9 redesign note — storing full
//! path lists inline during the search is the thing the original Python
//! implementation does and the thing this spec asks to replace).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::snapshot::Snapshot;
use crate::types::NodeId;

/// `(distance, next_hop)` for a directed anchor pair, `next_hop` being the
/// first step out of `src` on the shortest path toward `dst`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPair {
    pub distance: f64,
    pub next_hop: NodeId,
}

/// Per-snapshot anchor routing data (spec.md §3 "Anchor data").
#[derive(Debug, Clone)]
pub struct AnchorData {
    nearest_anchor: HashMap<NodeId, (NodeId, f64)>,
    /// `(node, source_anchor) -> predecessor of node on source_anchor's shortest-path tree`.
    pred: HashMap<(NodeId, NodeId), NodeId>,
    anchor_to_anchor: HashMap<(NodeId, NodeId), AnchorPair>,
}

impl AnchorData {
    /// The anchor closest to `v` (distance 0 for an anchor itself), or `None`
    /// if `v` is unreachable from every anchor this snapshot.
    pub fn nearest_anchor(&self, v: NodeId) -> Option<(NodeId, f64)> {
        self.nearest_anchor.get(&v).copied()
    }

    pub fn anchor_to_anchor(&self, src: NodeId, dst: NodeId) -> Option<AnchorPair> {
        self.anchor_to_anchor.get(&(src, dst)).copied()
    }

    /// Reconstruct the path `anchor -> .. -> node` from the predecessor map.
    /// Returns `None` if `node` was never reached under `anchor`'s tag.
    pub fn path_from_anchor(&self, anchor: NodeId, node: NodeId) -> Option<Vec<NodeId>> {
        if anchor == node {
            return Some(vec![anchor]);
        }
        let mut rev = vec![node];
        let mut cur = node;
        loop {
            let prev = *self.pred.get(&(cur, anchor))?;
            rev.push(prev);
            if prev == anchor {
                break;
            }
            cur = prev;
        }
        rev.reverse();
        Some(rev)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapItem {
    dist: f64,
    anchor: NodeId,
    node: NodeId,
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops in ascending
        // (dist, anchor, node) order — the tie-break spec.md §5 mandates.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.anchor.cmp(&self.anchor))
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// `D(s, b, t)` from spec.md §4.3: ingress hop to the nearest anchor, one
/// anchor-to-anchor hop (skipped if `s` and `b` share a nearest anchor), and
/// the egress hop from the nearest anchor to `b`. `None` means unreachable.
pub fn composite_distance(data: &AnchorData, s: NodeId, b: NodeId) -> Option<f64> {
    if s == b {
        return Some(0.0);
    }
    let (ingress_anchor, ingress_dist) = data.nearest_anchor(s)?;
    let (egress_anchor, egress_dist) = data.nearest_anchor(b)?;
    if ingress_anchor == egress_anchor {
        Some(ingress_dist + egress_dist)
    } else {
        let pair = data.anchor_to_anchor(ingress_anchor, egress_anchor)?;
        Some(ingress_dist + pair.distance + egress_dist)
    }
}

/// Is `node` itself an anchor in `data`? Anchors are seeded with a
/// self-distance of exactly 0, which no other path can beat, so this is a
/// safe proxy that avoids carrying the anchor set alongside every `AnchorData`.
pub fn is_anchor(data: &AnchorData, node: NodeId) -> bool {
    matches!(data.nearest_anchor(node), Some((a, d)) if a == node && d == 0.0)
}

/// Current-timestep next hop for a sat→sat route under ANCHOR-LMSR
/// (spec.md §4.3 "sat → sat"). Returns `None` when the routing rules yield
/// no next hop (caller still validates adjacency before accepting it).
pub fn anchor_next_hop(data: &AnchorData, s: NodeId, d: NodeId) -> Option<NodeId> {
    let (egress_anchor, _) = data.nearest_anchor(d)?;
    let (ingress_anchor, _) = data.nearest_anchor(s)?;

    if is_anchor(data, s) && s == egress_anchor {
        let egress_path = data.path_from_anchor(egress_anchor, d)?;
        return Some(if egress_path.len() > 1 {
            egress_path[1]
        } else {
            d
        });
    }

    if is_anchor(data, s) {
        return data.anchor_to_anchor(s, egress_anchor).map(|p| p.next_hop);
    }

    let egress_path = data.path_from_anchor(egress_anchor, d)?;
    if let Some(idx) = egress_path.iter().position(|&n| n == s) {
        if idx + 1 < egress_path.len() {
            return Some(egress_path[idx + 1]);
        }
        return None;
    }

    let ingress_path = data.path_from_anchor(ingress_anchor, s)?;
    if ingress_path.len() >= 2 {
        Some(ingress_path[ingress_path.len() - 2])
    } else {
        None
    }
}

pub fn compute_anchor_data(snapshot: &Snapshot, anchors: &[NodeId]) -> AnchorData {
    let mut nearest_anchor: HashMap<NodeId, (NodeId, f64)> = HashMap::new();
    let mut pred: HashMap<(NodeId, NodeId), NodeId> = HashMap::new();
    let mut anchor_to_anchor: HashMap<(NodeId, NodeId), AnchorPair> = HashMap::new();
    let mut best_distance: HashMap<(NodeId, NodeId), f64> = HashMap::new();

    let anchor_set: std::collections::HashSet<NodeId> = anchors.iter().copied().collect();

    let mut heap = BinaryHeap::new();
    for &a in anchors {
        nearest_anchor.insert(a, (a, 0.0));
        best_distance.insert((a, a), 0.0);
        heap.push(HeapItem {
            dist: 0.0,
            anchor: a,
            node: a,
        });
    }

    while let Some(item) = heap.pop() {
        let HeapItem { dist, anchor, node } = item;
        let key = (node, anchor);
        if let Some(&best) = best_distance.get(&key) {
            if dist > best {
                continue;
            }
        }

        if !anchor_set.contains(&node) {
            nearest_anchor.entry(node).or_insert((anchor, dist));
        }

        if anchor_set.contains(&node) && node != anchor {
            let pair_key = (anchor, node);
            if !anchor_to_anchor.contains_key(&pair_key) {
                let first_hop = *pred
                    .get(&(node, anchor))
                    .expect("anchor reached via a non-trivial path must have a predecessor");
                let mut first_step = node;
                let mut cur = node;
                while cur != anchor {
                    first_step = cur;
                    cur = *pred.get(&(cur, anchor)).expect("broken predecessor chain");
                }
                anchor_to_anchor.insert(
                    pair_key,
                    AnchorPair {
                        distance: dist,
                        next_hop: first_step,
                    },
                );
                anchor_to_anchor.insert(
                    (node, anchor),
                    AnchorPair {
                        distance: dist,
                        next_hop: first_hop,
                    },
                );
            }
        }

        for neighbor in snapshot.neighbors(node) {
            let w = snapshot
                .edge_weight(node, neighbor)
                .expect("neighbor iterator implies an edge weight exists");
            let new_dist = dist + w;
            let nkey = (neighbor, anchor);
            let better = match best_distance.get(&nkey) {
                Some(&d) => new_dist < d,
                None => true,
            };
            if better {
                best_distance.insert(nkey, new_dist);
                pred.insert(nkey, node);
                heap.push(HeapItem {
                    dist: new_dist,
                    anchor,
                    node: neighbor,
                });
            }
        }
    }

    AnchorData {
        nearest_anchor,
        pred,
        anchor_to_anchor,
    }
}
