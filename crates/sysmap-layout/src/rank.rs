//! Rank (layer) assignment.
//!
//! Longest-path layering over a Kahn topological order: every vertex lands
//! on the earliest rank below all of its predecessors, edges always point
//! from a lower rank to a higher one, and rank spans stay minimal for the
//! longest chain through each vertex.
//!
//! Cycles are not rejected. When the topological order cannot cover the
//! graph, the remaining vertices are appended in insertion order and the
//! relaxation simply stops raising ranks along back edges, which keeps the
//! pass terminating and deterministic on any input.

use crate::graph::LayoutGraph;

pub fn rank(g: &mut LayoutGraph) {
    let n = g.node_count();
    if n == 0 {
        return;
    }

    let topo = topological_order(g);
    let out = g.out_adjacency();

    let mut ranks = vec![0i32; n];
    for &v in &topo {
        let r = ranks[v];
        for &w in &out[v] {
            if ranks[w] < r + 1 {
                ranks[w] = r + 1;
            }
        }
    }

    for (ix, r) in ranks.into_iter().enumerate() {
        g.label_by_ix_mut(ix).rank = Some(r);
    }
}

/// Deterministic Kahn order: sources are seeded in insertion order and
/// successors enqueue in edge insertion order. On a cycle the order is
/// incomplete; the leftover vertices are appended in insertion order.
fn topological_order(g: &LayoutGraph) -> Vec<usize> {
    let n = g.node_count();
    let out = g.out_adjacency();

    let mut indegree = vec![0usize; n];
    for &(v, w) in g.edge_ixs() {
        if v != w {
            indegree[w] += 1;
        }
    }

    let mut queue: std::collections::VecDeque<usize> =
        (0..n).filter(|&ix| indegree[ix] == 0).collect();
    let mut topo: Vec<usize> = Vec::with_capacity(n);

    while let Some(v) = queue.pop_front() {
        topo.push(v);
        for &w in &out[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    if topo.len() < n {
        let mut placed = vec![false; n];
        for &v in &topo {
            placed[v] = true;
        }
        topo.extend((0..n).filter(|&ix| !placed[ix]));
    }

    topo
}

/// Groups vertex indexes into layers by rank, ordered by `order` when the
/// ordering pass has run and by insertion order otherwise.
pub(crate) fn layer_matrix(g: &LayoutGraph) -> Vec<Vec<usize>> {
    let n = g.node_count();
    let max_rank = (0..n)
        .filter_map(|ix| g.label_by_ix(ix).rank)
        .max()
        .unwrap_or(0);

    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); (max_rank + 1) as usize];
    for ix in 0..n {
        let r = g.label_by_ix(ix).rank.unwrap_or(0);
        layers[r as usize].push(ix);
    }
    for layer in &mut layers {
        layer.sort_by_key(|&ix| g.label_by_ix(ix).order.unwrap_or(usize::MAX));
    }
    layers
}
