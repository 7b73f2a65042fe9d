//! Crossing reduction: ordering vertices within their ranks.
//!
//! Alternating barycenter sweeps (downward against predecessors, upward
//! against successors) with a fixed sweep budget; after each sweep the
//! ordering is scored by its crossing count and the best one seen wins.
//! Ties everywhere resolve to the current position, so the pass is
//! deterministic and a second run over the same graph reproduces itself.

use crate::graph::LayoutGraph;

const SWEEPS: usize = 4;

pub fn order(g: &mut LayoutGraph) {
    let n = g.node_count();
    if n == 0 {
        return;
    }

    let in_adj = g.in_adjacency();
    let out_adj = g.out_adjacency();

    let mut layers = initial_layers(g);
    let mut best = layers.clone();
    let mut best_crossings = count_crossings(g, &layers);

    for sweep in 0..SWEEPS {
        if best_crossings == 0 {
            break;
        }

        if sweep % 2 == 0 {
            for i in 1..layers.len() {
                sort_by_barycenter(&mut layers, i, &in_adj, n);
            }
        } else {
            for i in (0..layers.len().saturating_sub(1)).rev() {
                sort_by_barycenter(&mut layers, i, &out_adj, n);
            }
        }

        let crossings = count_crossings(g, &layers);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
        }
    }

    for layer in &best {
        for (position, &ix) in layer.iter().enumerate() {
            g.label_by_ix_mut(ix).order = Some(position);
        }
    }
}

/// Reorders `layers[target]` by the mean position of each vertex's
/// neighbors. Vertices without neighbors keep their current position as
/// their score, so they stay put relative to the sorted ones.
fn sort_by_barycenter(layers: &mut [Vec<usize>], target: usize, adj: &[Vec<usize>], n: usize) {
    let positions = positions_of(layers, n);

    let layer = &mut layers[target];
    let mut scored: Vec<(f64, usize, usize)> = layer
        .iter()
        .enumerate()
        .map(|(current, &ix)| {
            let neighbors = &adj[ix];
            let score = if neighbors.is_empty() {
                current as f64
            } else {
                let sum: usize = neighbors.iter().map(|&u| positions[u]).sum();
                sum as f64 / neighbors.len() as f64
            };
            (score, current, ix)
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    *layer = scored.into_iter().map(|(_, _, ix)| ix).collect();
}

/// Layers by rank in vertex insertion order. Any `order` left over from a
/// previous pass is ignored, so the whole pass is a pure function of the
/// graph's structure.
fn initial_layers(g: &LayoutGraph) -> Vec<Vec<usize>> {
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
    layers
}

fn positions_of(layers: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut positions = vec![0usize; n];
    for layer in layers {
        for (position, &ix) in layer.iter().enumerate() {
            positions[ix] = position;
        }
    }
    positions
}

/// Counts crossings between every pair of edges joining the same pair of
/// ranks. Quadratic in the edge count, which the small visible scope of a
/// focused diagram keeps cheap.
fn count_crossings(g: &LayoutGraph, layers: &[Vec<usize>]) -> usize {
    let n = g.node_count();
    let positions = positions_of(layers, n);
    let rank_of = |ix: usize| g.label_by_ix(ix).rank.unwrap_or(0);

    let edges: Vec<(usize, usize)> = g
        .edge_ixs()
        .iter()
        .copied()
        .filter(|&(v, w)| v != w)
        .collect();

    let mut crossings = 0usize;
    for (i, &(a, b)) in edges.iter().enumerate() {
        for &(c, d) in &edges[i + 1..] {
            if rank_of(a) != rank_of(c) || rank_of(b) != rank_of(d) {
                continue;
            }
            let top = positions[a] as i64 - positions[c] as i64;
            let bottom = positions[b] as i64 - positions[d] as i64;
            if top * bottom < 0 {
                crossings += 1;
            }
        }
    }
    crossings
}
