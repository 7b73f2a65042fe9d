//! Coordinate assignment.
//!
//! Works in top-to-bottom space and transforms afterwards for the other
//! rank directions. Within a rank, vertices advance by their widths plus
//! `nodesep`, each rank centered against the widest one; ranks advance by
//! their tallest vertex plus `ranksep`. All coordinates are vertex centers.

use crate::graph::LayoutGraph;
use crate::rank::layer_matrix;
use crate::{LayoutOptions, RankDir};

pub fn position(g: &mut LayoutGraph, options: &LayoutOptions) {
    let layers = layer_matrix(g);
    if layers.is_empty() {
        return;
    }

    let mut rank_widths: Vec<f64> = Vec::with_capacity(layers.len());
    let mut rank_heights: Vec<f64> = Vec::with_capacity(layers.len());
    for layer in &layers {
        let mut width = 0.0;
        let mut height: f64 = 0.0;
        for (i, &ix) in layer.iter().enumerate() {
            let label = g.label_by_ix(ix);
            width += label.width;
            if i + 1 < layer.len() {
                width += options.nodesep;
            }
            height = height.max(label.height);
        }
        rank_widths.push(width);
        rank_heights.push(height);
    }
    let max_rank_width = rank_widths.iter().copied().fold(0.0_f64, f64::max);

    let mut y_cursor = 0.0;
    for (rank_ix, layer) in layers.iter().enumerate() {
        let y = y_cursor + rank_heights[rank_ix] / 2.0;
        let mut x_cursor = (max_rank_width - rank_widths[rank_ix]) / 2.0;

        for &ix in layer {
            let label = g.label_by_ix_mut(ix);
            label.x = Some(x_cursor + label.width / 2.0);
            label.y = Some(y);
            x_cursor += label.width + options.nodesep;
        }

        y_cursor += rank_heights[rank_ix];
        if rank_ix + 1 < layers.len() {
            y_cursor += options.ranksep;
        }
    }

    apply_rankdir(g, options.rankdir, y_cursor);
}

fn apply_rankdir(g: &mut LayoutGraph, rankdir: RankDir, total_height: f64) {
    match rankdir {
        RankDir::TB => {}
        RankDir::BT => {
            for ix in 0..g.node_count() {
                let label = g.label_by_ix_mut(ix);
                if let Some(y) = label.y {
                    label.y = Some(total_height - y);
                }
            }
        }
        RankDir::LR => {
            for ix in 0..g.node_count() {
                let label = g.label_by_ix_mut(ix);
                if let (Some(x), Some(y)) = (label.x, label.y) {
                    label.x = Some(y);
                    label.y = Some(x);
                }
            }
        }
        RankDir::RL => {
            for ix in 0..g.node_count() {
                let label = g.label_by_ix_mut(ix);
                if let (Some(x), Some(y)) = (label.x, label.y) {
                    label.x = Some(total_height - y);
                    label.y = Some(x);
                }
            }
        }
    }
}
