//! Viewport fitting: center the positioned diagram inside a surface.

use sysmap_core::FlowNode;
use sysmap_core::geom::Size;

/// Pan/zoom state for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Fits the bounding box of the top-level nodes into `surface`.
///
/// Child nodes are positioned in their parent's coordinate frame and stay
/// inside its bounds, so the top-level boxes are the whole extent of the
/// diagram. Zoom is clamped to the configured bounds; an empty diagram gets
/// the identity viewport.
pub(crate) fn fit(nodes: &[FlowNode], surface: Size, min_zoom: f64, max_zoom: f64) -> Viewport {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;

    for node in nodes.iter().filter(|n| n.parent.is_none()) {
        let Some(size) = node.size else {
            continue;
        };
        let (min_x, min_y) = (node.position.x, node.position.y);
        let (max_x, max_y) = (min_x + size.width, min_y + size.height);
        bounds = Some(match bounds {
            None => (min_x, min_y, max_x, max_y),
            Some((bx0, by0, bx1, by1)) => {
                (bx0.min(min_x), by0.min(min_y), bx1.max(max_x), by1.max(max_y))
            }
        });
    }

    let Some((min_x, min_y, max_x, max_y)) = bounds else {
        return Viewport::default();
    };

    let width = (max_x - min_x).max(f64::EPSILON);
    let height = (max_y - min_y).max(f64::EPSILON);

    let zoom = (surface.width / width)
        .min(surface.height / height)
        .clamp(min_zoom, max_zoom);

    Viewport {
        x: (surface.width - width * zoom) / 2.0 - min_x * zoom,
        y: (surface.height - height * zoom) / 2.0 - min_y * zoom,
        zoom,
    }
}
