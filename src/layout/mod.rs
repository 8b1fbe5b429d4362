pub mod routing;
pub mod zones;

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::LayoutConfig;
use crate::model::ValidatedDiagram;

/// World-space box assigned to one node. Positions are final after the
/// layout pass; nothing mutates them for the lifetime of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBox {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn left_anchor(&self) -> (f32, f32) {
        (self.x, self.y + self.height / 2.0)
    }

    pub fn right_anchor(&self) -> (f32, f32) {
        (self.x + self.width, self.y + self.height / 2.0)
    }

    pub fn top_anchor(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_anchor(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height)
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// Node ids in payload order; drives render order and entry stagger.
    pub order: Vec<String>,
    pub nodes: BTreeMap<String, NodeBox>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeBox> {
        self.nodes.get(id)
    }
}

/// Assigns every node a world-space box and sizes the canvas. Pure over its
/// inputs: the same diagram and config always produce the same layout.
///
/// Nodes without explicit coordinates go on a fixed grid keyed by payload
/// index; rows past the first get extra headroom because expanded node
/// panels grow downward. Mixing explicit and computed placement within one
/// diagram is the caller's responsibility to keep consistent.
pub fn compute_layout(diagram: &ValidatedDiagram<'_>, config: &LayoutConfig) -> Layout {
    let columns = config.columns.max(1);
    let mut order = Vec::new();
    let mut nodes = BTreeMap::new();

    for (index, node) in diagram.nodes.iter().enumerate() {
        let (x, y) = if node.has_explicit_position() {
            // validate() already vouched for finiteness here
            (node.x.unwrap_or(0.0), node.y.unwrap_or(0.0))
        } else {
            let col = (index % columns) as f32;
            let row = (index / columns) as f32;
            let bottom_extra = if index >= columns {
                config.bottom_row_extra
            } else {
                0.0
            };
            (
                col * config.column_spacing + config.margin_left,
                row * config.row_spacing + config.margin_top + bottom_extra,
            )
        };

        if !x.is_finite() || !y.is_finite() {
            warn!(id = %node.id, "excluding node with non-finite layout position");
            continue;
        }

        order.push(node.id.clone());
        nodes.insert(
            node.id.clone(),
            NodeBox {
                id: node.id.clone(),
                x,
                y,
                width: config.node_width,
                height: config.node_height,
            },
        );
    }

    let max_x = nodes.values().map(|n| n.x).fold(0.0f32, f32::max);
    let max_y = nodes.values().map(|n| n.y).fold(0.0f32, f32::max);
    let width = (max_x + config.node_width + config.canvas_padding).max(config.min_canvas_width);
    let height = (max_y + config.node_height_expanded + config.canvas_padding)
        .max(config.min_canvas_height);

    Layout {
        order,
        nodes,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diagram, Node};
    use std::collections::BTreeMap;

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            label: id.to_string(),
            description: String::new(),
            x: None,
            y: None,
            technologies: BTreeMap::new(),
            metrics: BTreeMap::new(),
            features: Vec::new(),
        }
    }

    fn diagram_with(nodes: Vec<Node>) -> Diagram {
        Diagram {
            nodes,
            ..Diagram::default()
        }
    }

    #[test]
    fn grid_places_by_payload_index() {
        let diagram = diagram_with(vec![
            node("a"),
            node("b"),
            node("c"),
            node("d"),
            node("e"),
        ]);
        let validated = diagram.validate();
        let layout = compute_layout(&validated, &LayoutConfig::default());

        let a = layout.node("a").unwrap();
        assert_eq!((a.x, a.y), (100.0, 100.0));
        let b = layout.node("b").unwrap();
        assert_eq!((b.x, b.y), (500.0, 100.0));
        let c = layout.node("c").unwrap();
        assert_eq!((c.x, c.y), (900.0, 100.0));
        // Second row: bottom-row extra applies from index 3 onward.
        let d = layout.node("d").unwrap();
        assert_eq!((d.x, d.y), (100.0, 300.0 + 100.0 + 150.0));
        let e = layout.node("e").unwrap();
        assert_eq!((e.x, e.y), (500.0, 550.0));
    }

    #[test]
    fn explicit_coordinates_pass_through() {
        let mut pinned = node("pinned");
        pinned.x = Some(42.0);
        pinned.y = Some(17.0);
        let diagram = diagram_with(vec![pinned]);
        let validated = diagram.validate();
        let layout = compute_layout(&validated, &LayoutConfig::default());
        let placed = layout.node("pinned").unwrap();
        assert_eq!((placed.x, placed.y), (42.0, 17.0));
    }

    #[test]
    fn one_node_diagram_gets_minimum_canvas() {
        let diagram = diagram_with(vec![node("only")]);
        let validated = diagram.validate();
        let layout = compute_layout(&validated, &LayoutConfig::default());
        assert_eq!(layout.width, 1200.0);
        assert_eq!(layout.height, 800.0);
    }

    #[test]
    fn canvas_grows_past_minimum_with_spread() {
        let diagram = diagram_with((0..7).map(|i| node(&format!("n{i}"))).collect());
        let validated = diagram.validate();
        let config = LayoutConfig::default();
        let layout = compute_layout(&validated, &config);
        // Third column: x = 2 * 400 + 100 = 900.
        assert_eq!(layout.width, 900.0 + 250.0 + 100.0);
        // Third row: y = 2 * 300 + 100 + 150 = 850.
        assert_eq!(layout.height, 850.0 + 200.0 + 100.0);
    }

    #[test]
    fn corrupted_spacing_excludes_nodes_without_aborting() {
        let diagram = diagram_with(vec![node("a"), node("b")]);
        let validated = diagram.validate();
        let mut config = LayoutConfig::default();
        config.column_spacing = f32::NAN;
        let layout = compute_layout(&validated, &config);
        // 0 * NaN is still NaN, so every grid position is poisoned.
        assert!(layout.nodes.is_empty());
        assert_eq!(layout.width, config.min_canvas_width);
        assert_eq!(layout.height, config.min_canvas_height);
    }

    #[test]
    fn layout_is_deterministic() {
        let diagram = diagram_with(vec![node("a"), node("b"), node("c"), node("d")]);
        let validated = diagram.validate();
        let config = LayoutConfig::default();
        let first = compute_layout(&validated, &config);
        let second = compute_layout(&validated, &config);
        assert_eq!(first.order, second.order);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.width, second.width);
        assert_eq!(first.height, second.height);
    }
}
