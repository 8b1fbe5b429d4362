use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::animate::{Easing, stagger};
use crate::config::Config;
use crate::layout::routing::{RoutedConnection, route_connection};
use crate::layout::zones::{ZoneBox, compute_zone_boxes};
use crate::layout::{Layout, compute_layout};
use crate::model::{ConnectionKind, Diagram};
use crate::node_view::NodeView;
use crate::viewport::Viewport;

/// One composed rendering of a diagram: layout, zones, routed connections
/// and per-node views, wrapped in the viewport transform. The diagram is
/// borrowed read-only; everything derived lives here and dies with the
/// scene.
#[derive(Debug)]
pub struct Scene<'a> {
    diagram: &'a Diagram,
    config: &'a Config,
    viewport: Viewport,
    expanded: Option<String>,
}

impl<'a> Scene<'a> {
    pub fn new(diagram: &'a Diagram, config: &'a Config) -> Self {
        Self {
            diagram,
            config,
            viewport: Viewport::new(config.viewport.clone()),
            expanded: None,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Pointer entered a node: expands it, collapsing any other.
    pub fn node_pointer_enter(&mut self, id: &str) {
        self.expanded = Some(id.to_string());
    }

    pub fn node_pointer_leave(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        }
    }

    /// Renders the full scene as a standalone SVG document. Deterministic:
    /// the same diagram and state always produce the same bytes.
    pub fn render(&self) -> String {
        let validated = self.diagram.validate();
        if validated.is_empty() {
            return self.render_placeholder();
        }

        let layout = compute_layout(&validated, &self.config.layout);
        let zones = compute_zone_boxes(
            &validated.zones,
            &layout,
            &self.config.layout,
            &self.config.theme,
        );

        let mut routes: Vec<RoutedConnection> = Vec::new();
        for conn in &validated.connections {
            let (Some(from), Some(to)) = (layout.node(&conn.from), layout.node(&conn.to)) else {
                warn!(from = %conn.from, to = %conn.to, "connection endpoint missing from layout");
                continue;
            };
            if let Some(routed) = route_connection(conn, from, to, &self.config.layout) {
                routes.push(routed);
            }
        }

        let theme = &self.config.theme;
        let render_cfg = &self.config.render;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">",
            render_cfg.width, render_cfg.height, layout.width, layout.height
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            theme.background
        ));
        svg.push_str(&self.stylesheet());
        svg.push_str(&self.defs());

        if render_cfg.show_header && !self.diagram.title.is_empty() {
            svg.push_str(&self.render_header(&layout));
        }

        // Back to front: zones, then connections, then nodes.
        svg.push_str(&format!("<g transform=\"{}\">", self.viewport.transform()));
        for zone in &zones {
            svg.push_str(&self.render_zone(zone));
        }
        for (index, routed) in routes.iter().enumerate() {
            svg.push_str(&self.render_connection(routed, index));
        }
        for (index, id) in layout.order.iter().enumerate() {
            let Some(node) = validated.node(id) else {
                continue;
            };
            let Some(node_box) = layout.node(id) else {
                continue;
            };
            let mut view = NodeView::new();
            if self.expanded.as_deref() == Some(id.as_str()) {
                view.pointer_enter();
            }
            svg.push_str(&view.render(
                node,
                node_box,
                index,
                &self.config.layout,
                &self.config.animation,
                theme,
            ));
        }
        svg.push_str("</g>");

        svg.push_str("</svg>");
        svg
    }

    fn render_placeholder(&self) -> String {
        let theme = &self.config.theme;
        let render_cfg = &self.config.render;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">\
             <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\
             <text x=\"{:.0}\" y=\"{:.0}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">No diagram data available</text>\
             </svg>",
            render_cfg.width,
            render_cfg.height,
            render_cfg.width,
            render_cfg.height,
            theme.background,
            render_cfg.width / 2.0,
            render_cfg.height / 2.0,
            theme.font_family,
            theme.font_size,
            theme.placeholder_color
        )
    }

    /// Animation timing lives in `AnimationConfig`; this just spells it as
    /// CSS so browsers drive the interpolation.
    ///
    /// The edge draw-in animates a dash the full length of the curve. The
    /// dasharray lives only inside the keyframes (fill mode `backwards`), so
    /// once the draw settles the path's own stroke-dasharray attribute takes
    /// over and dashed connection styles survive.
    fn stylesheet(&self) -> String {
        let animation = &self.config.animation;
        let layout = &self.config.layout;
        let hover_width = 2.0 * animation.hover_stroke_scale;
        let nudge = animation.hover_label_nudge;
        format!(
            "<style>\
             @keyframes node-enter {{ from {{ opacity: 0; transform: scale(0.9); }} to {{ opacity: 1; transform: scale(1); }} }}\
             @keyframes edge-enter {{ from {{ opacity: 0; }} to {{ opacity: 1; }} }}\
             @keyframes edge-draw {{ from {{ stroke-dasharray: 4000; stroke-dashoffset: 4000; }} to {{ stroke-dasharray: 4000; stroke-dashoffset: 0; }} }}\
             .node {{ animation: node-enter {:.1}s {} both; transform-box: fill-box; transform-origin: center; }}\
             .node-box {{ transition: height {:.1}s {}; }}\
             .node:hover .node-box {{ height: {:.0}px; }}\
             .connection {{ animation: edge-enter {:.1}s {} both; }}\
             .connection .edge {{ transition: stroke-width 0.2s {}; animation: edge-draw {:.1}s {} backwards; }}\
             .connection:hover .edge {{ stroke-width: {hover_width:.1}; }}\
             .edge-label {{ transition: transform 0.3s {}; }}\
             .connection.secondary:hover .edge-label {{ transform: translateY(-{nudge:.0}px); }}\
             .connection.monitoring:hover .edge-label {{ transform: translateY({nudge:.0}px); }}\
             </style>",
            animation.node_fade_duration,
            Easing::EaseOut.css_timing(),
            animation.expand_duration,
            Easing::EaseOut.css_timing(),
            layout.node_height_expanded,
            animation.edge_draw_duration,
            Easing::EaseOut.css_timing(),
            Easing::EaseOut.css_timing(),
            animation.edge_draw_duration,
            Easing::EaseOut.css_timing(),
            Easing::Spring.css_timing(),
        )
    }

    fn defs(&self) -> String {
        format!(
            "<defs><marker id=\"arrowhead\" markerWidth=\"10\" markerHeight=\"7\" refX=\"9\" refY=\"3.5\" orient=\"auto\">\
             <polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{}\"/></marker></defs>",
            self.config.theme.arrow_fill
        )
    }

    fn render_header(&self, layout: &Layout) -> String {
        let theme = &self.config.theme;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"32\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
            layout.width / 2.0,
            theme.font_family,
            theme.font_size + 4.0,
            theme.node_label_color,
            escape_xml(&self.diagram.title)
        ));
        if !self.diagram.description.is_empty() {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"54\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                layout.width / 2.0,
                theme.font_family,
                theme.font_size,
                theme.node_text_color,
                escape_xml(&self.diagram.description)
            ));
        }
        svg
    }

    fn render_zone(&self, zone: &ZoneBox) -> String {
        let theme = &self.config.theme;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<g class=\"zone\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"16\" fill=\"{}\" stroke=\"{}\" stroke-dasharray=\"8 6\" stroke-width=\"1.5\"/>",
            zone.x, zone.y, zone.width, zone.height, theme.zone_fill, theme.zone_border
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"500\" fill=\"{}\">{}</text>",
            zone.label_x,
            zone.label_y + theme.font_size,
            theme.font_family,
            theme.font_size,
            theme.zone_label_color,
            escape_xml(&zone.headline())
        ));
        let tag_line = zone.tag_line();
        if !tag_line.is_empty() {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                zone.label_x,
                zone.label_y + theme.font_size * (1.0 + self.config.layout.label_line_height),
                theme.font_family,
                theme.font_size - 2.0,
                theme.zone_tag_color,
                escape_xml(&tag_line)
            ));
        }
        svg.push_str("</g>");
        svg
    }

    fn render_connection(&self, routed: &RoutedConnection, index: usize) -> String {
        let theme = &self.config.theme;
        let animation = &self.config.animation;
        let layout_cfg = &self.config.layout;
        let stroke = theme.connection_stroke(routed.kind);
        let dasharray = theme
            .connection_dasharray(routed.kind)
            .map(|d| format!(" stroke-dasharray=\"{d}\""))
            .unwrap_or_default();
        let delay = stagger(index, animation.edge_stagger);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<g class=\"connection {}\" style=\"animation-delay: {delay:.1}s\">",
            kind_class(routed.kind)
        ));
        // The draw-in runs on the path itself, so it needs its own delay.
        svg.push_str(&format!(
            "<path class=\"edge\" d=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"2\"{dasharray} marker-end=\"url(#arrowhead)\" style=\"animation-delay: {delay:.1}s\"/>",
            routed.curve.to_path()
        ));

        // Invisible carrier path for the flow markers, offset from the edge.
        let carrier_id = format!("flow-{index}");
        svg.push_str(&format!(
            "<path id=\"{carrier_id}\" d=\"{}\" fill=\"none\" stroke=\"none\"/>",
            routed.marker_curve.to_path()
        ));
        for marker in 0..animation.marker_count {
            let begin = stagger(marker, animation.marker_cycle / animation.marker_count as f32);
            svg.push_str(&format!(
                "<circle r=\"3\" fill=\"{}\"><animateMotion dur=\"{:.0}s\" begin=\"{begin:.0}s\" repeatCount=\"indefinite\"><mpath href=\"#{carrier_id}\"/></animateMotion></circle>",
                theme.marker_fill, animation.marker_cycle
            ));
        }

        if !routed.label.is_empty() {
            svg.push_str(&format!(
                "<text class=\"edge-label\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                routed.label_x,
                routed.label_y,
                theme.font_family,
                theme.font_size - 2.0,
                theme.edge_label_color,
                escape_xml(&routed.label)
            ));
        }
        if let Some(protocol) = &routed.protocol {
            svg.push_str(&format!(
                "<text class=\"edge-label\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                routed.label_x,
                routed.label_y + layout_cfg.protocol_line_gap,
                theme.font_family,
                theme.font_size - 4.0,
                theme.edge_label_color,
                escape_xml(protocol)
            ));
        }
        svg.push_str("</g>");
        svg
    }
}

fn kind_class(kind: ConnectionKind) -> &'static str {
    kind.as_str()
}

/// Renders a diagram with the default viewport, no node expanded.
pub fn render_svg(diagram: &Diagram, config: &Config) -> String {
    Scene::new(diagram, config).render()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(config.render.width, config.render.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
