use crate::animate::stagger;
use crate::config::{AnimationConfig, LayoutConfig};
use crate::layout::NodeBox;
use crate::model::Node;
use crate::render::escape_xml;
use crate::text_metrics::measure_text_width;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandState {
    #[default]
    Collapsed,
    Expanded,
}

/// Per-node presentation state: one flag, hover-driven. Two states, no
/// intermediate; the 0.2 s height transition is purely visual.
#[derive(Debug, Clone, Default)]
pub struct NodeView {
    state: ExpandState,
}

impl NodeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_enter(&mut self) {
        self.state = ExpandState::Expanded;
    }

    pub fn pointer_leave(&mut self) {
        self.state = ExpandState::Collapsed;
    }

    pub fn state(&self) -> ExpandState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == ExpandState::Expanded
    }

    pub fn height(&self, config: &LayoutConfig) -> f32 {
        match self.state {
            ExpandState::Collapsed => config.node_height,
            ExpandState::Expanded => config.node_height_expanded,
        }
    }

    /// SVG fragment for one node at its layout position. `index` drives the
    /// staggered entry animation.
    pub fn render(
        &self,
        node: &Node,
        node_box: &NodeBox,
        index: usize,
        config: &LayoutConfig,
        animation: &AnimationConfig,
        theme: &Theme,
    ) -> String {
        let x = node_box.x;
        let y = node_box.y;
        let height = self.height(config);
        let delay = stagger(index, animation.node_stagger);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<g class=\"node\" style=\"animation-delay: {delay:.1}s\">"
        ));
        svg.push_str(&format!(
            "<rect class=\"node-box\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{height:.2}\" rx=\"12\" fill=\"{}\" stroke=\"{}\"/>",
            node_box.width, theme.node_fill, theme.node_border
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"500\" fill=\"{}\">{}</text>",
            x + 20.0,
            y + 30.0,
            theme.font_family,
            theme.font_size,
            theme.node_label_color,
            escape_xml(&node.label)
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            x + 20.0,
            y + 50.0,
            theme.font_family,
            theme.font_size - 2.0,
            theme.node_text_color,
            escape_xml(&node.description)
        ));

        svg.push_str(&self.render_tags(node, x + 20.0, y + 65.0, config, theme));

        if self.is_expanded() {
            svg.push_str(&self.render_detail(node, x, y, config, theme));
        }

        svg.push_str("</g>");
        svg
    }

    fn render_tags(
        &self,
        node: &Node,
        origin_x: f32,
        origin_y: f32,
        config: &LayoutConfig,
        theme: &Theme,
    ) -> String {
        let tags = node.flat_technologies();
        let visible = tags.len().min(config.max_visible_tags);
        let pill_font = theme.font_size - 4.0;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<g transform=\"translate({origin_x:.2}, {origin_y:.2})\">"
        ));
        let mut cursor_x = 0.0f32;
        for tag in &tags[..visible] {
            let text_width = measure_text_width(tag, pill_font, &theme.font_family);
            let pill_width = text_width + config.pill_padding_x * 2.0;
            svg.push_str(&format!(
                "<rect x=\"{cursor_x:.2}\" width=\"{pill_width:.2}\" height=\"{:.2}\" rx=\"10\" fill=\"{}\"/>",
                config.pill_height, theme.pill_fill
            ));
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"14\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                cursor_x + pill_width / 2.0,
                theme.font_family,
                pill_font,
                theme.pill_text_color,
                escape_xml(tag)
            ));
            cursor_x += pill_width + config.pill_gap;
        }
        if tags.len() > visible {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"14\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">+{} more</text>",
                cursor_x + 4.0,
                theme.font_family,
                pill_font,
                theme.pill_text_color,
                tags.len() - visible
            ));
        }
        svg.push_str("</g>");
        svg
    }

    /// Metrics and features columns, shown only while expanded.
    fn render_detail(
        &self,
        node: &Node,
        x: f32,
        y: f32,
        config: &LayoutConfig,
        theme: &Theme,
    ) -> String {
        let detail_font = theme.font_size - 3.0;
        let line_height = detail_font * config.label_line_height;
        let top = y + 110.0;

        let mut svg = String::new();
        svg.push_str("<g class=\"node-detail\">");

        let mut line_y = top;
        for (name, value) in &node.metrics {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{line_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}: {}</text>",
                x + 20.0,
                theme.font_family,
                detail_font,
                theme.node_text_color,
                escape_xml(name),
                escape_xml(value)
            ));
            line_y += line_height;
        }

        let mut line_y = top;
        for feature in node.features.iter().take(config.max_visible_features) {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{line_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">• {}</text>",
                x + 135.0,
                theme.font_family,
                detail_font,
                theme.node_text_color,
                escape_xml(feature)
            ));
            line_y += line_height;
        }

        svg.push_str("</g>");
        svg
    }
}
