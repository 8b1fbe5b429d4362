use serde::{Deserialize, Serialize};

use crate::model::ConnectionKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub node_fill: String,
    pub node_border: String,
    pub node_label_color: String,
    pub node_text_color: String,
    pub pill_fill: String,
    pub pill_text_color: String,
    pub zone_fill: String,
    pub zone_border: String,
    pub zone_label_color: String,
    pub zone_tag_color: String,
    pub primary_stroke: String,
    pub secondary_stroke: String,
    pub monitoring_stroke: String,
    pub edge_label_color: String,
    pub arrow_fill: String,
    pub marker_fill: String,
    pub placeholder_color: String,
}

impl Theme {
    /// Palette lifted from the site the engine was built for.
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#15151D".to_string(),
            node_fill: "#252631".to_string(),
            node_border: "#2E2F3D".to_string(),
            node_label_color: "#FFFFFF".to_string(),
            node_text_color: "#9CA3AF".to_string(),
            pill_fill: "#1C1C27".to_string(),
            pill_text_color: "#9CA3AF".to_string(),
            zone_fill: "rgba(99, 102, 241, 0.04)".to_string(),
            zone_border: "#4D4E5A".to_string(),
            zone_label_color: "#E5E7EB".to_string(),
            zone_tag_color: "#9CA3AF".to_string(),
            primary_stroke: "#6366F1".to_string(),
            secondary_stroke: "#8B5CF6".to_string(),
            monitoring_stroke: "#F59E0B".to_string(),
            edge_label_color: "#9CA3AF".to_string(),
            arrow_fill: "#2A85FF".to_string(),
            marker_fill: "#6366F1".to_string(),
            placeholder_color: "#9CA3AF".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            node_fill: "#F8FAFF".to_string(),
            node_border: "#C7D2E5".to_string(),
            node_label_color: "#1C2430".to_string(),
            node_text_color: "#5B6472".to_string(),
            pill_fill: "#EEF2F8".to_string(),
            pill_text_color: "#5B6472".to_string(),
            zone_fill: "rgba(99, 102, 241, 0.05)".to_string(),
            zone_border: "#C7D2E5".to_string(),
            zone_label_color: "#1C2430".to_string(),
            zone_tag_color: "#5B6472".to_string(),
            primary_stroke: "#4F46E5".to_string(),
            secondary_stroke: "#7C3AED".to_string(),
            monitoring_stroke: "#D97706".to_string(),
            edge_label_color: "#5B6472".to_string(),
            arrow_fill: "#2A85FF".to_string(),
            marker_fill: "#4F46E5".to_string(),
            placeholder_color: "#5B6472".to_string(),
        }
    }

    pub fn connection_stroke(&self, kind: ConnectionKind) -> &str {
        match kind {
            ConnectionKind::Primary => &self.primary_stroke,
            ConnectionKind::Secondary => &self.secondary_stroke,
            ConnectionKind::Monitoring => &self.monitoring_stroke,
        }
    }

    /// Secondary and monitoring edges render dotted, like the source site.
    pub fn connection_dasharray(&self, kind: ConnectionKind) -> Option<&'static str> {
        match kind {
            ConnectionKind::Primary => None,
            ConnectionKind::Secondary | ConnectionKind::Monitoring => Some("5 5"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
