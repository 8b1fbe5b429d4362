use tracing::debug;

use super::Layout;
use crate::config::LayoutConfig;
use crate::model::Zone;
use crate::text_metrics::measure_text_width;
use crate::theme::Theme;

/// Bounding region and label anchor for one zone, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBox {
    pub id: String,
    pub label: String,
    pub security: String,
    pub compliance: Vec<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Top-left of the two-line label block above the region.
    pub label_x: f32,
    pub label_y: f32,
    pub label_width: f32,
    pub label_height: f32,
}

impl ZoneBox {
    /// First label line: zone name plus security level.
    pub fn headline(&self) -> String {
        if self.security.is_empty() {
            self.label.clone()
        } else {
            format!("{} · {}", self.label, self.security)
        }
    }

    /// Second label line: compliance tags.
    pub fn tag_line(&self) -> String {
        self.compliance.join("  ")
    }
}

/// Computes a padded bounding box around each zone's member nodes.
/// Unresolved member ids are skipped; a zone with no resolvable members
/// produces nothing at all rather than a zero-size box.
pub fn compute_zone_boxes(
    zones: &[&Zone],
    layout: &Layout,
    config: &LayoutConfig,
    theme: &Theme,
) -> Vec<ZoneBox> {
    let mut boxes = Vec::new();

    for zone in zones {
        let members: Vec<_> = zone
            .nodes
            .iter()
            .filter_map(|id| {
                let node = layout.node(id);
                if node.is_none() {
                    debug!(zone = %zone.id, node = %id, "zone member not in layout, skipping");
                }
                node
            })
            .collect();

        if members.is_empty() {
            debug!(zone = %zone.id, "zone has no resolvable members, omitting");
            continue;
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for member in &members {
            min_x = min_x.min(member.x);
            min_y = min_y.min(member.y);
            max_x = max_x.max(member.x + member.width);
            max_y = max_y.max(member.y + member.height);
        }

        let x = min_x - config.zone_padding;
        let y = min_y - config.zone_padding;
        let width = max_x - min_x + config.zone_padding * 2.0;
        let height = max_y - min_y + config.zone_padding * 2.0;

        let headline = if zone.security.is_empty() {
            zone.label.clone()
        } else {
            format!("{} · {}", zone.label, zone.security)
        };
        let tag_line = zone.compliance.join("  ");
        let headline_width = measure_text_width(&headline, theme.font_size, &theme.font_family);
        let tag_width = measure_text_width(&tag_line, theme.font_size, &theme.font_family);
        let label_width = headline_width.max(tag_width);
        let label_height = theme.font_size * config.label_line_height * 2.0;

        boxes.push(ZoneBox {
            id: zone.id.clone(),
            label: zone.label.clone(),
            security: zone.security.clone(),
            compliance: zone.compliance.clone(),
            x,
            y,
            width,
            height,
            label_x: x,
            label_y: y - config.zone_label_offset,
            label_width,
            label_height,
        });
    }

    boxes
}
