use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World-space layout constants. The grid shape and every spacing the
/// engine uses live here so payloads never need to carry geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub columns: usize,
    pub column_spacing: f32,
    pub row_spacing: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub bottom_row_extra: f32,
    pub node_width: f32,
    pub node_height: f32,
    pub node_height_expanded: f32,
    pub min_canvas_width: f32,
    pub min_canvas_height: f32,
    pub canvas_padding: f32,
    pub zone_padding: f32,
    pub zone_label_offset: f32,
    pub control_bias: f32,
    pub control_arch: f32,
    pub control_fraction_horizontal: f32,
    pub control_fraction_vertical: f32,
    pub marker_path_offset: f32,
    pub label_kind_offset: f32,
    pub protocol_line_gap: f32,
    pub max_visible_tags: usize,
    pub max_visible_features: usize,
    pub pill_height: f32,
    pub pill_gap: f32,
    pub pill_padding_x: f32,
    pub label_line_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            column_spacing: 400.0,
            row_spacing: 300.0,
            margin_left: 100.0,
            margin_top: 100.0,
            bottom_row_extra: 150.0,
            node_width: 250.0,
            node_height: 100.0,
            node_height_expanded: 200.0,
            min_canvas_width: 1200.0,
            min_canvas_height: 800.0,
            canvas_padding: 100.0,
            zone_padding: 100.0,
            zone_label_offset: 70.0,
            control_bias: 60.0,
            control_arch: 50.0,
            control_fraction_horizontal: 0.4,
            control_fraction_vertical: 0.15,
            marker_path_offset: 4.0,
            label_kind_offset: 30.0,
            protocol_line_gap: 14.0,
            max_visible_tags: 3,
            max_visible_features: 4,
            pill_height: 20.0,
            pill_gap: 5.0,
            pill_padding_x: 10.0,
            label_line_height: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_step: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 2.0,
            zoom_step: 0.1,
        }
    }
}

/// Timing contract for every animated element. Durations and staggers are
/// part of the visual design, not implementation detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub marker_count: usize,
    pub marker_cycle: f32,
    pub node_stagger: f32,
    pub node_fade_duration: f32,
    pub expand_duration: f32,
    pub edge_stagger: f32,
    pub edge_draw_duration: f32,
    pub hover_stroke_scale: f32,
    pub hover_label_nudge: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            marker_count: 3,
            marker_cycle: 3.0,
            node_stagger: 0.1,
            node_fade_duration: 0.3,
            expand_duration: 0.2,
            edge_stagger: 0.2,
            edge_draw_duration: 0.5,
            hover_stroke_scale: 1.5,
            hover_label_nudge: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub show_header: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#15151D".to_string(),
            show_header: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub animation: AnimationConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutOverrides>,
    viewport: Option<ViewportOverrides>,
    animation: Option<AnimationOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    node_fill: Option<String>,
    node_border: Option<String>,
    primary_stroke: Option<String>,
    secondary_stroke: Option<String>,
    monitoring_stroke: Option<String>,
    zone_border: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOverrides {
    columns: Option<usize>,
    column_spacing: Option<f32>,
    row_spacing: Option<f32>,
    margin_left: Option<f32>,
    margin_top: Option<f32>,
    bottom_row_extra: Option<f32>,
    node_width: Option<f32>,
    min_canvas_width: Option<f32>,
    min_canvas_height: Option<f32>,
    zone_padding: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportOverrides {
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    zoom_step: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimationOverrides {
    marker_count: Option<usize>,
    marker_cycle: Option<f32>,
    node_stagger: Option<f32>,
    edge_stagger: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "light" {
            config.theme = Theme::light();
        } else if theme_name == "dark" || theme_name == "default" {
            config.theme = Theme::dark();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.primary_stroke {
            config.theme.primary_stroke = v;
        }
        if let Some(v) = vars.secondary_stroke {
            config.theme.secondary_stroke = v;
        }
        if let Some(v) = vars.monitoring_stroke {
            config.theme.monitoring_stroke = v;
        }
        if let Some(v) = vars.zone_border {
            config.theme.zone_border = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.columns {
            config.layout.columns = v.max(1);
        }
        if let Some(v) = layout.column_spacing {
            config.layout.column_spacing = v;
        }
        if let Some(v) = layout.row_spacing {
            config.layout.row_spacing = v;
        }
        if let Some(v) = layout.margin_left {
            config.layout.margin_left = v;
        }
        if let Some(v) = layout.margin_top {
            config.layout.margin_top = v;
        }
        if let Some(v) = layout.bottom_row_extra {
            config.layout.bottom_row_extra = v;
        }
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.min_canvas_width {
            config.layout.min_canvas_width = v;
        }
        if let Some(v) = layout.min_canvas_height {
            config.layout.min_canvas_height = v;
        }
        if let Some(v) = layout.zone_padding {
            config.layout.zone_padding = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.viewport.max_scale = v;
        }
        if let Some(v) = viewport.zoom_step {
            config.viewport.zoom_step = v;
        }
    }

    if let Some(animation) = parsed.animation {
        if let Some(v) = animation.marker_count {
            config.animation.marker_count = v;
        }
        if let Some(v) = animation.marker_cycle {
            config.animation.marker_cycle = v;
        }
        if let Some(v) = animation.node_stagger {
            config.animation.node_stagger = v;
        }
        if let Some(v) = animation.edge_stagger {
            config.animation.edge_stagger = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_declared_grid() {
        let config = LayoutConfig::default();
        assert_eq!(config.columns, 3);
        assert_eq!(config.column_spacing, 400.0);
        assert_eq!(config.row_spacing, 300.0);
        assert_eq!(config.bottom_row_extra, 150.0);
        assert_eq!(config.node_width, 250.0);
    }

    #[test]
    fn missing_config_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.viewport.max_scale, 2.0);
        assert_eq!(config.animation.marker_count, 3);
    }

    #[test]
    fn override_file_merges_over_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/override_config.json5");
        let config = load_config(Some(&path)).unwrap();

        // Theme name applies first, then individual variables on top.
        assert_eq!(config.theme.background, Theme::light().background);
        assert_eq!(config.theme.primary_stroke, "#FF0000");
        assert_eq!(config.layout.column_spacing, 480.0);
        assert_eq!(config.layout.zone_padding, 80.0);
        assert_eq!(config.viewport.max_scale, 3.0);
        assert_eq!(config.animation.marker_count, 5);

        // Fields the file does not name keep their defaults.
        assert_eq!(config.layout.row_spacing, 300.0);
        assert_eq!(config.viewport.min_scale, 0.5);
        assert_eq!(config.animation.marker_cycle, 3.0);

        // Canvas background follows the selected theme.
        assert_eq!(config.render.background, config.theme.background);
    }
}
