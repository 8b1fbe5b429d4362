use tracing::warn;

use super::NodeBox;
use crate::config::LayoutConfig;
use crate::model::{Connection, ConnectionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One cubic Bezier segment in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: (f32, f32),
    pub control1: (f32, f32),
    pub control2: (f32, f32),
    pub end: (f32, f32),
}

impl CubicCurve {
    pub fn to_path(&self) -> String {
        format!(
            "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            self.start.0,
            self.start.1,
            self.control1.0,
            self.control1.1,
            self.control2.0,
            self.control2.1,
            self.end.0,
            self.end.1
        )
    }

    /// Parallel curve shifted vertically, used to carry flow markers clear
    /// of the visible stroke.
    pub fn offset_y(&self, dy: f32) -> CubicCurve {
        CubicCurve {
            start: (self.start.0, self.start.1 + dy),
            control1: (self.control1.0, self.control1.1 + dy),
            control2: (self.control2.0, self.control2.1 + dy),
            end: (self.end.0, self.end.1 + dy),
        }
    }

    fn is_finite(&self) -> bool {
        [self.start, self.control1, self.control2, self.end]
            .iter()
            .all(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Fully routed edge: visible curve, marker carrier curve and label anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedConnection {
    pub from: String,
    pub to: String,
    pub label: String,
    pub protocol: Option<String>,
    pub kind: ConnectionKind,
    pub orientation: Orientation,
    pub curve: CubicCurve,
    pub marker_curve: CubicCurve,
    pub label_x: f32,
    pub label_y: f32,
}

/// Vertical shift of the marker carrier path relative to the visible edge.
pub fn marker_offset(kind: ConnectionKind, config: &LayoutConfig) -> f32 {
    match kind {
        ConnectionKind::Secondary => -config.marker_path_offset,
        _ => config.marker_path_offset,
    }
}

/// Vertical shift of the edge label; keeps labels of different kinds apart
/// when several connections run through the same region.
pub fn label_offset(kind: ConnectionKind, config: &LayoutConfig) -> f32 {
    match kind {
        ConnectionKind::Primary => 0.0,
        ConnectionKind::Secondary => -config.label_kind_offset,
        ConnectionKind::Monitoring => config.label_kind_offset,
    }
}

/// Routes one connection between two node boxes.
///
/// Orientation comes from the dominant axis of the center-to-center delta.
/// Vertical runs get control points biased sideways by a fixed amount and
/// interpolated 15% along dy; columns of stacked nodes are dense, so the
/// curve needs the lateral bias to stay clear of intermediate boxes.
/// Horizontal runs interpolate 40% along dx and arch below the chord.
///
/// Returns `None` when any coordinate comes out non-finite; the caller
/// skips just this connection.
pub fn route_connection(
    conn: &Connection,
    from: &NodeBox,
    to: &NodeBox,
    config: &LayoutConfig,
) -> Option<RoutedConnection> {
    let (from_cx, from_cy) = from.center();
    let (to_cx, to_cy) = to.center();
    let dx = to_cx - from_cx;
    let dy = to_cy - from_cy;

    let (orientation, curve) = if dy.abs() > dx.abs() {
        let (start, end) = if dy >= 0.0 {
            (from.bottom_anchor(), to.top_anchor())
        } else {
            (from.top_anchor(), to.bottom_anchor())
        };
        let span = end.1 - start.1;
        let curve = CubicCurve {
            start,
            control1: (
                start.0 + config.control_bias,
                start.1 + span * config.control_fraction_vertical,
            ),
            control2: (
                end.0 + config.control_bias,
                end.1 - span * config.control_fraction_vertical,
            ),
            end,
        };
        (Orientation::Vertical, curve)
    } else {
        let (start, end) = if dx >= 0.0 {
            (from.right_anchor(), to.left_anchor())
        } else {
            (from.left_anchor(), to.right_anchor())
        };
        let span = end.0 - start.0;
        let curve = CubicCurve {
            start,
            control1: (
                start.0 + span * config.control_fraction_horizontal,
                start.1 + config.control_arch,
            ),
            control2: (
                end.0 - span * config.control_fraction_horizontal,
                end.1 + config.control_arch,
            ),
            end,
        };
        (Orientation::Horizontal, curve)
    };

    if !curve.is_finite() {
        warn!(from = %conn.from, to = %conn.to, "degenerate geometry, skipping connection");
        return None;
    }

    let kind = conn.kind();
    let marker_curve = curve.offset_y(marker_offset(kind, config));
    let label_x = (curve.start.0 + curve.end.0) / 2.0;
    let label_y = (curve.start.1 + curve.end.1) / 2.0 + label_offset(kind, config);

    Some(RoutedConnection {
        from: conn.from.clone(),
        to: conn.to.clone(),
        label: conn.label.clone(),
        protocol: conn.protocol.clone(),
        kind,
        orientation,
        curve,
        marker_curve,
        label_x,
        label_y,
    })
}
