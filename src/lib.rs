pub mod animate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod model;
pub mod node_view;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use model::{Diagram, parse_diagram};
pub use render::{Scene, render_svg};
pub use theme::Theme;
pub use viewport::Viewport;
