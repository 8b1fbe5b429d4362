use crate::config::load_config;
use crate::model::parse_diagram;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "archflow", version, about = "Architecture diagram renderer (JSON/JSON5 payloads)")]
pub struct Args {
    /// Input diagram payload (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, layout and animation overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Rendered width in pixels
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Rendered height in pixels
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Suppress the title/description header
    #[arg(long = "no-header", default_value_t = false)]
    pub no_header: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;
    if args.no_header {
        config.render.show_header = false;
    }

    let input = read_input(args.input.as_deref())?;
    let diagram = parse_diagram(&input)?;
    let svg = render_svg(&diagram, &config);

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            #[cfg(feature = "png")]
            {
                let output = ensure_output(&args.output, "png")?;
                crate::render::write_output_png(&svg, &output, &config)?;
            }
            #[cfg(not(feature = "png"))]
            {
                return Err(anyhow::anyhow!(
                    "PNG output requires the 'png' feature"
                ));
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
