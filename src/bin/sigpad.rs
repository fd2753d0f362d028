use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "sigpad", version)]
struct Cli {
    /// Log worker activity to stderr (overridden by `RUST_LOG`).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay recorded strokes and write the signature as a PNG.
    Render(RenderArgs),
    /// Print size and ink coverage of a saved signature image.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input strokes JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Surface width override (logical units).
    #[arg(long)]
    width: Option<f64>,

    /// Surface height override (logical units).
    #[arg(long)]
    height: Option<f64>,

    /// Stroke color as RRGGBB or RRGGBBAA.
    #[arg(long)]
    color: Option<String>,

    /// Model config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Signature PNG.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Deserialize, Debug)]
struct StrokeFile {
    width: f64,
    height: f64,
    #[serde(default)]
    strokes: Vec<Vec<[f64; 2]>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sigpad=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_strokes(path: &Path) -> anyhow::Result<StrokeFile> {
    let f = File::open(path).with_context(|| format!("open strokes '{}'", path.display()))?;
    let strokes: StrokeFile =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse strokes JSON")?;
    Ok(strokes)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<sigpad::ModelConfig> {
    let cfg = match path {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            sigpad::ModelConfig::from_json_str(&s)?
        }
        None => sigpad::ModelConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let input = read_strokes(&args.in_path)?;
    let mut cfg = read_config(args.config.as_deref())?;
    if let Some(hex) = &args.color {
        cfg.color = sigpad::Rgba8::from_hex(hex)?;
    }

    let size = sigpad::SurfaceSize::new(
        args.width.unwrap_or(input.width),
        args.height.unwrap_or(input.height),
    )?;

    let model = sigpad::SignatureModel::new(cfg)?;
    model.set_surface_size(size)?;
    for stroke in &input.strokes {
        for &[x, y] in stroke {
            model.extend_stroke(sigpad::Point::new(x, y));
        }
        model.end_stroke();
    }

    let image = model
        .full_image()?
        .ok_or_else(|| anyhow::anyhow!("no signature: nothing was drawn"))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {} strokes)",
        args.out.display(),
        image.width(),
        image.height(),
        input.strokes.len()
    );
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let image = sigpad::Bitmap::open(&args.in_path)?;
    let total = u64::from(image.width()) * u64::from(image.height());
    let painted = image.painted_pixels();
    let coverage = if total == 0 {
        0.0
    } else {
        painted as f64 * 100.0 / total as f64
    };

    println!("size: {}x{}", image.width(), image.height());
    println!("painted: {painted} px ({coverage:.2}%)");
    match image.painted_bounds() {
        Some(b) => println!("bounds: x {}..={} y {}..={}", b.x0, b.x1, b.y0, b.y1),
        None => println!("bounds: none"),
    }
    Ok(())
}
