use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "affiche", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a photo into the frame over a background and write a PNG.
    Compose(ComposeArgs),
    /// Run the circular-cutout composite onto a template and write a JPEG.
    Badge(BadgeArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background image path.
    #[arg(long)]
    background: PathBuf,

    /// Photo to place inside the frame.
    #[arg(long)]
    photo: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Live surface width in pixels (defaults to the reference width).
    #[arg(long)]
    container_width: Option<f64>,

    /// Zoom factor applied on top of the cover scale (clamped to 1..=4).
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Horizontal pan in display pixels (clamped).
    #[arg(long, default_value_t = 0.0)]
    offset_x: f64,

    /// Vertical pan in display pixels (clamped).
    #[arg(long, default_value_t = 0.0)]
    offset_y: f64,

    /// Render at export quality (3 px per reference unit) instead of the
    /// live surface resolution.
    #[arg(long)]
    hd: bool,

    /// Print the resulting state snapshot as JSON to stdout.
    #[arg(long)]
    dump_state: bool,
}

#[derive(Parser, Debug)]
struct BadgeArgs {
    /// Template image path.
    #[arg(long)]
    template: PathBuf,

    /// Photo to cut into the circular cell.
    #[arg(long)]
    photo: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Badge(args) => cmd_badge(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let background = affiche::read_image(&args.background)?;
    let photo = affiche::read_image(&args.photo)?;

    let mut state = affiche::CompositorState::new();
    state.set_container_width(args.container_width);
    let ticket = state.begin_load();
    state.commit_load(ticket, Arc::new(photo));
    state.zoom_by(args.zoom);
    state.pan(args.offset_x, args.offset_y);

    let frame = if args.hd {
        affiche::export_hd(&state, &background)?
    } else {
        let target = affiche::RenderTarget::live(state.viewport());
        affiche::render_state(&state, &background, &target)?
    };

    if args.dump_state {
        serde_json::to_writer_pretty(std::io::stdout(), &state.snapshot())
            .context("write state snapshot")?;
        println!();
    }

    write_bytes(&args.out, &affiche::encode_png(&frame)?)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_badge(args: BadgeArgs) -> anyhow::Result<()> {
    let template = std::fs::read(&args.template)
        .with_context(|| format!("read template '{}'", args.template.display()))?;
    let photo = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;

    let composed = affiche::badge::compose_badge(&template, &photo)?;
    let jpeg = affiche::badge::encode_jpeg(&composed)?;

    write_bytes(&args.out, &jpeg)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_bytes(path: &PathBuf, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
