use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chartographer", version)]
struct Cli {
    /// Directory holding the metadata database and fragment blobs.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON config file (limits, background, data dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty canvas and print its id.
    Create(CreateArgs),
    /// Upload an image as a fragment of a canvas.
    Restore(RestoreArgs),
    /// Render a region of a canvas to a BMP file.
    Get(GetArgs),
    /// Delete a canvas with all of its fragments.
    Delete(CanvasArg),
    /// Print a canvas's fragment records as JSON, oldest first.
    List(CanvasArg),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Canvas width in pixels.
    #[arg(long)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long)]
    height: u32,
}

#[derive(Args, Debug)]
struct RestoreArgs {
    /// Canvas id.
    id: i64,

    /// Left edge of the fragment on the canvas.
    #[arg(long)]
    x: i64,

    /// Top edge of the fragment on the canvas.
    #[arg(long)]
    y: i64,

    /// Image file with the fragment's pixels; its size is the fragment's size.
    #[arg(long)]
    image: PathBuf,
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Canvas id.
    id: i64,

    /// Left edge of the region.
    #[arg(long)]
    x: i64,

    /// Top edge of the region.
    #[arg(long)]
    y: i64,

    /// Region width.
    #[arg(long)]
    width: u32,

    /// Region height.
    #[arg(long)]
    height: u32,

    /// Output BMP path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct CanvasArg {
    /// Canvas id.
    id: i64,
}

type Service = chartographer::Chartographer<
    chartographer::SqliteMetadataStore,
    chartographer::FsBlobStore,
>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => chartographer::ChartographerConfig::from_path(path)?,
        None => chartographer::ChartographerConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let mut service = Service::open(&config)
        .with_context(|| format!("open data dir '{}'", config.data_dir.display()))?;

    match cli.cmd {
        Command::Create(args) => cmd_create(&mut service, args),
        Command::Restore(args) => cmd_restore(&mut service, args),
        Command::Get(args) => cmd_get(&service, args),
        Command::Delete(args) => cmd_delete(&mut service, args),
        Command::List(args) => cmd_list(&service, args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_create(service: &mut Service, args: CreateArgs) -> anyhow::Result<()> {
    let canvas = service.create_canvas(args.width, args.height)?;
    println!("{}", canvas.id);
    Ok(())
}

fn cmd_restore(service: &mut Service, args: RestoreArgs) -> anyhow::Result<()> {
    let pixels = chartographer::RgbRaster::load(&args.image)?;
    let rect = chartographer::Rect::new(args.x, args.y, pixels.width, pixels.height)?;
    let fragment =
        service.restore_fragment(chartographer::CanvasId(args.id), rect, &pixels)?;
    println!("{}", fragment.id);
    Ok(())
}

fn cmd_get(service: &Service, args: GetArgs) -> anyhow::Result<()> {
    let region = chartographer::Rect::new(args.x, args.y, args.width, args.height)?;
    let raster = service.render_region(chartographer::CanvasId(args.id), region)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    raster.save_bmp(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_delete(service: &mut Service, args: CanvasArg) -> anyhow::Result<()> {
    service.delete_canvas(chartographer::CanvasId(args.id))?;
    Ok(())
}

fn cmd_list(service: &Service, args: CanvasArg) -> anyhow::Result<()> {
    let fragments = service.fragments(chartographer::CanvasId(args.id))?;
    let json = serde_json::to_string_pretty(&fragments).context("serialize fragments")?;
    println!("{json}");
    Ok(())
}
