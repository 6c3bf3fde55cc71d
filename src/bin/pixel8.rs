use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pixel8", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of a scene as a PNG.
    Frame(FrameArgs),
    /// Render the first N frames of a scene as numbered PNGs.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON (a node tree rooted at a stage).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based). Earlier frames are rendered first so transitions advance.
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input scene JSON (a node tree rooted at a stage).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of frames to render.
    #[arg(long)]
    count: u64,

    /// Output directory; receives `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<pixel8::Node> {
    pixel8::Node::from_path(path).with_context(|| format!("load scene '{}'", path.display()))
}

fn scene_loop(scene: pixel8::Node, max_frames: u64) -> pixel8::RenderLoop {
    let opts = pixel8::RenderLoopOpts {
        max_frames: Some(max_frames),
        ..pixel8::RenderLoopOpts::from_env()
    };
    pixel8::RenderLoop::new(move |_| scene.clone()).with_opts(opts)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let mut lp = scene_loop(scene, args.frame + 1);
    let mut presenter = pixel8::MemoryPresenter::new();
    lp.run(&mut presenter, &mut pixel8::Immediate::default())?;
    let frame = presenter
        .frames()
        .last()
        .context("scene produced no frames")?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    pixel8::write_png(&args.out, frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.count > 0, "--count must be at least 1");
    let scene = read_scene(&args.in_path)?;
    let mut lp = scene_loop(scene, args.count);
    let mut presenter = pixel8::PngSequence::new(&args.out_dir);
    let rendered = lp.run(&mut presenter, &mut pixel8::Immediate::default())?;

    eprintln!("wrote {rendered} frames to {}", args.out_dir.display());
    Ok(())
}
