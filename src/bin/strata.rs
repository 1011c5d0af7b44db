use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print cumulative timings for the `.wav` files in a directory (requires `ffprobe`).
    Spans(SpansArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// First sampled time in seconds.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Exclusive end time in seconds (defaults to the scene duration).
    #[arg(long)]
    end: Option<f64>,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Render chunks on a thread pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Timestamps per composition instance (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct SpansArgs {
    /// Directory holding the `.wav` files.
    #[arg(long)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Spans(args) => cmd_spans(args),
    }
}

fn assets_root(in_path: &Path) -> &Path {
    in_path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = strata::SceneFile::from_path(&args.in_path)?;
    let mut comp = scene.build(assets_root(&args.in_path))?;
    let frame = comp.render(args.time)?;

    strata::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = strata::SceneFile::from_path(&args.in_path)?;
    let root = assets_root(&args.in_path);
    let opts = strata::ExportOpts {
        start_time: args.start,
        end_time: args.end,
        fps: args.fps,
    };

    let mut sink_opts = strata::FfmpegSinkOpts::new(args.out.clone());
    sink_opts.overwrite = args.overwrite;
    let mut sink = strata::FfmpegSink::new(sink_opts);

    let stats = if args.parallel {
        let par = strata::ParallelOpts {
            chunk_size: args.chunk_size,
            threads: args.threads,
        };
        strata::export_parallel(|| scene.build(root), &opts, &par, &mut sink)?
    } else {
        let mut comp = scene.build(root)?;
        strata::export(&mut comp, &opts, &mut sink)?
    };

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}

fn cmd_spans(args: SpansArgs) -> anyhow::Result<()> {
    for span in strata::audio_spans(&args.dir)? {
        println!(
            "{}\t{:.3}\t{:.3}",
            span.path.display(),
            span.start_time,
            span.end_time
        );
    }
    Ok(())
}
