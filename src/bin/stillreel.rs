use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "stillreel", version)]
struct Cli {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Render settings JSON (fps, bitrate, ffmpeg program, ...).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 from the picked still and its siblings (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the selected stills and their frame schedule as JSON without encoding.
    Plan(ClipArgs),
    /// Answer a JSON video request read from a file or stdin.
    Request(RequestArgs),
}

#[derive(Args, Debug)]
struct ClipArgs {
    /// Picked still; its folder is scanned for siblings.
    #[arg(long)]
    image: PathBuf,

    /// Playback direction pattern.
    #[arg(long, value_enum, default_value_t = EffectChoice::PingPong)]
    effect: EffectChoice,

    /// Per-still screen-time curve.
    #[arg(long, value_enum, default_value_t = ShapeChoice::Linear)]
    shape: ShapeChoice,

    /// Motion interpolation applied by ffmpeg.
    #[arg(long, value_enum, default_value_t = SmoothingChoice::Off)]
    smoothing: SmoothingChoice,

    /// Clip length in seconds.
    #[arg(long, default_value_t = 10.0)]
    duration: f64,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    clip: ClipArgs,

    /// Output MP4 path (defaults to the picked still with an `.mp4` extension).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Served output root that request paths are relative to.
    #[arg(long)]
    root: PathBuf,

    /// Request JSON file; stdin when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EffectChoice {
    Ping,
    Pong,
    PingPong,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeChoice {
    Linear,
    Rounded,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SmoothingChoice {
    Off,
    Fast,
    Quality,
}

impl ClipArgs {
    fn options(&self) -> stillreel::RenderOptions {
        stillreel::RenderOptions {
            effect: match self.effect {
                EffectChoice::Ping => stillreel::FrameEffect::Ping,
                EffectChoice::Pong => stillreel::FrameEffect::Pong,
                EffectChoice::PingPong => stillreel::FrameEffect::PingPong,
            },
            shape: match self.shape {
                ShapeChoice::Linear => stillreel::FrameShape::Linear,
                ShapeChoice::Rounded => stillreel::FrameShape::Rounded,
            },
            smoothing: match self.smoothing {
                SmoothingChoice::Off => stillreel::FrameSmoothing::Off,
                SmoothingChoice::Fast => stillreel::FrameSmoothing::Fast,
                SmoothingChoice::Quality => stillreel::FrameSmoothing::Quality,
            },
            duration_secs: self.duration,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(args, &settings),
        Command::Plan(args) => cmd_plan(args, &settings),
        Command::Request(args) => cmd_request(args, settings),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<stillreel::RenderSettings> {
    match path {
        Some(p) => Ok(stillreel::RenderSettings::from_path(p)?),
        None => Ok(stillreel::RenderSettings::default()),
    }
}

fn cmd_render(args: RenderArgs, settings: &stillreel::RenderSettings) -> anyhow::Result<()> {
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| args.clip.image.with_extension("mp4"));
    anyhow::ensure!(
        out != args.clip.image,
        "output '{}' would overwrite the picked still",
        out.display()
    );

    let (plan, stats) =
        stillreel::render_to_mp4(&args.clip.image, &out, &args.clip.options(), settings)?;

    eprintln!(
        "wrote {} ({} frames, {} stills of {})",
        out.display(),
        stats.frames_written,
        plan.segments.first().map_or(0, |s| s.images.len()),
        plan.candidates
    );
    Ok(())
}

fn cmd_plan(args: ClipArgs, settings: &stillreel::RenderSettings) -> anyhow::Result<()> {
    let set = stillreel::gather_siblings(&args.image, settings.min_images)?;
    let plan = stillreel::plan_render(&set, &args.options(), settings)?;

    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &plan).context("write plan JSON")?;
    println!();
    Ok(())
}

fn cmd_request(args: RequestArgs, settings: stillreel::RenderSettings) -> anyhow::Result<()> {
    let body = match &args.in_path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("read request '{}'", p.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read request from stdin")?;
            s
        }
    };

    let handler = stillreel::RequestHandler::new(args.root, settings);
    let resp = handler.handle_json(&body);
    println!(
        "{}",
        serde_json::to_string(&resp).context("serialize response")?
    );
    Ok(())
}
