use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use kurbo::Affine;

use scrubline::{
    BACKWARD_CURRENT_FRAME_COLOR, BACKWARD_START_FRAME_COLOR, Direction, Ease,
    FORWARD_CURRENT_FRAME_COLOR, FORWARD_START_FRAME_COLOR, PixmapSurface, Player, RawCommand,
    RecordingSurface, RenderOptions, ReverseConvention, Timeline, ValidationMode, compile_raw,
    draw_axes, render,
};

const CANVAS_SIZE: u32 = 600;
const CANVAS_SCALE: f64 = 4.0;

#[derive(Parser, Debug)]
#[command(name = "scrubline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a program at one timeline position as a PNG.
    Frame(FrameArgs),
    /// Print the execution trace at one timeline position.
    Trace(TraceArgs),
    /// Animate toward a target on a synthetic frame clock, writing a PNG
    /// sequence.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input program JSON (`{"title", "commands"}` or a bare tuple array).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline position in `[0, len]`.
    #[arg(long)]
    param: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    opts: SharedOpts,

    /// Canvas size in pixels (square).
    #[arg(long, default_value_t = CANVAS_SIZE)]
    size: u32,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input program JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline position in `[0, len]`.
    #[arg(long)]
    param: f64,

    #[command(flatten)]
    opts: SharedOpts,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input program JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Animation target; defaults to the end of the list.
    #[arg(long)]
    target: Option<f64>,

    /// Duration in milliseconds (per unit of distance with `--ease const`).
    #[arg(long, default_value_t = 1000.0)]
    duration: f64,

    #[arg(long, value_enum, default_value_t = EaseChoice::Lerp)]
    ease: EaseChoice,

    /// Synthetic frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    opts: SharedOpts,

    /// Canvas size in pixels (square).
    #[arg(long, default_value_t = CANVAS_SIZE)]
    size: u32,
}

#[derive(clap::Args, Debug)]
struct SharedOpts {
    #[arg(long, value_enum, default_value_t = DirectionChoice::Forward)]
    direction: DirectionChoice,

    /// Backward playback maps param to `len - param` before rendering.
    #[arg(long)]
    mirrored: bool,

    /// Skip invalid instructions instead of refusing the program.
    #[arg(long)]
    lenient: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EaseChoice {
    /// Linear interpolation.
    Lerp,
    /// Cubic ease in-out.
    Cubic,
    /// Constant speed: duration is ms per unit of distance.
    Const,
    /// Jump straight to the target.
    None,
}

impl From<EaseChoice> for Ease {
    fn from(choice: EaseChoice) -> Self {
        match choice {
            EaseChoice::Lerp => Ease::Linear,
            EaseChoice::Cubic => Ease::CubicInOut,
            EaseChoice::Const => Ease::ConstantSpeed,
            EaseChoice::None => Ease::None,
        }
    }
}

impl SharedOpts {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            direction: match self.direction {
                DirectionChoice::Forward => Direction::Forward,
                DirectionChoice::Backward => Direction::Backward,
            },
            reverse_convention: if self.mirrored {
                ReverseConvention::Mirrored
            } else {
                ReverseConvention::Direct
            },
        }
    }
}

/// On-disk program shape: the original save format or a bare tuple list.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ProgramFile {
    Titled {
        #[serde(default)]
        #[allow(dead_code)]
        title: Option<String>,
        commands: Vec<RawCommand>,
    },
    Bare(Vec<RawCommand>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_program(path: &Path) -> anyhow::Result<Vec<RawCommand>> {
    let f = File::open(path).with_context(|| format!("open program '{}'", path.display()))?;
    let r = BufReader::new(f);
    let program: ProgramFile = serde_json::from_reader(r).with_context(|| "parse program JSON")?;
    Ok(match program {
        ProgramFile::Titled { commands, .. } => commands,
        ProgramFile::Bare(commands) => commands,
    })
}

fn compile_program(path: &Path, lenient: bool) -> anyhow::Result<Timeline> {
    let raw = read_program(path)?;
    let mode = if lenient {
        ValidationMode::Lenient
    } else {
        ValidationMode::Strict
    };
    compile_raw(&raw, mode).map_err(|errors| {
        let mut msg = String::from("program has invalid instructions:");
        for e in &errors {
            msg.push_str("\n  ");
            msg.push_str(&e.to_string());
        }
        anyhow::anyhow!(msg)
    })
}

fn render_png(
    timeline: &Timeline,
    param: f64,
    options: &RenderOptions,
    size: u32,
    out: &Path,
) -> anyhow::Result<()> {
    let side: u16 = size
        .try_into()
        .ok()
        .filter(|&s| s > 0)
        .context("canvas size must fit a u16 and be nonzero")?;

    let base = Affine::translate((f64::from(size) / 2.0, f64::from(size) / 2.0))
        * Affine::scale(CANVAS_SCALE * f64::from(size) / f64::from(CANVAS_SIZE));
    let mut surface = PixmapSurface::new(side, side).with_base(base);

    let (start_color, current_color) = match options.direction {
        Direction::Forward => (FORWARD_START_FRAME_COLOR, FORWARD_CURRENT_FRAME_COLOR),
        Direction::Backward => (BACKWARD_START_FRAME_COLOR, BACKWARD_CURRENT_FRAME_COLOR),
    };

    draw_axes(&mut surface, Affine::IDENTITY, start_color);
    let output = render(timeline, &mut surface, param, options)?;
    draw_axes(&mut surface, output.current_frame, current_color);

    let frame = surface.finish();
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let timeline = compile_program(&args.in_path, args.opts.lenient)?;
    render_png(
        &timeline,
        args.param,
        &args.opts.render_options(),
        args.size,
        &args.out,
    )?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let timeline = compile_program(&args.in_path, args.opts.lenient)?;
    let mut surface = RecordingSurface::new();
    let output = render(
        &timeline,
        &mut surface,
        args.param,
        &args.opts.render_options(),
    )?;
    print!("{}", output.trace);
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let timeline = compile_program(&args.in_path, args.opts.lenient)?;
    let options = args.opts.render_options();
    let target = args.target.unwrap_or(timeline.len() as f64);
    if args.fps == 0 {
        anyhow::bail!("fps must be > 0");
    }

    let mut player = Player::new(0.0);
    player.animate_to(target, args.duration, args.ease.into(), 0.0);

    let mut frame_idx: u32 = 0;
    loop {
        let now_ms = f64::from(frame_idx) * 1000.0 / f64::from(args.fps);
        let value = player.tick(now_ms);
        let out = args.out_dir.join(format!("frame_{frame_idx:04}.png"));
        render_png(&timeline, value, &options, args.size, &out)?;
        frame_idx += 1;
        if !player.is_animating() {
            break;
        }
    }

    eprintln!("wrote {frame_idx} frames to {}", args.out_dir.display());
    Ok(())
}
