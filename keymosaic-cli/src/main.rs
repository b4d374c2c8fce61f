use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use keymosaic::{
    ChannelDistance, DirFrameSource, DirSink, FrameIndex, FrameSource, KeyframeBank,
    MosaicConfig, MosaicSession,
};

#[derive(Parser, Debug)]
#[command(name = "keymosaic", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select keyframes and render every frame as a mosaic.
    Run(RunArgs),
    /// Select keyframes only and write them to the keyframe directory.
    Select(SelectArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory of input PNG frames, ordered by file name.
    #[arg(long)]
    frames: PathBuf,

    /// Keyframe cache directory.
    #[arg(long)]
    keyframes: PathBuf,

    /// Output directory for rendered frames.
    #[arg(long)]
    out: PathBuf,

    /// Clear previous outputs and keyframes before starting.
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Reuse cached keyframes instead of selecting them again (when the cache is non-empty).
    #[arg(long, default_value_t = false)]
    reuse_keyframes: bool,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// Directory of input PNG frames, ordered by file name.
    #[arg(long)]
    frames: PathBuf,

    /// Keyframe cache directory.
    #[arg(long)]
    keyframes: PathBuf,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Directory of input PNG frames, ordered by file name.
    #[arg(long)]
    frames: PathBuf,

    /// Keyframe cache directory.
    #[arg(long)]
    keyframes: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Reuse cached keyframes instead of selecting them again (when the cache is non-empty).
    #[arg(long, default_value_t = false)]
    reuse_keyframes: bool,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Args, Debug)]
struct TuningArgs {
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene-change threshold.
    #[arg(long)]
    threshold: Option<f64>,

    /// Grid cells per axis.
    #[arg(long)]
    resolution: Option<u32>,

    /// Output magnification.
    #[arg(long)]
    scale: Option<u32>,

    /// Scene-change sampling density (points per axis).
    #[arg(long)]
    density: Option<u32>,

    /// Per-pixel channel distance.
    #[arg(long, value_enum)]
    distance: Option<DistanceChoice>,

    /// Match grid cells in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DistanceChoice {
    SignedSum,
    AbsoluteSum,
}

impl TuningArgs {
    fn to_config(&self) -> anyhow::Result<MosaicConfig> {
        let mut cfg = match &self.config {
            Some(path) => MosaicConfig::from_path(path)?,
            None => MosaicConfig::default(),
        };
        if let Some(v) = self.threshold {
            cfg.threshold = v;
        }
        if let Some(v) = self.resolution {
            cfg.resolution = v;
        }
        if let Some(v) = self.scale {
            cfg.scale = v;
        }
        if let Some(v) = self.density {
            cfg.sampling_density = v;
        }
        if let Some(v) = self.distance {
            cfg.distance = match v {
                DistanceChoice::SignedSum => ChannelDistance::SignedSum,
                DistanceChoice::AbsoluteSum => ChannelDistance::AbsoluteSum,
            };
        }
        if self.parallel {
            cfg.threading.parallel = true;
        }
        if self.threads.is_some() {
            cfg.threading.threads = self.threads;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Select(args) => cmd_select(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_frames(dir: &Path) -> anyhow::Result<DirFrameSource> {
    let source = DirFrameSource::open(dir)
        .with_context(|| format!("open frame directory '{}'", dir.display()))?;
    if source.is_empty() {
        anyhow::bail!("no PNG frames found in '{}'", dir.display());
    }
    Ok(source)
}

/// Load the keyframe bank from `keyframes_dir` when allowed and available, otherwise select
/// keyframes from `source` into a freshly cleared `keyframes_dir`.
fn prepare_bank(
    session: &MosaicSession,
    source: &DirFrameSource,
    keyframes_dir: &Path,
    reuse: bool,
) -> anyhow::Result<KeyframeBank> {
    if reuse {
        let cached = DirFrameSource::open(keyframes_dir)?;
        if !cached.is_empty() {
            tracing::info!(keyframes = cached.len(), "reusing cached keyframes");
            let images = (0..cached.len() as u64)
                .map(|i| cached.get(FrameIndex(i)))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(session.build_bank_from_images(&images)?);
        }
        tracing::info!("keyframe cache is empty, selecting keyframes");
    }

    keymosaic::clear_dir(keyframes_dir)?;
    let mut store = DirSink::new(keyframes_dir, "");
    let picked = session
        .select_keyframes(source, &mut store)
        .context("select keyframes")?;
    Ok(session.build_bank(&picked)?)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let session = MosaicSession::new(args.tuning.to_config()?)?;

    if args.refresh {
        tracing::info!("clearing old files");
        keymosaic::clear_dir(&args.out)?;
        keymosaic::clear_dir(&args.keyframes)?;
    } else {
        tracing::info!("continuing from last run");
    }

    let source = open_frames(&args.frames)?;
    let bank = prepare_bank(&session, &source, &args.keyframes, args.reuse_keyframes)?;

    let mut out = DirSink::new(&args.out, "render");
    let existing = out.existing_count()?.min(source.len());
    tracing::info!(existing, "found already rendered frames");

    let stats = session
        .render_range(&source, &bank, FrameIndex(existing as u64), &mut out)
        .context("render frames")?;

    eprintln!(
        "rendered {} of {} frames with {} keyframes into {}",
        stats.frames_rendered,
        stats.frames_total,
        stats.keyframes,
        args.out.display()
    );
    Ok(())
}

fn cmd_select(args: SelectArgs) -> anyhow::Result<()> {
    let session = MosaicSession::new(args.tuning.to_config()?)?;
    let source = open_frames(&args.frames)?;

    keymosaic::clear_dir(&args.keyframes)?;
    let mut store = DirSink::new(&args.keyframes, "");
    let picked = session
        .select_keyframes(&source, &mut store)
        .context("select keyframes")?;

    eprintln!(
        "picked {} keyframes from {} frames into {}",
        picked.len(),
        source.len(),
        args.keyframes.display()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let session = MosaicSession::new(args.tuning.to_config()?)?;
    let source = open_frames(&args.frames)?;
    let frame = source
        .get(FrameIndex(args.index))
        .with_context(|| format!("load frame {}", args.index))?;

    let bank = prepare_bank(&session, &source, &args.keyframes, args.reuse_keyframes)?;
    let out = session.render_frame(&frame, &bank)?;
    keymosaic::save_png(&args.out, &out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
