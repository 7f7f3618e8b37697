use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use loopgif::{
    AnimationConfig, CancelToken, FrameRole, GifEncoder, ImageFileSource, LabelFont,
    ScalePercent, SlideDeck, TransitionKind, build_animation, render_timeline, save_png,
    session::label_painter,
};

#[derive(Parser, Debug)]
#[command(name = "loopgif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a looping GIF from two or more images.
    Build(BuildArgs),
    /// Dump every timeline frame as a PNG plus a JSON manifest of delays.
    Frames(FramesArgs),
}

#[derive(Args, Debug)]
struct SlideArgs {
    /// Slide image, in playback order. Repeat for each slide.
    #[arg(long = "in", required = true)]
    inputs: Vec<PathBuf>,

    /// Slide name, matched to `--in` by position. Unnamed slides get A, B, C, ...
    #[arg(long = "name")]
    names: Vec<String>,

    /// Animation config JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds each slide is held.
    #[arg(long)]
    hold: Option<f64>,

    /// Seconds each transition lasts (minimum 0.1).
    #[arg(long)]
    transition: Option<f64>,

    /// Transition kind: wipe, crossfade, slide, zoom or dip.
    #[arg(long)]
    kind: Option<TransitionKind>,

    /// Burn slide names into the frames.
    #[arg(long, default_value_t = false)]
    labels: bool,

    /// Output scale in percent (10-200).
    #[arg(long)]
    scale: Option<f64>,

    /// TTF/OTF font for labels; defaults to a system sans-serif.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    slides: SlideArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    slides: SlideArgs,

    /// Directory receiving `frame_NNNN.png` files and `frames.json`.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let (config, font) = resolve_config(&args.slides)?;
    let deck = capture_deck(&args.slides)?;
    let (bitmaps, names) = deck.build_inputs()?;

    let mut labels = label_painter(&config, font.as_ref())?;
    let animation = build_animation(
        &bitmaps,
        &names,
        &config,
        &mut labels,
        &GifEncoder,
        &CancelToken::new(),
    )?;

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &animation.bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    tracing::info!(
        frames = animation.frame_count,
        width = animation.canvas.width,
        height = animation.canvas.height,
        loop_ms = animation.loop_duration_ms,
        "build finished"
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (config, font) = resolve_config(&args.slides)?;
    let deck = capture_deck(&args.slides)?;
    let (bitmaps, names) = deck.build_inputs()?;

    let mut labels = label_painter(&config, font.as_ref())?;
    let timeline = render_timeline(&bitmaps, &names, &config, &mut labels)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut manifest = Vec::with_capacity(timeline.len());
    for (i, frame) in timeline.frames().iter().enumerate() {
        let file = format!("frame_{i:04}.png");
        save_png(&frame.bitmap, args.out_dir.join(&file))?;
        let role = match frame.role {
            FrameRole::Hold { slide } => serde_json::json!({ "hold": slide }),
            FrameRole::Transition { from, to, step } => {
                serde_json::json!({ "transition": { "from": from, "to": to, "step": step } })
            }
        };
        manifest.push(serde_json::json!({
            "file": file,
            "delay_ms": frame.delay_ms,
            "role": role,
        }));
    }

    let manifest_path = args.out_dir.join("frames.json");
    let json = serde_json::to_vec_pretty(&serde_json::json!({
        "width": timeline.canvas().width,
        "height": timeline.canvas().height,
        "loop_ms": timeline.loop_duration_ms(),
        "frames": manifest,
    }))
    .context("serialize frame manifest")?;
    std::fs::write(&manifest_path, json)
        .with_context(|| format!("write '{}'", manifest_path.display()))?;

    eprintln!("wrote {} frames to {}", timeline.len(), args.out_dir.display());
    Ok(())
}

fn resolve_config(args: &SlideArgs) -> anyhow::Result<(AnimationConfig, Option<LabelFont>)> {
    let mut config = match &args.config {
        Some(path) => AnimationConfig::from_path(path)?,
        None => AnimationConfig::default(),
    };
    if let Some(hold) = args.hold {
        config.hold_seconds = hold;
    }
    if let Some(transition) = args.transition {
        config.transition_seconds = transition;
    }
    if let Some(kind) = args.kind {
        config.transition = kind;
    }
    if let Some(scale) = args.scale {
        config.scale_percent = ScalePercent::new(scale);
    }
    config.show_labels |= args.labels;
    config.validate()?;

    let font = args.font.as_ref().map(LabelFont::from_path).transpose()?;
    Ok((config, font))
}

/// Load every `--in` image through the deck's capture flow.
fn capture_deck(args: &SlideArgs) -> anyhow::Result<SlideDeck> {
    if args.inputs.len() < 2 {
        anyhow::bail!("at least two --in images are required");
    }
    let mut deck = SlideDeck::empty();
    let mut source = ImageFileSource::new(args.inputs.iter().cloned());
    for (i, path) in args.inputs.iter().enumerate() {
        let index = deck.add_slide();
        if let Some(name) = args.names.get(i) {
            deck.rename_slide(index, name)?;
        }
        let captured = deck
            .capture_with(&mut source, index)
            .with_context(|| format!("load slide '{}'", path.display()))?;
        if !captured {
            anyhow::bail!("slide '{}' was not loaded", path.display());
        }
    }
    Ok(deck)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
