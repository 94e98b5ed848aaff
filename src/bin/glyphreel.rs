use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glyphreel", version)]
struct Cli {
    /// Settings JSON; relative asset directories resolve against its folder.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the preview frame and write it as a PNG.
    Preview(PreviewArgs),
    /// Print the ffmpeg filter graph for a text.
    Graph(GraphArgs),
    /// Render the clip with ffmpeg (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct TextArgs {
    /// Text to lay out.
    #[arg(long)]
    text: String,

    /// Case applied to the text.
    #[arg(long, value_enum, default_value_t = CaseChoice::Mixed)]
    case: CaseChoice,

    /// Override the glyph size in pixels.
    #[arg(long)]
    char_size: Option<u32>,

    /// Override the spacing factor (-1.0..=0.0).
    #[arg(long, allow_hyphen_values = true)]
    spacing: Option<f64>,

    /// Override the space width in pixels.
    #[arg(long)]
    space_width: Option<u32>,

    /// Draw `m` and `w` 1.2x wide.
    #[arg(long)]
    wide_mw: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    text: TextArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct GraphArgs {
    #[command(flatten)]
    text: TextArgs,

    /// Print the graph as JSON instead of filter syntax.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    text: TextArgs,

    /// Directory the clip is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the ffmpeg command instead of running it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CaseChoice {
    Upper,
    Lower,
    Mixed,
}

impl From<CaseChoice> for glyphreel::CaseMode {
    fn from(value: CaseChoice) -> Self {
        match value {
            CaseChoice::Upper => Self::Upper,
            CaseChoice::Lower => Self::Lower,
            CaseChoice::Mixed => Self::Mixed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (settings, root) = load_settings(cli.config.as_deref())?;
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args, settings, &root),
        Command::Graph(args) => cmd_graph(args, settings, &root),
        Command::Render(args) => cmd_render(args, settings, &root),
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<(glyphreel::Settings, PathBuf)> {
    match path {
        Some(path) => {
            let settings = glyphreel::Settings::from_path(path)?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((settings, root))
        }
        None => Ok((glyphreel::Settings::default(), PathBuf::from("."))),
    }
}

fn apply_overrides(
    mut settings: glyphreel::Settings,
    args: &TextArgs,
    root: &Path,
) -> anyhow::Result<glyphreel::Settings> {
    if let Some(size) = args.char_size {
        settings.base_char_size = size;
    }
    if let Some(spacing) = args.spacing {
        settings.spacing_factor = spacing;
    }
    if let Some(width) = args.space_width {
        settings.space_width = width;
    }
    if args.wide_mw {
        settings.width_ratios = glyphreel::WidthRatios::wide_mw();
    }
    settings.validate()?;
    Ok(settings.resolve_dirs(root))
}

fn cmd_preview(args: PreviewArgs, settings: glyphreel::Settings, root: &Path) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.text, root)?;
    let glyphs =
        glyphreel::PreviewGlyphs::load_dir(&settings.preview_dir, settings.width_ratios.clone())?;

    let frame =
        glyphreel::preview_text(&args.text.text, args.text.case.into(), &settings, &glyphs)?;

    glyphreel::ensure_parent_dir(&args.out)?;
    frame
        .to_rgb_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_graph(args: GraphArgs, settings: glyphreel::Settings, root: &Path) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.text, root)?;

    // Graph output does not need the clips themselves, only a key for every glyph.
    let tokens = glyphreel::tokenize(
        &args.text.text,
        args.text.case.into(),
        glyphreel::TokenPolicy::Strict,
    )?;
    let Some(layout) = glyphreel::layout(&tokens, &settings.render_params(), &settings.width_ratios)
    else {
        eprintln!("empty text, nothing to describe");
        return Ok(());
    };
    let graph =
        glyphreel::FilterGraphBuilder::new(settings.render_canvas, settings.duration_secs, settings.fps)?
            .build(layout.glyphs());

    if args.json {
        let json = serde_json::to_string_pretty(&graph).context("serialize graph JSON")?;
        println!("{json}");
    } else {
        println!("{graph}");
    }
    eprintln!("fingerprint {}", graph.fingerprint());
    Ok(())
}

fn cmd_render(args: RenderArgs, settings: glyphreel::Settings, root: &Path) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.text, root)?;
    let clips = glyphreel::ClipGlyphs::scan(
        &settings.clips_lower_dir,
        &settings.clips_upper_dir,
        settings.width_ratios.clone(),
    )?;

    let Some(plan) = glyphreel::plan_render(
        &args.text.text,
        args.text.case.into(),
        &settings,
        &clips,
        &args.out_dir,
    )?
    else {
        eprintln!("empty text, nothing to render");
        return Ok(());
    };

    if args.dry_run {
        println!("{}", plan.command.display_line());
        return Ok(());
    }

    let out = glyphreel::render_clip(plan)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
