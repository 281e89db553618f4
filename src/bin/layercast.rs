use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layercast::{
    CpuSurface, JsonFileTemplateRepository, LayercastConfig, MediaStore, NetworkMediaSource,
    Redraw, SceneState, Template, TemplateRepository, Tick, UploadClient, resolve_url,
};

#[derive(Parser, Debug)]
#[command(name = "layercast", version)]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Upload/media service base URL (overrides LAYERCAST_API_BASE).
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the saved template once and write a PNG still.
    Frame(FrameArgs),
    /// List the layers end users may pick from the saved template.
    Options(OptionsArgs),
    /// Upload a media file and print its resolved reference.
    Upload(UploadArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Template JSON (defaults to LAYERCAST_TEMPLATE_PATH).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Preview playhead in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Seconds to wait for media before compositing what is ready.
    #[arg(long, default_value_t = 30)]
    media_timeout: u64,
}

#[derive(Parser, Debug)]
struct OptionsArgs {
    /// Template JSON (defaults to LAYERCAST_TEMPLATE_PATH).
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    /// File to upload.
    #[arg(long)]
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut cfg = LayercastConfig::from_env();
    if let Some(base) = cli.api_base {
        cfg.api_base = base.trim_end_matches('/').to_string();
    }

    match cli.cmd {
        Command::Frame(args) => cmd_frame(&cfg, args),
        Command::Options(args) => cmd_options(&cfg, args),
        Command::Upload(args) => cmd_upload(&cfg, args),
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
        .init();
}

fn load_template(cfg: &LayercastConfig, path: Option<&Path>) -> anyhow::Result<Option<Template>> {
    let path = path.unwrap_or(cfg.template_path.as_path());
    let repo = JsonFileTemplateRepository::new(path);
    repo.load()
        .with_context(|| format!("load template '{}'", path.display()))
}

fn cmd_frame(cfg: &LayercastConfig, args: FrameArgs) -> anyhow::Result<()> {
    let Some(template) = load_template(cfg, args.template.as_deref())? else {
        anyhow::bail!("no saved template to render");
    };

    let source = NetworkMediaSource::new(cfg)?;
    let media = MediaStore::new(Arc::new(source), cfg.loader_threads)?;
    let surface = CpuSurface::new(template.resolution)?;
    let mut scene = SceneState::new(surface, media);
    scene.set_timeline(true);
    scene.set_layers(template.layers);

    let ready = scene
        .media_mut()
        .wait_idle(Duration::from_secs(args.media_timeout));
    tracing::debug!(ready = ready.len(), "media settled");

    scene.redraw(Tick {
        playhead_s: args.time.max(0.0),
        now_ms: None,
    });
    scene
        .export_png(&args.out)
        .with_context(|| format!("export frame to '{}'", args.out.display()))?;

    let stats = scene.last_stats();
    eprintln!(
        "wrote {} ({} layers drawn, {} without media)",
        args.out.display(),
        stats.drawn,
        stats.waiting
    );
    Ok(())
}

fn cmd_options(cfg: &LayercastConfig, args: OptionsArgs) -> anyhow::Result<()> {
    let options = load_template(cfg, args.template.as_deref())?
        .map(|t| t.selectable_layers())
        .unwrap_or_default();
    for layer in options {
        let media = layer
            .media
            .as_ref()
            .map(|m| resolve_url(&cfg.api_base, m.source()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}\t{}\t{}\t{}",
            layer.id.0,
            layer.layer_type.label(),
            layer.name,
            media
        );
    }
    Ok(())
}

fn cmd_upload(cfg: &LayercastConfig, args: UploadArgs) -> anyhow::Result<()> {
    let client = UploadClient::new(cfg.api_base.clone())?;
    let media = client.upload_file(&args.file)?;
    println!(
        "{:?}\t{}",
        media.kind(),
        resolve_url(client.api_base(), media.source())
    );
    Ok(())
}
