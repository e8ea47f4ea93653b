use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "choreo", version)]
struct Cli {
    /// Log filter level written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted session and write its event trace and sampled frames as JSON.
    Trace(TraceArgs),
    /// Print the rendered snapshot at one instant of a scripted session.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input session script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input session script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Clock instant in milliseconds.
    #[arg(long)]
    at: u64,
}

/// One timed intent.
#[derive(Debug, serde::Deserialize)]
struct Step {
    at: u64,
    #[serde(flatten)]
    request: choreo::IntentRequest,
    /// Measured grid rect for `select`; falls back to the host grid and the catalog placement.
    #[serde(default)]
    source: Option<choreo::ViewRect>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    #[serde(default)]
    config: choreo::ChoreoConfig,
    /// Catalog; the built-in desk grid when omitted.
    #[serde(default)]
    catalog: Option<choreo::CatalogDef>,
    /// Host measurements; grid rects default to resolved catalog placements.
    #[serde(default)]
    host: Option<choreo::StaticHost>,
    /// Document height; defaults to the viewport height.
    #[serde(default)]
    scroll_height: Option<f64>,
    #[serde(default)]
    steps: Vec<Step>,
    /// Clock value the session runs to; by default it runs until the last step goes idle.
    #[serde(default)]
    until: Option<u64>,
    #[serde(default = "default_sample_every")]
    sample_every_ms: u64,
}

fn default_sample_every() -> u64 {
    100
}

#[derive(Debug, serde::Serialize)]
struct TraceOutput<'a> {
    events: &'a choreo::Trace,
    frames: Vec<choreo::FrameSnapshot>,
    final_state: &'a choreo::SceneState,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .with_writer(std::io::stderr)
        .init();
    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_script(path: &Path) -> anyhow::Result<Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let r = BufReader::new(f);
    let script: Script = serde_json::from_reader(r).with_context(|| "parse script JSON")?;
    if script.sample_every_ms == 0 {
        anyhow::bail!("sample_every_ms must be > 0");
    }
    let mut last = 0;
    for step in &script.steps {
        if step.at < last {
            anyhow::bail!("script steps must be in clock order ({} after {last})", step.at);
        }
        if let Some(source) = step.source {
            source.validate()?;
        }
        last = step.at;
    }
    Ok(script)
}

fn make_director(script: &Script) -> anyhow::Result<choreo::Director> {
    let catalog = match &script.catalog {
        Some(def) => choreo::ContentCatalog::from_def(def.clone())?,
        None => choreo::ContentCatalog::builtin(),
    };
    let host = script
        .host
        .clone()
        .unwrap_or_else(|| choreo::StaticHost::from_catalog(&catalog, script.config.viewport));
    let scroll_height = script
        .scroll_height
        .unwrap_or(script.config.viewport.height);
    let (director, _viewport) =
        choreo::Director::in_memory(script.config.clone(), catalog, host, scroll_height)?;
    Ok(director)
}

fn apply_step(director: &mut choreo::Director, step: &Step) {
    director.advance_to(choreo::Millis(step.at));
    let outcome = match &step.request {
        choreo::IntentRequest::Select { object } => {
            director.select_object(object.clone(), step.source)
        }
        choreo::IntentRequest::Back => director.go_back(),
    };
    tracing::info!(at = step.at, request = ?step.request, ?outcome, "step");
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let script = read_script(&args.script)?;
    let mut director = make_director(&script)?;

    let mut frames = Vec::new();
    let mut steps = script.steps.iter().peekable();
    let mut t = 0u64;
    loop {
        while let Some(step) = steps.next_if(|s| s.at <= t) {
            apply_step(&mut director, step);
        }
        director.advance_to(choreo::Millis(t));
        frames.push(director.render());
        if steps.peek().is_none() && director.pending() == 0 {
            break;
        }
        if script.until.is_some_and(|u| t >= u) {
            break;
        }
        t += script.sample_every_ms;
    }
    if let Some(until) = script.until {
        director.advance_to(choreo::Millis(until));
    }

    let out = TraceOutput {
        events: director.trace(),
        frames,
        final_state: director.state(),
    };
    let json = serde_json::to_string_pretty(&out).with_context(|| "serialize trace")?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let script = read_script(&args.script)?;
    let mut director = make_director(&script)?;
    for step in script.steps.iter().take_while(|s| s.at <= args.at) {
        apply_step(&mut director, step);
    }
    director.advance_to(choreo::Millis(args.at));
    let json =
        serde_json::to_string_pretty(&director.render()).with_context(|| "serialize frame")?;
    println!("{json}");
    Ok(())
}
