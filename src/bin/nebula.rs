use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nebula", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single animation frame as an SVG file.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene configuration JSON; omitted, the built-in aurora scene is used.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Seed for the amplitude profiles and star field.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Animation time to advance to, in seconds (stepped at 60 fps).
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Canvas width for the built-in scene.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height for the built-in scene.
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = match &args.in_path {
        Some(path) => {
            let s = fs::read_to_string(path)
                .with_context(|| format!("open scene '{}'", path.display()))?;
            serde_json::from_str(&s).with_context(|| "parse scene JSON")?
        }
        None => nebula::SceneConfig::aurora(args.width, args.height)?,
    };

    let mut engine = nebula::Engine::new(scene, args.seed)?;
    let step = 1.0 / 60.0;
    let mut list = engine.tick(0.0)?;
    let mut elapsed = 0.0;
    while elapsed + step <= args.time {
        list = engine.tick(step)?;
        elapsed += step;
    }

    let svg = nebula::render_svg(&list, engine.canvas());

    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fs::write(&args.out, svg).with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
