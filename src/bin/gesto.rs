use std::{
    cell::RefCell,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "gesto", version)]
struct Cli {
    /// Log scheduling decisions (DEBUG) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a request script at a fixed tick rate and print every dispatch as a JSON line.
    Replay(ReplayArgs),
    /// Normalize every request of a script without running it.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Stop at this time (seconds) instead of when the engine goes idle.
    #[arg(long)]
    until: Option<f64>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<gesto::RealizerOpts> {
    match path {
        Some(p) => Ok(gesto::RealizerOpts::load(p)?),
        None => Ok(gesto::RealizerOpts::default()),
    }
}

fn load_script(path: &Path) -> anyhow::Result<gesto::Script> {
    gesto::Script::load(path).with_context(|| format!("load script '{}'", path.display()))
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let script = load_script(&args.in_path)?;
    let opts = load_opts(args.config.as_deref())?;
    let rate = gesto::TickRate::new(args.fps)?;
    let until = args.until.unwrap_or(f64::INFINITY);

    let fired: Rc<RefCell<Vec<gesto::Instruction>>> = Rc::default();
    let mut realizer = gesto::Realizer::new(opts);
    for kind in gesto::ChannelKind::ALL {
        let sink = Rc::clone(&fired);
        realizer.register_channel(kind, move |ins: gesto::Instruction| {
            sink.borrow_mut().push(ins)
        });
    }

    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut next_event = 0;
    let mut frame: u64 = 0;
    let (mut accepted, mut rejected, mut issues) = (0usize, 0usize, 0usize);
    loop {
        let now = frame as f64 * rate.dt();
        if now > until {
            break;
        }
        while let Some(ev) = script.events.get(next_event)
            && ev.at <= now
        {
            match realizer.submit_request(&ev.request, now) {
                Ok(report) => {
                    accepted += 1;
                    issues += report.issues.len();
                    writeln!(out, "{}", json!({ "t": now, "submitted": report }))?;
                }
                Err(reason) => {
                    rejected += 1;
                    writeln!(
                        out,
                        "{}",
                        json!({ "t": now, "event": next_event, "rejected": reason.to_string() })
                    )?;
                }
            }
            next_event += 1;
        }

        realizer.advance(now);
        for ins in fired.borrow_mut().drain(..) {
            writeln!(out, "{}", json!({ "t": now, "dispatch": ins }))?;
        }

        if next_event >= script.events.len() && realizer.is_idle() && args.until.is_none() {
            break;
        }
        frame += 1;
    }

    writeln!(
        out,
        "{}",
        json!({
            "summary": {
                "accepted": accepted,
                "rejected": rejected,
                "issues": issues,
                "dispatched": realizer.dispatched_total(),
                "frames": frame + 1,
            }
        })
    )?;
    out.flush()?;
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let script = load_script(&args.in_path)?;
    let opts = load_opts(args.config.as_deref())?;

    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut rejected = 0usize;
    for (i, ev) in script.events.iter().enumerate() {
        let mut issues = Vec::new();
        let id = gesto::RequestId(i as u64);
        let line = match gesto::normalize_request(&ev.request, id, &opts, &mut issues) {
            Ok(req) => json!({
                "event": i,
                "at": ev.at,
                "status": "ok",
                "composition": req.composition,
                "instructions": req.instructions.len(),
                "end": req.end,
                "issues": issues,
            }),
            Err(reason) => {
                rejected += 1;
                json!({
                    "event": i,
                    "at": ev.at,
                    "status": "rejected",
                    "reason": reason.to_string(),
                    "issues": issues,
                })
            }
        };
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    if rejected > 0 {
        anyhow::bail!("{rejected} request(s) rejected");
    }
    Ok(())
}
