use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wordflip_config::WordflipConfig;
use wordflip_dom::{Document, Stage, StageEvent};

/// Simulated time budget when `--until` is not given.
const DEFAULT_UNTIL_MS: u64 = 60_000;

const USAGE: &str =
    "Usage: wordflip <page.html> [--config <file>] [--until <ms>] [--out <file>] [--json]";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    until_ms: u64,
    out: Option<PathBuf>,
    json: bool,
}

/// Parse command-line arguments, program name excluded.
fn parse_args(args: &[String]) -> Result<Args> {
    let Some((first, rest)) = args.split_first() else {
        bail!("missing <page.html>");
    };
    if first.starts_with("--") {
        bail!("missing <page.html>");
    }

    let input = PathBuf::from(first);
    let mut config = None;
    let mut until_ms = DEFAULT_UNTIL_MS;
    let mut out = None;
    let mut json = false;
    let mut i = 0usize;
    while i < rest.len() {
        match rest[i].as_str() {
            "--config" => {
                let Some(path) = rest.get(i + 1) else {
                    bail!("--config expects a path");
                };
                config = Some(PathBuf::from(path));
                i += 2;
            }
            "--until" => {
                let Some(value) = rest.get(i + 1) else {
                    bail!("--until expects milliseconds");
                };
                until_ms = value
                    .parse()
                    .with_context(|| format!("invalid --until value '{value}'"))?;
                i += 2;
            }
            "--out" => {
                let Some(path) = rest.get(i + 1) else {
                    bail!("--out expects a path");
                };
                out = Some(PathBuf::from(path));
                i += 2;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            other => bail!("unknown argument '{other}'"),
        }
    }

    Ok(Args {
        input,
        config,
        until_ms,
        out,
        json,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<WordflipConfig> {
    let mut config = match path {
        Some(path) => WordflipConfig::load_from_file(path)?,
        None => WordflipConfig::load_or_default(),
    };
    config.merge_with_env();
    Ok(config)
}

/// Handle every signal due up to `until_ms`, returning the events in order.
fn run_timeline(stage: &mut Stage, until_ms: u64) -> Result<Vec<StageEvent>> {
    let mut events = Vec::new();
    while let Some(due) = stage.next_due_ms() {
        if due > until_ms {
            break;
        }
        stage.run_until(due)?;
        events.extend(stage.drain_events());
    }
    Ok(events)
}

fn format_event(event: &StageEvent, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(event)?);
    }
    let line = match event {
        StageEvent::Transition {
            at_ms,
            container,
            word,
            text,
            to,
            class,
            ..
        } => format!("{at_ms:>8}ms  #{container} word {word} {text:?} -> {to:?} [{class}]"),
        StageEvent::Finished {
            at_ms,
            container,
            shown: Some(word),
        } => format!("{at_ms:>8}ms  #{container} finished, holding word {word}"),
        StageEvent::Finished {
            at_ms,
            container,
            shown: None,
        } => format!("{at_ms:>8}ms  #{container} finished"),
    };
    Ok(line)
}

fn main() -> Result<()> {
    env_logger::init();

    let raw = env::args().skip(1).collect::<Vec<_>>();
    let args = parse_args(&raw).inspect_err(|_| eprintln!("{USAGE}"))?;
    if !args.input.exists() {
        bail!("input file not found: {}", args.input.display());
    }
    let config = load_config(args.config.as_ref())?;
    log::debug!("configuration: {config:?}");

    let document = Document::from_file(&args.input)?;
    let mut stage = Stage::new(document, config.switcher_options())?;
    log::info!(
        "{} container(s) in {}",
        stage.containers().len(),
        args.input.display()
    );

    for event in run_timeline(&mut stage, args.until_ms)? {
        println!("{}", format_event(&event, args.json)?);
    }
    if !stage.is_finished() {
        log::info!("stopped at {}ms with cycles still running", args.until_ms);
    }

    let html = stage.into_document().to_html();
    match args.out {
        Some(path) => fs::write(&path, html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{html}"),
    }
    Ok(())
}
