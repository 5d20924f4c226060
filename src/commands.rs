use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use jsoncore::{
    parse_slice_with, render, render_pretty, AccessError, FromJson, Json, JsonMap, ParseOptions, Segment,
};

use crate::cli::jsondude_cli::{Cli, Command, Want};
use crate::config::{load_config, Config};

/// Effective settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub options: ParseOptions,
    pub pretty: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let cfg = match &cli.config {
            Some(p) => load_config(p)?,
            None => Config::default(),
        };
        let mut options = cfg.parse.options();
        if let Some(d) = cli.max_depth {
            anyhow::ensure!(d > 0, "--max-depth must be at least 1");
            options = options.with_max_depth(d);
        }
        if cli.strict {
            options = options.with_single_quotes(false);
        }
        Ok(Settings {
            options,
            pretty: cfg.render.pretty,
        })
    }
}

pub fn run(cli: Cli) -> Result<String> {
    let settings = Settings::resolve(&cli)?;
    tracing::debug!(?settings, "resolved settings");
    match &cli.cmd {
        Command::Fmt { file, pretty } => {
            let doc = load(file.as_deref(), &settings.options)?;
            Ok(emit(&doc, *pretty || settings.pretty))
        }
        Command::Get {
            file,
            path,
            want,
            pretty,
        } => {
            let doc = load(file.as_deref(), &settings.options)?;
            get(&doc, path, *want, *pretty || settings.pretty)
        }
        Command::Check { file } => {
            load(file.as_deref(), &settings.options)?;
            Ok("ok\n".to_string())
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(p) if p != Path::new("-") => fs::read(p).with_context(|| format!("read {p:?}")),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}

fn load(file: Option<&Path>, options: &ParseOptions) -> Result<Json> {
    let bytes = read_input(file)?;
    let name = file.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    tracing::debug!(input = %name, len = bytes.len(), "parsing");
    parse_slice_with(&bytes, options).with_context(|| format!("parse {name}"))
}

fn emit(v: &Json, pretty: bool) -> String {
    let mut out = if pretty { render_pretty(v) } else { render(v) };
    out.push('\n');
    out
}

/// Splits a dotted path. A numeric piece is an index when the node it
/// addresses is a list, otherwise a key.
pub fn resolve_path<'p>(doc: &Json, raw: &'p str) -> Vec<Segment<'p>> {
    let mut segs = Vec::new();
    let mut cur = Some(doc);
    for piece in raw.split('.').filter(|p| !p.is_empty()) {
        let seg = match (cur.and_then(Json::as_list), piece.parse::<usize>()) {
            (Some(_), Ok(i)) => Segment::Index(i),
            _ => Segment::Key(piece),
        };
        cur = cur.and_then(|n| n.accessor().at(&[seg]).ok());
        segs.push(seg);
    }
    segs
}

/// Borrows the node at `segs` when it converts to `T`, so containers are
/// rendered in place.
fn container<'a, T: FromJson<'a>>(doc: &'a Json, segs: &[Segment<'_>]) -> Result<&'a Json, AccessError> {
    let node = doc.get::<&Json>(segs)?;
    match T::from_json(node) {
        Ok(_) => Ok(node),
        // walk again for the mismatch report with its path
        Err(_) => doc.get::<T>(segs).map(|_| node),
    }
}

pub fn get(doc: &Json, raw_path: &str, want: Want, pretty: bool) -> Result<String> {
    let segs = resolve_path(doc, raw_path);
    let ctx = || format!("get `{raw_path}`");
    let mut out = match want {
        Want::Any => return Ok(emit(doc.get::<&Json>(&segs).with_context(ctx)?, pretty)),
        Want::Null => {
            doc.get::<()>(&segs).with_context(ctx)?;
            "null".to_string()
        }
        Want::Bool => doc.get::<bool>(&segs).with_context(ctx)?.to_string(),
        Want::Number => render(&Json::number(doc.get::<f64>(&segs).with_context(ctx)?)),
        Want::Integer => doc.get::<i64>(&segs).with_context(ctx)?.to_string(),
        Want::String => doc.get::<String>(&segs).with_context(ctx)?,
        Want::List => return Ok(emit(container::<&[Json]>(doc, &segs).with_context(ctx)?, pretty)),
        Want::Object => {
            return Ok(emit(container::<&JsonMap>(doc, &segs).with_context(ctx)?, pretty))
        }
    };
    out.push('\n');
    Ok(out)
}
