use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use jsoncore::{ParseOptions, DEFAULT_MAX_DEPTH};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parse: ParseCfg,
    pub render: RenderCfg,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ParseCfg {
    pub max_depth: usize,
    pub allow_single_quotes: bool,
}

impl Default for ParseCfg {
    fn default() -> Self {
        ParseCfg {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_single_quotes: true,
        }
    }
}

impl ParseCfg {
    pub fn options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_max_depth(self.max_depth)
            .with_single_quotes(self.allow_single_quotes)
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderCfg {
    pub pretty: bool,
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse TOML config")?;
    if cfg.parse.max_depth == 0 {
        bail!("parse.max_depth must be at least 1");
    }
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read config {path:?}"))?;
    parse_config(&s).with_context(|| format!("load config {path:?}"))
}
