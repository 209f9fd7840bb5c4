//! Replay command handler.
//!
//! Feeds a sequence of key names through the dispatcher against a toolbox
//! and prints one trace line per key.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use blocknav_core::config::{Config, KeyBindings};
use blocknav_core::toolbox::{Block, Toolbox, ToolboxHost};
use blocknav_core::{NavEffect, NavKey, RunHost, SelectionTracker, dispatch};
use serde::Serialize;

pub struct ReplayOptions<'a> {
    pub toolbox: &'a Path,
    pub keys: &'a [String],
    pub json: bool,
    pub config: &'a Config,
}

/// Trace of one key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub key: String,
    pub outcome: &'static str,
    /// `+label` for a select, `-label` for a deselect.
    pub effects: Vec<String>,
    pub category: Option<String>,
    pub expanded: bool,
    pub selected: Option<String>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.key, self.outcome, self.effects.join(" "))?;
        match (&self.category, &self.selected) {
            (Some(category), Some(block)) => write!(f, " -> {category}/{block}"),
            (Some(category), None) => write!(f, " -> {category}"),
            (None, _) => Ok(()),
        }
    }
}

pub fn run(options: &ReplayOptions<'_>) -> Result<()> {
    let toolbox = Toolbox::load(options.toolbox).context("load toolbox")?;
    for step in replay(toolbox, options.keys, &options.config.keys) {
        if options.json {
            let line = serde_json::to_string(&step).context("serialize trace")?;
            println!("{line}");
        } else {
            println!("{step}");
        }
    }
    Ok(())
}

/// Runs `keys` against a fresh host and tracker.
pub fn replay(toolbox: Toolbox, keys: &[String], bindings: &KeyBindings) -> Vec<Step> {
    let mut tracker: SelectionTracker<Rc<Block>> = SelectionTracker::new();
    let mut host = ToolboxHost::new(toolbox);

    keys.iter()
        .map(|name| {
            let key = NavKey::from_name(name, bindings);
            if key.is_none() {
                tracing::info!(key = %name, "key is not bound to navigation");
            }
            let update = dispatch(key, &mut tracker, &mut host);
            let expanded = host.is_expanded();
            Step {
                key: name.trim().to_string(),
                outcome: if update.is_handled() {
                    "handled"
                } else {
                    "unhandled"
                },
                effects: update
                    .effects
                    .iter()
                    .map(|&effect| describe(effect, &tracker))
                    .collect(),
                category: host.selected_category().map(|c| c.name.clone()),
                expanded,
                selected: tracker
                    .selected_item()
                    .filter(|_| expanded)
                    .map(|block| block.label().to_string()),
            }
        })
        .collect()
}

fn describe(effect: NavEffect, tracker: &SelectionTracker<Rc<Block>>) -> String {
    let sign = if effect.is_select() { '+' } else { '-' };
    match tracker.items().get(effect.index()) {
        Some(block) => format!("{sign}{}", block.label()),
        None => effect.to_string(),
    }
}
