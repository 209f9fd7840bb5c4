//! Toolbox host: categories of blocks expanded into tracker runs.
//!
//! A toolbox file lists categories in display order:
//!
//! ```toml
//! [[category]]
//! name = "Logic"
//! blocks = ["if", "compare", "and"]
//! ```
//!
//! Expanding a category appends fresh `Block`s to the tracker every time;
//! blocks of earlier expansions remain in the list as the stale tail.

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::keys::{RunHost, SiblingDirection};
use crate::tracker::{Item, SelectionTracker};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolbox {
    #[serde(rename = "category", default)]
    pub categories: Vec<Category>,
}

impl Toolbox {
    /// Loads and validates a toolbox file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read toolbox from {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid toolbox {}", path.display()))
    }

    /// Parses and validates toolbox TOML.
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or the toolbox is invalid.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let toolbox: Toolbox = toml::from_str(contents).context("Failed to parse toolbox")?;
        toolbox.validate()?;
        Ok(toolbox)
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            anyhow::bail!("toolbox has no categories");
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                anyhow::bail!("category name must not be empty");
            }
            if !seen.insert(category.name.as_str()) {
                anyhow::bail!("duplicate category '{}'", category.name);
            }
        }
        Ok(())
    }
}

/// A block shown in an expanded category.
#[derive(Debug)]
pub struct Block {
    label: String,
    category: String,
    highlighted: Cell<bool>,
}

impl Block {
    pub fn new(label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
            highlighted: Cell::new(false),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted.get()
    }
}

impl Item for Block {
    fn select(&self) {
        self.highlighted.set(true);
    }

    fn deselect(&self) {
        self.highlighted.set(false);
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.label)
    }
}

/// Category list driving a `SelectionTracker<Rc<Block>>`.
#[derive(Debug)]
pub struct ToolboxHost {
    toolbox: Toolbox,
    selected: usize,
    expanded: bool,
}

impl ToolboxHost {
    pub fn new(toolbox: Toolbox) -> Self {
        Self {
            toolbox,
            selected: 0,
            expanded: false,
        }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.toolbox.categories.get(self.selected)
    }
}

impl RunHost<Rc<Block>> for ToolboxHost {
    fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn expand(&mut self, tracker: &mut SelectionTracker<Rc<Block>>) -> bool {
        let Some(category) = self.toolbox.categories.get(self.selected) else {
            return false;
        };
        if self.expanded {
            return true;
        }

        tracker.open_session();
        for label in &category.blocks {
            tracker.append_item(Rc::new(Block::new(label.as_str(), category.name.as_str())));
        }
        tracing::debug!(
            category = %category.name,
            blocks = category.blocks.len(),
            "expanded"
        );
        self.expanded = true;
        true
    }

    fn collapse(&mut self, tracker: &mut SelectionTracker<Rc<Block>>) {
        tracker.close_session();
        self.expanded = false;
    }

    fn select_sibling(&mut self, direction: SiblingDirection) {
        let last = self.toolbox.categories.len().saturating_sub(1);
        self.selected = match direction {
            SiblingDirection::Previous => self.selected.saturating_sub(1),
            SiblingDirection::Next => (self.selected + 1).min(last),
        };
    }
}
