//! Directional key dispatch.
//!
//! Maps the four navigation keys onto tracker operations. Anything the
//! tracker does not own (sibling categories, expand/collapse bookkeeping)
//! is delegated to a [`RunHost`].
//!
//! | key   | expanded                    | collapsed                 |
//! |-------|-----------------------------|---------------------------|
//! | Down  | `move_next`                 | host: next sibling        |
//! | Up    | `move_back`                 | host: previous sibling    |
//! | Left  | `exit_run`, host collapses  | nothing to collapse       |
//! | Right | host expands, `enter_run`   | host expands, `enter_run` |
//!
//! Unbound keys are reported as unhandled and cause no side effects, so the
//! caller can fall back to its default handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyBindings;
use crate::effects::NavEffect;
use crate::tracker::{Item, SelectionTracker};

/// Navigation intent of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Backward within the run.
    Up,
    /// Forward within the run.
    Down,
    /// Collapse the run.
    Left,
    /// Expand the run.
    Right,
}

impl NavKey {
    /// Resolves a key name (`"down"`, `"j"`, ...) through the bindings.
    pub fn from_name(name: &str, bindings: &KeyBindings) -> Option<Self> {
        let name = normalize_name(name);
        let bound = |names: &[String]| names.iter().any(|n| normalize_name(n) == name);

        if bound(&bindings.up) {
            Some(NavKey::Up)
        } else if bound(&bindings.down) {
            Some(NavKey::Down)
        } else if bound(&bindings.collapse) {
            Some(NavKey::Left)
        } else if bound(&bindings.expand) {
            Some(NavKey::Right)
        } else {
            None
        }
    }

    /// Resolves a terminal key event through the bindings.
    ///
    /// Releases and chords with modifiers other than Shift are not
    /// navigation.
    pub fn from_key_event(key: &KeyEvent, bindings: &KeyBindings) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return None;
        }
        let name = match key.code {
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::BackTab => "backtab".to_string(),
            KeyCode::Char(c) => c.to_string(),
            _ => return None,
        };
        Self::from_name(&name, bindings)
    }

    pub fn name(self) -> &'static str {
        match self {
            NavKey::Up => "up",
            NavKey::Down => "down",
            NavKey::Left => "left",
            NavKey::Right => "right",
        }
    }
}

/// Named keys compare case-insensitively; single characters keep case so
/// `j` and `J` can be bound separately.
fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.chars().count() == 1 {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Direction of a host-level sibling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingDirection {
    Previous,
    Next,
}

/// The UI layer that owns the runs (e.g. a category list with a flyout).
pub trait RunHost<I> {
    /// Whether a run is currently expanded.
    fn is_expanded(&self) -> bool;

    /// Expands the selected run: opens a session and appends its items.
    ///
    /// Returns false if there is nothing to expand.
    fn expand(&mut self, tracker: &mut SelectionTracker<I>) -> bool;

    /// Collapses the expanded run.
    fn collapse(&mut self, tracker: &mut SelectionTracker<I>);

    /// Moves the host's own selection to a sibling run.
    fn select_sibling(&mut self, direction: SiblingDirection);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was consumed; default handling should be suppressed.
    Handled,
    /// The key is not a navigation key.
    Unhandled,
}

/// Result of dispatching one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUpdate {
    pub outcome: KeyOutcome,
    /// Highlight effects applied to the tracker's items.
    pub effects: Vec<NavEffect>,
}

impl KeyUpdate {
    fn handled() -> Self {
        Self {
            outcome: KeyOutcome::Handled,
            effects: Vec::new(),
        }
    }

    fn unhandled() -> Self {
        Self {
            outcome: KeyOutcome::Unhandled,
            effects: Vec::new(),
        }
    }

    #[must_use]
    fn with_effects(mut self, effects: Vec<NavEffect>) -> Self {
        self.effects = effects;
        self
    }

    pub fn is_handled(&self) -> bool {
        self.outcome == KeyOutcome::Handled
    }
}

/// Routes one navigation key to the tracker or the host.
pub fn dispatch<I, H>(
    key: Option<NavKey>,
    tracker: &mut SelectionTracker<I>,
    host: &mut H,
) -> KeyUpdate
where
    I: Item,
    H: RunHost<I>,
{
    let Some(key) = key else {
        return KeyUpdate::unhandled();
    };

    let expanded = host.is_expanded();
    tracing::debug!(key = key.name(), expanded, "dispatch");

    match (key, expanded) {
        (NavKey::Down, true) => KeyUpdate::handled().with_effects(tracker.move_next()),
        (NavKey::Up, true) => KeyUpdate::handled().with_effects(tracker.move_back()),
        (NavKey::Down, false) => {
            host.select_sibling(SiblingDirection::Next);
            KeyUpdate::handled()
        }
        (NavKey::Up, false) => {
            host.select_sibling(SiblingDirection::Previous);
            KeyUpdate::handled()
        }
        (NavKey::Left, true) => {
            let effects = tracker.exit_run();
            host.collapse(tracker);
            KeyUpdate::handled().with_effects(effects)
        }
        (NavKey::Left, false) => KeyUpdate::handled(),
        (NavKey::Right, _) => {
            if host.expand(tracker) {
                KeyUpdate::handled().with_effects(tracker.enter_run())
            } else {
                KeyUpdate::handled()
            }
        }
    }
}
