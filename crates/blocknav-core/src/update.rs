//! Selection transitions (the reducer).
//!
//! Each movement function takes the `NavState`, updates its cursor, and
//! returns the highlight effects the tracker must apply, in order.
//! Nothing here touches an item.
//!
//! The run shape is classified once per call and dispatched:
//!
//! | shape     | forward / backward                                   |
//! |-----------|------------------------------------------------------|
//! | `Empty`   | no-op                                                |
//! | `Single`  | reselect the only item, cursor pinned at run start   |
//! | `Pair`    | flip between the two items                           |
//! | `General` | step with wraparound and direction-reversal handling |
//!
//! Movement is a no-op while the session is closed: key events can still
//! arrive after the run was dismissed.

use crate::effects::NavEffect;
use crate::state::{Cursor, NavState, RunShape};

/// Effect buffer used while a transition runs.
#[derive(Debug, Default)]
struct Effects(Vec<NavEffect>);

impl Effects {
    fn select(&mut self, index: isize) {
        if let Ok(index) = usize::try_from(index) {
            self.0.push(NavEffect::Select(index));
        }
    }

    fn deselect(&mut self, index: isize) {
        if let Ok(index) = usize::try_from(index) {
            self.0.push(NavEffect::Deselect(index));
        }
    }
}

/// Moves the selection one item forward within the current run.
pub fn move_next(state: &mut NavState) -> Vec<NavEffect> {
    transition(state, Direction::Forward)
}

/// Moves the selection one item backward within the current run.
pub fn move_back(state: &mut NavState) -> Vec<NavEffect> {
    transition(state, Direction::Backward)
}

/// Selects the first item of a freshly entered run.
///
/// This is a forward move from the run start. In a two-item run that move
/// lands on the second item, so a backward move follows to bring the
/// highlight back to the first one.
pub fn enter_run(state: &mut NavState) -> Vec<NavEffect> {
    let mut effects = move_next(state);
    if state.is_open() && state.shape() == RunShape::Pair {
        effects.extend(move_back(state));
    }
    effects
}

/// Clears the highlight left on the run when leaving it.
///
/// The cursor is untouched.
pub fn exit_run(state: &mut NavState) -> Vec<NavEffect> {
    if !state.is_open() || state.shape() == RunShape::Empty {
        return Vec::new();
    }
    match usize::try_from(state.cursor().previous) {
        Ok(previous) if state.in_run(previous) => vec![NavEffect::Deselect(previous)],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

fn transition(state: &mut NavState, direction: Direction) -> Vec<NavEffect> {
    if !state.is_open() {
        tracing::debug!(?direction, "session closed, ignoring move");
        return Vec::new();
    }

    let before = state.cursor();
    let shape = state.shape();
    let mut fx = Effects::default();
    match (shape, direction) {
        (RunShape::Empty, _) => {}
        (RunShape::Single, _) => reselect_single(state, &mut fx),
        (RunShape::Pair, Direction::Forward) => next_in_pair(state, &mut fx),
        (RunShape::Pair, Direction::Backward) => back_in_pair(state, &mut fx),
        (RunShape::General, Direction::Forward) => {
            state.clamp_cursor();
            next_in_run(state, &mut fx);
        }
        (RunShape::General, Direction::Backward) => {
            state.clamp_cursor();
            back_in_run(state, &mut fx);
        }
    }

    tracing::debug!(
        ?direction,
        ?shape,
        ?before,
        after = ?state.cursor(),
        effects = fx.0.len(),
        "move"
    );
    fx.0
}

fn reselect_single(state: &mut NavState, fx: &mut Effects) {
    let start = state.start();
    fx.select(start);
    state.set_cursor(Cursor::new(start, start));
}

fn next_in_pair(state: &mut NavState, fx: &mut Effects) {
    let top = state.start();
    let bottom = state.end() - 1;

    // Bottom (or past it) flips to the top, anything else to the bottom.
    let (to, from) = if state.cursor().current >= bottom {
        (top, bottom)
    } else {
        (bottom, top)
    };
    fx.select(to);
    fx.deselect(from);
    state.set_cursor(Cursor::new(to, to));
}

fn back_in_pair(state: &mut NavState, fx: &mut Effects) {
    let top = state.start();
    let bottom = state.end() - 1;
    let current = state.cursor().current;

    let (to, from) = if current == bottom {
        (top, bottom)
    } else if current == top {
        (bottom, top)
    } else {
        return;
    };
    fx.select(to);
    fx.deselect(from);
    state.set_cursor(Cursor::new(to, to));
}

fn next_in_run(state: &mut NavState, fx: &mut Effects) {
    let start = state.start();
    let end = state.end();
    let Cursor {
        mut current,
        mut previous,
    } = state.cursor();

    // Undo the highlight left by the previous forward step.
    if current > start {
        fx.deselect(current - 1);
    }

    // Past the last item, or about to turn around on it.
    let wraps = current >= end || (previous == current + 1 && current + 2 >= end);
    if wraps {
        current = start;
        previous = end - 1;
        fx.deselect(previous);
    }

    // Last move went backward: skip over the item being left.
    if previous == current + 1 {
        fx.deselect(previous);
        current += 2;
    }

    fx.select(current);
    state.set_cursor(Cursor::new(current + 1, current));
}

fn back_in_run(state: &mut NavState, fx: &mut Effects) {
    let start = state.start();
    let end = state.end();
    let Cursor {
        mut current,
        mut previous,
    } = state.cursor();

    // The highlight on the second item is left for the reversal step below.
    let second_of_run = current != start && previous == start + 1;
    if !second_of_run {
        fx.deselect(previous);
    }

    // Above the run start, or turning around on the first item.
    let loops_up = current < start || (current - 2 < start && previous == current - 1);
    if loops_up {
        previous = start;
        current = end - 1;
        fx.deselect(previous);
    }

    // Last move went forward: skip over the item being left.
    if previous == current - 1 && current > start {
        fx.deselect(previous);
        current -= 2;
    }

    fx.select(current);
    state.set_cursor(Cursor::new(current - 1, current));
}
