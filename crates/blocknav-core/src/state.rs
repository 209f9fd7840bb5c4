//! Navigation state.
//!
//! `NavState` is the pure bookkeeping behind a `SelectionTracker`:
//! - session flag (`open`)
//! - run boundary (`run_start`) and total list length (`list_len`)
//! - cursor (`current`, `previous`)
//!
//! ## Runs
//!
//! ```text
//!   0            run_start                list_len
//!   |  stale tail    |   current run          |
//!   [b0 b1 b2 b3 b4  | b5 b6 b7 b8           ]
//! ```
//!
//! The list only grows. Opening a session moves `run_start` to the end of
//! the list; items appended afterwards form the current run. Items before
//! `run_start` belong to closed runs and are never targeted by an effect.
//!
//! Cursor indices are signed: after a backward step onto the first item of
//! a run starting at 0, `current` is -1.

/// Structural regime of the current run, classified once per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunShape {
    /// Nothing to select; every move is a no-op.
    Empty,
    /// One item; it stays selected whatever the direction.
    Single,
    /// Two items; every move flips to the other one.
    Pair,
    /// Three or more items; wraparound and direction reversal apply.
    General,
}

impl RunShape {
    pub fn classify(run_len: usize) -> Self {
        match run_len {
            0 => RunShape::Empty,
            1 => RunShape::Single,
            2 => RunShape::Pair,
            _ => RunShape::General,
        }
    }
}

/// Index pair driving traversal.
///
/// `current` is the index the next move starts from; `previous` is the
/// index that was selected by the last move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub current: isize,
    pub previous: isize,
}

impl Cursor {
    pub fn new(current: isize, previous: isize) -> Self {
        Self { current, previous }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    open: bool,
    run_start: usize,
    list_len: usize,
    cursor: Cursor,
    sessions: u64,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn run_start(&self) -> usize {
        self.run_start
    }

    pub fn list_len(&self) -> usize {
        self.list_len
    }

    pub fn run_len(&self) -> usize {
        self.list_len - self.run_start
    }

    pub fn shape(&self) -> RunShape {
        RunShape::classify(self.run_len())
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of sessions opened so far.
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// Whether `index` lies inside the current run.
    pub fn in_run(&self, index: usize) -> bool {
        (self.run_start..self.list_len).contains(&index)
    }

    /// Opens a new session whose run starts at the current end of the list.
    ///
    /// The cursor is reset onto the new run start. On the very first session
    /// this is the initial `(0, 0)` cursor.
    pub fn open_session(&mut self) {
        self.open = true;
        self.run_start = self.list_len;
        let start = self.start();
        self.cursor = Cursor::new(start, start);
        self.sessions += 1;
    }

    /// Records one appended item.
    pub fn push_item(&mut self) {
        self.list_len += 1;
    }

    pub fn close_session(&mut self) {
        self.open = false;
    }

    pub(crate) fn start(&self) -> isize {
        self.run_start as isize
    }

    pub(crate) fn end(&self) -> isize {
        self.list_len as isize
    }

    pub(crate) fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Pulls the cursor back into the range a general move can start from.
    ///
    /// `current` may sit one below the run start or one past the end;
    /// `previous` must name an item of the run. Returns true if anything
    /// had to change.
    pub(crate) fn clamp_cursor(&mut self) -> bool {
        let start = self.start();
        let last = (self.end() - 1).max(start);
        let clamped = Cursor::new(
            self.cursor.current.clamp(start - 1, self.end()),
            self.cursor.previous.clamp(start, last),
        );
        if clamped == self.cursor {
            return false;
        }
        tracing::warn!(
            before = ?self.cursor,
            after = ?clamped,
            run_start = self.run_start,
            list_len = self.list_len,
            "cursor outside current run, clamping"
        );
        self.cursor = clamped;
        true
    }

    #[cfg(test)]
    pub(crate) fn with_cursor(mut self, current: isize, previous: isize) -> Self {
        self.cursor = Cursor::new(current, previous);
        self
    }
}
