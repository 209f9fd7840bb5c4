//! Selection tracker - owns the item list and executes highlight effects.
//!
//! This is the runtime side of the reducer split: `update` decides which
//! items change, the tracker calls `select`/`deselect` on them.
//!
//! Items are handles owned by the host (`Rc<T>`, `Arc<T>`, `&T`); the
//! tracker never creates or destroys the underlying elements.

use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use crate::effects::NavEffect;
use crate::state::NavState;
use crate::update;

/// A selectable element.
///
/// Both operations must be idempotent and purely visual.
pub trait Item {
    fn select(&self);
    fn deselect(&self);
}

impl<T: Item + ?Sized> Item for &T {
    fn select(&self) {
        (**self).select();
    }

    fn deselect(&self) {
        (**self).deselect();
    }
}

impl<T: Item + ?Sized> Item for Rc<T> {
    fn select(&self) {
        (**self).select();
    }

    fn deselect(&self) {
        (**self).deselect();
    }
}

impl<T: Item + ?Sized> Item for Arc<T> {
    fn select(&self) {
        (**self).select();
    }

    fn deselect(&self) {
        (**self).deselect();
    }
}

/// Keyboard selection over an append-only list split into session runs.
#[derive(Debug)]
pub struct SelectionTracker<I> {
    items: Vec<I>,
    state: NavState,
    /// Index whose highlight was applied last and not cleared since.
    selected: Option<usize>,
}

impl<I> Default for SelectionTracker<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: NavState::new(),
            selected: None,
        }
    }
}

impl<I: Item> SelectionTracker<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run at the current end of the list.
    ///
    /// A highlight left on an earlier run is forgotten, not cleared.
    pub fn open_session(&mut self) {
        self.state.open_session();
        self.selected = None;
        tracing::debug!(
            run_start = self.state.run_start(),
            session = self.state.sessions(),
            "session opened"
        );
    }

    /// Appends an item to the current run. The cursor is untouched.
    pub fn append_item(&mut self, item: I) {
        self.items.push(item);
        self.state.push_item();
    }

    pub fn close_session(&mut self) {
        self.state.close_session();
        tracing::debug!(run_len = self.state.run_len(), "session closed");
    }

    pub fn move_next(&mut self) -> Vec<NavEffect> {
        let effects = update::move_next(&mut self.state);
        self.apply(effects)
    }

    pub fn move_back(&mut self) -> Vec<NavEffect> {
        let effects = update::move_back(&mut self.state);
        self.apply(effects)
    }

    /// Highlights the first item of the run (see [`update::enter_run`]).
    pub fn enter_run(&mut self) -> Vec<NavEffect> {
        let effects = update::enter_run(&mut self.state);
        self.apply(effects)
    }

    /// Clears the run's highlight, keeping the cursor where it was.
    pub fn exit_run(&mut self) -> Vec<NavEffect> {
        let effects = update::exit_run(&mut self.state);
        self.apply(effects)
    }

    /// Executes effects in order and returns the ones that were applied.
    ///
    /// Effects outside the current run are dropped.
    fn apply(&mut self, effects: Vec<NavEffect>) -> Vec<NavEffect> {
        let mut applied = Vec::with_capacity(effects.len());
        for effect in effects {
            let index = effect.index();
            let in_run = self.state.in_run(index) && index < self.items.len();
            debug_assert!(in_run, "effect {effect:?} outside current run");
            if !in_run {
                tracing::warn!(
                    ?effect,
                    run_start = self.state.run_start(),
                    list_len = self.items.len(),
                    "dropping effect outside current run"
                );
                continue;
            }
            let item = &self.items[index];
            match effect {
                NavEffect::Select(_) => {
                    item.select();
                    self.selected = Some(index);
                }
                NavEffect::Deselect(_) => {
                    item.deselect();
                    if self.selected == Some(index) {
                        self.selected = None;
                    }
                }
            }
            tracing::trace!(%effect, "applied");
            applied.push(effect);
        }
        applied
    }
}

impl<I> SelectionTracker<I> {
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// The highlighted item, if any.
    pub fn selected_item(&self) -> Option<&I> {
        self.selected.and_then(|index| self.items.get(index))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn run_start(&self) -> usize {
        self.state.run_start()
    }

    pub fn run_len(&self) -> usize {
        self.state.run_len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item ever appended, stale runs included.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Items of the current run.
    pub fn run_items(&self) -> &[I] {
        &self.items[self.state.run_start()..]
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }
}

/// Tracker shared between threads.
///
/// Every operation runs under one lock, so a move is never interleaved with
/// another.
#[derive(Debug)]
pub struct SharedTracker<I>(Arc<Mutex<SelectionTracker<I>>>);

impl<I> Clone for SharedTracker<I> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<I: Item> Default for SharedTracker<I> {
    fn default() -> Self {
        Self::new(SelectionTracker::new())
    }
}

impl<I: Item> SharedTracker<I> {
    pub fn new(tracker: SelectionTracker<I>) -> Self {
        Self(Arc::new(Mutex::new(tracker)))
    }

    /// Runs `f` with exclusive access to the tracker.
    ///
    /// A poisoned lock is recovered; the worst outcome of a half-applied move
    /// is a wrong highlight.
    pub fn with<R>(&self, f: impl FnOnce(&mut SelectionTracker<I>) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    /// Item that records its calls into a shared log.
    #[derive(Debug)]
    struct Probe {
        id: usize,
        on: Cell<bool>,
        log: Rc<RefCell<Vec<(usize, bool)>>>,
    }

    impl Item for Probe {
        fn select(&self) {
            self.on.set(true);
            self.log.borrow_mut().push((self.id, true));
        }

        fn deselect(&self) {
            self.on.set(false);
            self.log.borrow_mut().push((self.id, false));
        }
    }

    struct Fixture {
        tracker: SelectionTracker<Rc<Probe>>,
        probes: Vec<Rc<Probe>>,
        log: Rc<RefCell<Vec<(usize, bool)>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tracker: SelectionTracker::new(),
                probes: Vec::new(),
                log: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn open(&mut self, len: usize) {
            self.tracker.close_session();
            self.tracker.open_session();
            for _ in 0..len {
                let probe = Rc::new(Probe {
                    id: self.probes.len(),
                    on: Cell::new(false),
                    log: Rc::clone(&self.log),
                });
                self.probes.push(Rc::clone(&probe));
                self.tracker.append_item(probe);
            }
        }

        fn lit(&self) -> Vec<usize> {
            self.probes
                .iter()
                .filter(|probe| probe.on.get())
                .map(|probe| probe.id)
                .collect()
        }

        fn selected_id(&self) -> Option<usize> {
            self.tracker.selected_item().map(|probe| probe.id)
        }
    }

    #[test]
    fn test_new_tracker_is_closed_and_empty() {
        let tracker: SelectionTracker<Rc<Probe>> = SelectionTracker::new();
        assert!(!tracker.is_open());
        assert!(tracker.is_empty());
        assert!(tracker.selected_item().is_none());
    }

    #[test]
    fn test_five_item_walk_and_wrap() {
        let mut fx = Fixture::new();
        fx.open(5);

        for expected in 0..5 {
            fx.tracker.move_next();
            assert_eq!(fx.lit(), vec![expected]);
            assert_eq!(fx.selected_id(), Some(expected));
        }

        fx.log.borrow_mut().clear();
        fx.tracker.move_next();
        assert_eq!(fx.lit(), vec![0]);
        assert!(fx.log.borrow().contains(&(4, false)));
        assert_eq!(fx.log.borrow().last(), Some(&(0, true)));
    }

    #[test]
    fn test_pair_enter_then_toggle() {
        let mut fx = Fixture::new();
        fx.open(2);

        fx.tracker.enter_run();
        assert_eq!(fx.lit(), vec![0]);
        assert_eq!(fx.selected_id(), Some(0));

        fx.tracker.move_next();
        assert_eq!(fx.lit(), vec![1]);
        assert_eq!(fx.selected_id(), Some(1));

        fx.tracker.move_next();
        assert_eq!(fx.lit(), vec![0]);
        assert_eq!(fx.selected_id(), Some(0));
    }

    #[test]
    fn test_single_item_never_touches_others() {
        let mut fx = Fixture::new();
        fx.open(3);
        fx.tracker.enter_run();
        fx.tracker.exit_run();
        fx.open(1);
        fx.log.borrow_mut().clear();

        fx.tracker.move_next();
        fx.tracker.move_back();
        fx.tracker.move_back();

        assert_eq!(fx.lit(), vec![3]);
        assert!(fx.log.borrow().iter().all(|&(id, _)| id == 3));
        assert_eq!(fx.selected_id(), Some(3));
    }

    #[test]
    fn test_reversal_at_third_item() {
        let mut fx = Fixture::new();
        fx.open(5);
        fx.tracker.move_next();
        fx.tracker.move_next();
        fx.tracker.move_next();
        assert_eq!(fx.selected_id(), Some(2));

        fx.tracker.move_back();
        assert_eq!(fx.lit(), vec![1]);
        assert_eq!(fx.selected_id(), Some(1));
    }

    #[test]
    fn test_new_session_isolates_stale_items() {
        let mut fx = Fixture::new();
        fx.open(4);
        fx.tracker.enter_run();
        fx.tracker.move_back();
        assert_eq!(fx.lit(), vec![3]);
        fx.tracker.exit_run();
        assert!(fx.lit().is_empty());

        fx.open(3);
        fx.log.borrow_mut().clear();
        fx.tracker.enter_run();
        fx.tracker.move_back();
        fx.tracker.move_back();
        fx.tracker.move_next();
        fx.tracker.exit_run();

        assert!(fx.log.borrow().iter().all(|&(id, _)| id >= 4));
        assert_eq!(fx.tracker.run_start(), 4);
        assert_eq!(fx.tracker.run_items().len(), 3);
        assert_eq!(fx.tracker.items().len(), 7);
    }

    #[test]
    fn test_moves_ignored_after_close() {
        let mut fx = Fixture::new();
        fx.open(3);
        fx.tracker.enter_run();
        fx.tracker.close_session();
        fx.log.borrow_mut().clear();

        assert!(fx.tracker.move_next().is_empty());
        assert!(fx.tracker.move_back().is_empty());
        assert!(fx.log.borrow().is_empty());
        // The closed run is still the latest one until another opens.
        assert_eq!(fx.selected_id(), Some(0));
    }

    #[test]
    fn test_new_session_forgets_previous_selection() {
        let mut fx = Fixture::new();
        fx.open(4);
        fx.tracker.enter_run();
        assert_eq!(fx.selected_id(), Some(0));

        fx.open(3);
        assert_eq!(fx.tracker.run_start(), 4);
        assert_eq!(fx.tracker.state().list_len(), 7);
        assert!(fx.tracker.selected_item().is_none());
        assert!(fx.tracker.selected_index().is_none());

        fx.tracker.enter_run();
        assert_eq!(fx.tracker.selected_index(), Some(4));
    }

    #[test]
    fn test_exit_run_clears_selection() {
        let mut fx = Fixture::new();
        fx.open(4);
        fx.tracker.enter_run();
        fx.tracker.move_next();

        let effects = fx.tracker.exit_run();
        assert_eq!(effects, vec![NavEffect::Deselect(1)]);
        assert!(fx.lit().is_empty());
        assert!(fx.tracker.selected_item().is_none());
    }

    #[test]
    fn test_shared_tracker_serializes_moves() {
        #[derive(Debug, Default)]
        struct Flag(AtomicBool);

        impl Item for Flag {
            fn select(&self) {
                self.0.store(true, Ordering::SeqCst);
            }

            fn deselect(&self) {
                self.0.store(false, Ordering::SeqCst);
            }
        }

        let flags: Vec<Arc<Flag>> = (0..6).map(|_| Arc::new(Flag::default())).collect();
        let shared = SharedTracker::default();
        shared.with(|tracker| {
            tracker.open_session();
            for flag in &flags {
                tracker.append_item(Arc::clone(flag));
            }
            tracker.enter_run();
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..6 {
                        shared.with(SelectionTracker::move_next);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 24 forward moves over six items is a whole number of cycles.
        let lit: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, flag)| flag.0.load(Ordering::SeqCst))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![0]);
        assert_eq!(shared.with(|tracker| tracker.selected_index()), Some(0));
    }
}
