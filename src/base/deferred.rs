//! Deferred, memoized computation cells.
//!
//! A [`Deferred`] wraps one fallible computation that runs at most once for
//! the lifetime of the cell. The first caller computes; concurrent callers
//! block until the outcome is published and then observe the identical
//! value. A failed computation is terminal: every later read returns a
//! clone of the same error, never a silent retry.

use parking_lot::{Condvar, Mutex};

enum State<T, E> {
    Unevaluated,
    Evaluating,
    Evaluated(T),
    Faulted(E),
}

/// A compute-once cell for a fallible computation.
///
/// The cell moves through `Unevaluated → Evaluating → Evaluated | Faulted`;
/// both final states are terminal. The computation itself runs outside the
/// internal lock, so waiters block on a condvar rather than the mutex.
///
/// # Example
///
/// ```
/// use tern_decl::base::Deferred;
///
/// let cell: Deferred<u32, &'static str> = Deferred::new();
/// assert_eq!(cell.force(|| Ok(2 + 2)), Ok(4));
/// // The second closure never runs; the stored result is served.
/// assert_eq!(cell.force(|| Err("unreachable")), Ok(4));
/// ```
pub struct Deferred<T, E> {
    state: Mutex<State<T, E>>,
    ready: Condvar,
}

impl<T, E> Deferred<T, E> {
    /// Create an unevaluated cell. Construction never computes.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Unevaluated),
            ready: Condvar::new(),
        }
    }

    /// Whether the cell has reached a terminal state (evaluated or faulted).
    pub fn is_forced(&self) -> bool {
        matches!(&*self.state.lock(), State::Evaluated(_) | State::Faulted(_))
    }
}

impl<T: Clone, E: Clone> Deferred<T, E> {
    /// Return the memoized outcome, computing it with `compute` on first use.
    ///
    /// If another thread is already computing, this call blocks until that
    /// computation publishes its outcome and returns the same value (or the
    /// same error); `compute` is then never invoked. If the computing
    /// closure unwinds, the cell rolls back to unevaluated and one of the
    /// waiters retries with its own closure; a panic is not memoized.
    pub fn force<F>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        {
            let mut state = self.state.lock();
            loop {
                match &*state {
                    State::Evaluated(value) => return Ok(value.clone()),
                    State::Faulted(error) => return Err(error.clone()),
                    State::Evaluating => self.ready.wait(&mut state),
                    State::Unevaluated => break,
                }
            }
            *state = State::Evaluating;
        }

        let rollback = Rollback { cell: self };
        let outcome = compute();
        std::mem::forget(rollback);

        let mut state = self.state.lock();
        *state = match &outcome {
            Ok(value) => State::Evaluated(value.clone()),
            Err(error) => State::Faulted(error.clone()),
        };
        drop(state);
        self.ready.notify_all();
        outcome
    }

    /// Non-blocking peek at the terminal state, if one has been reached.
    pub fn try_get(&self) -> Option<Result<T, E>> {
        match &*self.state.lock() {
            State::Evaluated(value) => Some(Ok(value.clone())),
            State::Faulted(error) => Some(Err(error.clone())),
            _ => None,
        }
    }
}

impl<T, E> Default for Deferred<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolls an `Evaluating` cell back to `Unevaluated` if the computing
/// closure unwinds, so waiters retry instead of blocking forever.
struct Rollback<'a, T, E> {
    cell: &'a Deferred<T, E>,
}

impl<T, E> Drop for Rollback<'_, T, E> {
    fn drop(&mut self) {
        let mut state = self.cell.state.lock();
        if matches!(*state, State::Evaluating) {
            *state = State::Unevaluated;
        }
        drop(state);
        self.cell.ready.notify_all();
    }
}
