//! Explicitly constructed state container.
//!
//! There is no process-wide singleton: a `Store` is built with its initial
//! state and reducer, and handed by reference to whoever needs it. Dispatch
//! runs the reducer to completion and then notifies every subscriber with the
//! new state — the single-writer discipline means no locking is needed within
//! one state tree.

/// Pure transition function: same (state, action) always yields the same state.
pub type Reducer<S, A> = fn(&S, &A) -> S;

/// Subscriber callback invoked after every dispatch.
pub type Subscriber<S> = Box<dyn FnMut(&S) + Send>;

/// A single-writer state container with an explicit subscription list.
pub struct Store<S, A> {
    state: S,
    reducer: Reducer<S, A>,
    subscribers: Vec<Subscriber<S>>,
}

impl<S, A> Store<S, A> {
    pub fn new(initial: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state: initial,
            reducer,
            subscribers: Vec::new(),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Runs the reducer and notifies subscribers with the new state.
    pub fn dispatch(&mut self, action: A) {
        self.state = (self.reducer)(&self.state, &action);
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }

    /// Registers a callback to run after every dispatch.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
