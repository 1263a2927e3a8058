//! Debounced search over the product cache
//!
//! Keystrokes update the raw text immediately. The cache subscription only
//! moves to the new search identity once the text has been quiet for the
//! debounce delay, so a burst of typing issues at most one search.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cache::{ProductCache, ProductData, ProductQuery, Snapshot, Subscription};

/// Quiet period before typed text becomes the active query
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

type Callback = Arc<dyn Fn(&Snapshot<ProductData>) + Send + Sync>;

struct State {
    raw: String,
    committed: String,
    subscription: Option<Subscription<ProductQuery>>,
    timer: Option<JoinHandle<()>>,
    /// Bumped on every keystroke; a timer only commits its own keystroke
    seq: u64,
    closed: bool,
}

struct Shared {
    cache: ProductCache,
    delay: Duration,
    callback: Callback,
    state: Mutex<State>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self, query: ProductQuery) -> Subscription<ProductQuery> {
        let callback = Arc::clone(&self.callback);
        self.cache.subscribe(query, move |snapshot| callback(snapshot))
    }

    /// Make the raw text the active query, if `seq` is still the latest input.
    fn commit(&self, seq: Option<u64>) {
        let (previous, query) = {
            let mut state = self.state();
            if state.closed || seq.is_some_and(|seq| seq != state.seq) {
                return;
            }
            state.timer = None;
            state.committed = state.raw.clone();

            let query = ProductQuery::search(&state.committed);
            if state.subscription.as_ref().map(Subscription::key) == Some(&query) {
                return;
            }
            (state.subscription.take(), query)
        };

        log::debug!("Search committed: {}", query);
        if let Some(previous) = previous {
            self.cache.unsubscribe(previous);
        }
        let subscription = self.subscribe(query);

        let mut state = self.state();
        if state.closed {
            drop(state);
            self.cache.unsubscribe(subscription);
        } else {
            state.subscription = Some(subscription);
        }
    }
}

/// Search box state bound to a product cache.
///
/// Starts out subscribed to the full product list. Dropping the debouncer
/// cancels any pending commit and releases its subscription.
pub struct SearchDebouncer {
    shared: Arc<Shared>,
}

impl SearchDebouncer {
    /// Create a debouncer that reports every snapshot of the active query to
    /// `callback`.
    pub fn new<F>(cache: ProductCache, delay: Duration, callback: F) -> Self
    where
        F: Fn(&Snapshot<ProductData>) + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            cache,
            delay,
            callback: Arc::new(callback),
            state: Mutex::new(State {
                raw: String::new(),
                committed: String::new(),
                subscription: None,
                timer: None,
                seq: 0,
                closed: false,
            }),
        });
        let subscription = shared.subscribe(ProductQuery::All);
        shared.state().subscription = Some(subscription);
        Self { shared }
    }

    /// Record a keystroke and restart the debounce timer.
    pub fn input(&self, text: impl Into<String>) {
        let mut state = self.shared.state();
        if state.closed {
            return;
        }
        state.raw = text.into();
        state.seq += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let seq = state.seq;
        let delay = self.shared.delay;
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.commit(Some(seq));
            }
        }));
    }

    /// Commit the raw text now instead of waiting for the timer.
    pub fn flush(&self) {
        if let Some(timer) = self.shared.state().timer.take() {
            timer.abort();
        }
        self.shared.commit(None);
    }

    /// Text as typed
    pub fn raw(&self) -> String {
        self.shared.state().raw.clone()
    }

    /// Text the active query was built from
    pub fn committed(&self) -> String {
        self.shared.state().committed.clone()
    }

    /// Identity currently subscribed to
    pub fn query(&self) -> Option<ProductQuery> {
        self.shared
            .state()
            .subscription
            .as_ref()
            .map(|subscription| subscription.key().clone())
    }

    /// Latest snapshot of the active query
    pub fn snapshot(&self) -> Snapshot<ProductData> {
        let query = self.query().unwrap_or(ProductQuery::All);
        self.shared.cache.snapshot(&query)
    }

    /// Cancel the pending commit and drop the subscription.
    pub fn close(&self) {
        let subscription = {
            let mut state = self.shared.state();
            state.closed = true;
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.subscription.take()
        };
        if let Some(subscription) = subscription {
            self.shared.cache.unsubscribe(subscription);
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.close();
    }
}
