//! Refresh controller.
//!
//! Keeps the displayed quotes consistent with the widget attributes:
//!
//! - an initial fetch at mount, and exactly one fetch whenever the credential
//!   or the symbols change by value;
//! - a repeating timer while auto-refresh is on and both credential and
//!   symbols are set, re-armed whenever one of its governing attributes
//!   changes and cancelled at teardown;
//! - errors caught and turned into a display message, never propagated.
//!
//! Fetches are not gated on `is_loading`, so a timer tick may overlap a fetch
//! started by a config change. Each cycle takes a request number and only the
//! most recently issued one may publish its outcome.
//!
//! The state lives in a `watch` channel: the presentation subscribes to it and
//! re-renders on every change.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use stock_common::{ConfigUpdate, Locale, Message, Ticker, WidgetConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::QuoteApi;
use crate::credentials::CredentialSource;
use crate::observer::ChangeObserver;
use crate::state::WidgetSnapshot;
use crate::timer::RefreshTimer;
use crate::view::WidgetView;

/// Fields whose change triggers a fetch.
#[derive(Debug, Clone, PartialEq)]
struct FetchKey {
    credential: String,
    symbols: Vec<Ticker>,
}

/// Fields whose change re-arms the timer.
#[derive(Debug, Clone, PartialEq)]
struct TimerKey {
    enabled: bool,
    interval: u32,
    fetch: FetchKey,
}

impl TimerKey {
    fn should_arm(&self) -> bool {
        self.enabled && !self.fetch.credential.is_empty() && !self.fetch.symbols.is_empty()
    }
}

fn keys(config: &WidgetConfig) -> (FetchKey, TimerKey) {
    let fetch = FetchKey {
        credential: config.credential.clone(),
        symbols: config.symbols.clone(),
    };
    let timer = TimerKey {
        enabled: config.auto_refresh,
        interval: config.refresh_interval,
        fetch: fetch.clone(),
    };
    (fetch, timer)
}

#[derive(Default)]
struct Observers {
    fetch: ChangeObserver<FetchKey>,
    timer: ChangeObserver<TimerKey>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared<A> {
    api: A,
    locale: Locale,
    credentials: Mutex<Option<Box<dyn CredentialSource>>>,
    view: watch::Sender<WidgetSnapshot>,
    timer: Mutex<Option<RefreshTimer>>,
    observers: Mutex<Observers>,
    latest_request: AtomicU64,
    config_ready: AtomicBool,
    mounted: AtomicBool,
    torn_down: AtomicBool,
}

impl<A: QuoteApi + 'static> Shared<A> {
    fn on_config_ready(&self) -> bool {
        if self.config_ready.swap(true, Ordering::SeqCst) {
            return false;
        }
        let Some(source) = lock(&self.credentials).take() else {
            return false;
        };
        if self.view.borrow().config.has_credential() {
            return false;
        }
        match source.default_credential() {
            Some(credential) => {
                self.view.send_modify(|s| s.config.credential = credential);
                info!("API key populated from the default credential source");
                true
            }
            None => {
                debug!("No default credential available");
                false
            }
        }
    }

    /// Compares the watched fields with their previous snapshot and acts on
    /// whatever changed.
    fn reconcile(self: &Arc<Self>) {
        let refetch = {
            // Held across the read so concurrent updates are observed in order.
            let mut observers = lock(&self.observers);
            let (fetch_key, timer_key) = keys(&self.view.borrow().config);
            observers
                .timer
                .observe_with(timer_key, |key| self.rearm_timer(key));
            observers.fetch.observe(fetch_key)
        };
        if refetch {
            self.spawn_refresh();
        }
    }

    fn rearm_timer(self: &Arc<Self>, key: &TimerKey) {
        let mut timer = lock(&self.timer);
        if let Some(previous) = timer.take() {
            debug!("Cancelling refresh timer ({}s)", previous.period().as_secs());
            previous.cancel();
        }
        if !key.should_arm() {
            return;
        }
        if key.interval == 0 {
            warn!("Refresh interval of 0s, auto-refresh not armed");
            return;
        }

        let weak = Arc::downgrade(self);
        *timer = Some(RefreshTimer::arm(
            Duration::from_secs(u64::from(key.interval)),
            move || match weak.upgrade() {
                Some(shared) if !shared.torn_down.load(Ordering::SeqCst) => {
                    shared.spawn_refresh();
                    true
                }
                _ => false,
            },
        ));
        info!("Auto-refresh armed every {}s", key.interval);
    }

    fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let shared = Arc::clone(self);
        tokio::spawn(async move { shared.refresh().await })
    }

    async fn refresh(&self) {
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }
        let (symbols, credential) = {
            let snapshot = self.view.borrow();
            let config = &snapshot.config;
            if !config.has_credential() || !config.has_symbols() {
                debug!("Refresh skipped: API key or symbols missing");
                return;
            }
            (config.symbols.clone(), config.credential.clone())
        };

        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_modify(|s| {
            s.state.is_loading = true;
            s.state.last_error = None;
        });
        // Runs on every exit path, including this future being dropped.
        let _loading = scopeguard::guard((), |()| self.finish(request));

        debug!("Fetching quotes for {:?} (request #{})", symbols, request);
        let outcome = self.api.fetch_quotes(&symbols, &credential).await;

        if self.torn_down.load(Ordering::SeqCst) {
            debug!("Discarding response #{}: widget torn down", request);
            return;
        }
        if self.latest_request.load(Ordering::SeqCst) != request {
            debug!("Discarding superseded response #{}", request);
            return;
        }

        match outcome {
            Ok(quotes) => {
                let now = Utc::now();
                info!("Fetched {} quotes (request #{})", quotes.len(), request);
                self.view.send_modify(|s| {
                    s.quotes = quotes;
                    s.state.last_updated_at = Some(now);
                    s.state.is_loading = false;
                });
            }
            Err(e) => {
                let message = e
                    .message()
                    .unwrap_or_else(|| self.locale.text(Message::FetchFailed).to_string());
                warn!("Failed to fetch quotes (request #{}): {}", request, message);
                self.view.send_modify(|s| {
                    s.state.last_error = Some(message);
                    s.state.is_loading = false;
                });
            }
        }
    }

    fn finish(&self, request: u64) {
        if self.latest_request.load(Ordering::SeqCst) != request {
            return;
        }
        self.view.send_if_modified(|s| {
            let was_loading = s.state.is_loading;
            s.state.is_loading = false;
            was_loading
        });
    }

    fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(timer) = lock(&self.timer).take() {
            timer.cancel();
        }
        info!("Widget torn down");
    }
}

/// Builder of a [`RefreshController`].
pub struct ControllerBuilder<A> {
    api: A,
    config: WidgetConfig,
    locale: Locale,
    credentials: Option<Box<dyn CredentialSource>>,
}

impl<A: QuoteApi + 'static> ControllerBuilder<A> {
    /// Initial attributes, as stored with the document.
    pub fn config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }

    /// Source of a default API key, read once at mount if none is set.
    pub fn credential_source(mut self, source: impl CredentialSource + 'static) -> Self {
        self.credentials = Some(Box::new(source));
        self
    }

    /// Language of the fallback error message.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Creates the controller. Nothing is fetched before [`RefreshController::mount`].
    pub fn build(self) -> RefreshController<A> {
        let (view, _) = watch::channel(WidgetSnapshot {
            config: self.config,
            ..Default::default()
        });
        RefreshController {
            shared: Arc::new(Shared {
                api: self.api,
                locale: self.locale,
                credentials: Mutex::new(self.credentials),
                view,
                timer: Mutex::new(None),
                observers: Mutex::new(Observers::default()),
                latest_request: AtomicU64::new(0),
                config_ready: AtomicBool::new(false),
                mounted: AtomicBool::new(false),
                torn_down: AtomicBool::new(false),
            }),
        }
    }
}

/// Fetch and timer lifecycle of one widget instance.
///
/// `mount`, `update` and `retry` spawn tasks and must be called from within a
/// Tokio runtime. Dropping the controller tears the widget down.
pub struct RefreshController<A: QuoteApi + 'static> {
    shared: Arc<Shared<A>>,
}

impl<A: QuoteApi + 'static> RefreshController<A> {
    /// Starts building a controller around `api`.
    pub fn builder(api: A) -> ControllerBuilder<A> {
        ControllerBuilder {
            api,
            config: WidgetConfig::default(),
            locale: Locale::default(),
            credentials: None,
        }
    }

    /// Shorthand for a controller without a default credential source.
    pub fn new(api: A, config: WidgetConfig) -> Self {
        Self::builder(api).config(config).build()
    }

    /// Fills in the default API key if the author has not set one.
    ///
    /// Runs at most once per instance; later calls return `false`. Returns
    /// `true` if the credential was written.
    pub fn on_config_ready(&self) -> bool {
        self.shared.on_config_ready()
    }

    /// First mount: resolves the credential, fetches and arms auto-refresh.
    /// Later calls do nothing.
    pub fn mount(&self) {
        if self.shared.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.on_config_ready();
        self.shared.reconcile();
    }

    /// Applies an attribute change from the settings form.
    ///
    /// Updates are trusted as they are; the settings form validates them.
    pub fn update(&self, update: ConfigUpdate) {
        if self.shared.torn_down.load(Ordering::SeqCst) {
            warn!("Ignoring settings update on a torn down widget");
            return;
        }
        if update.is_empty() {
            return;
        }
        self.shared.view.send_modify(|s| s.config.apply(update));
        if self.shared.mounted.load(Ordering::SeqCst) {
            self.shared.reconcile();
        }
    }

    /// Runs one fetch cycle. Resolves immediately if the API key or the symbols
    /// are missing.
    pub async fn refresh(&self) {
        self.shared.refresh().await
    }

    /// Retry action of the error view: runs a fetch cycle in the background.
    pub fn retry(&self) -> JoinHandle<()> {
        self.shared.spawn_refresh()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot> {
        self.shared.view.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> WidgetSnapshot {
        self.shared.view.borrow().clone()
    }

    /// Current attributes, including a populated default credential.
    pub fn config(&self) -> WidgetConfig {
        self.shared.view.borrow().config.clone()
    }

    /// What the presentation should draw right now.
    pub fn view(&self) -> WidgetView {
        WidgetView::from_snapshot(&self.shared.view.borrow())
    }

    /// `true` while an auto-refresh timer is armed.
    pub fn has_timer(&self) -> bool {
        lock(&self.shared.timer).is_some()
    }

    /// Cancels the timer; responses still in flight are discarded.
    pub fn unmount(&self) {
        self.shared.teardown();
    }
}

impl<A: QuoteApi + 'static> Drop for RefreshController<A> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}
