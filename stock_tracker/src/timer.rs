//! Repeating refresh timer.
//!
//! A [`RefreshTimer`] is the handle of an armed timer: as long as it lives the
//! tick callback runs once per period, and dropping it cancels the timer. The
//! controller always drops the previous handle before arming a new one, so at
//! most one timer is live per widget.

use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle of an armed repeating timer.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: JoinHandle<()>,
    period: Duration,
}

impl RefreshTimer {
    /// Arms a timer calling `on_tick` every `period`, the first time one full
    /// period from now. The timer stops by itself once `on_tick` returns `false`.
    ///
    /// Must be called from within a Tokio runtime. `period` must be non-zero.
    pub fn arm(period: Duration, mut on_tick: impl FnMut() -> bool + Send + 'static) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    debug!("Refresh timer stopped by its callback");
                    break;
                }
            }
        });
        Self { handle, period }
    }

    /// Period between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Cancels the timer. On a current-thread runtime no tick runs after this
    /// returns; on a multi-thread runtime a tick already running on another
    /// worker still completes.
    pub fn cancel(self) {}

    /// `true` once the tick task is gone.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_timer(period: Duration) -> (RefreshTimer, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let timer = RefreshTimer::arm(period, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        (timer, ticks)
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_one_period_after_arming() {
        let (timer, ticks) = counting_timer(Duration::from_secs(5));
        time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert_eq!(timer.period(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (timer, ticks) = counting_timer(Duration::from_secs(1));
        time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        timer.cancel();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_returning_false_ends_the_timer() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let timer = RefreshTimer::arm(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst) + 1 < 3
        });
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(timer.is_finished());
    }
}
