//! Self-re-arming periodic tasks.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// What a tick wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Fire again after another period.
    Continue,
    /// Disarm.
    Stop,
}

/// Outcome of a ticker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// A tick returned [`TickControl::Stop`].
    Stopped,
    /// The cancellation token fired.
    Cancelled,
}

/// Call `tick` every `period`, first after one full period, until it asks
/// to stop or `cancel` fires.
pub async fn run_ticker(
    period: Duration,
    cancel: CancellationToken,
    mut tick: impl FnMut() -> TickControl,
) -> TickerExit {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if tick() == TickControl::Stop {
                    return TickerExit::Stopped;
                }
            }
            () = cancel.cancelled() => return TickerExit::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let cancel = CancellationToken::new();
        let fired = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = fired.clone();
        let handle = tokio::spawn(run_ticker(Duration::from_secs(5), cancel.clone(), move || {
            let _ = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            TickControl::Continue
        }));

        time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 1);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 3);

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), TickerExit::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_disarms() {
        let mut remaining = 2;
        let exit = run_ticker(Duration::from_secs(1), CancellationToken::new(), || {
            remaining -= 1;
            if remaining == 0 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        })
        .await;
        assert_eq!(exit, TickerExit::Stopped);
        assert_eq!(remaining, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_tick() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let exit = run_ticker(Duration::from_secs(1), cancel, || {
            panic!("tick after cancel")
        })
        .await;
        assert_eq!(exit, TickerExit::Cancelled);
    }
}
