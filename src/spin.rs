// ============================================
// src/spin.rs
// Waiting for a spin animation to finish
// ============================================

use std::future::Future;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::WheelError;
use crate::wheel::{LetterWheel, SpinOutcome};

/// How long the wheel animates, and when to stop waiting for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    pub duration_ms: u64,
    /// Upper bound on the wait; the spin completes here even if the animation stalls.
    pub safety_timeout_ms: u64,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            duration_ms: 3_800,
            safety_timeout_ms: 5_000,
        }
    }
}

impl SpinTiming {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.safety_timeout_ms)
    }
}

/// A finished spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settled {
    pub outcome: SpinOutcome,
    /// The animation did not report back before the safety timeout.
    pub timed_out: bool,
}

/// Waits for `animation`, bounded by the safety timeout, then completes the
/// pending spin. Returns `None` if the wheel was not spinning.
pub async fn settle<F>(
    wheel: &mut LetterWheel,
    timing: &SpinTiming,
    animation: F,
) -> Option<Settled>
where
    F: Future<Output = ()>,
{
    let outcome = wheel.pending()?;

    let timed_out = tokio::time::timeout(timing.safety_timeout(), animation)
        .await
        .is_err();
    if timed_out {
        warn!(
            "spin animation did not finish within {}ms, completing anyway",
            timing.safety_timeout_ms
        );
    }

    wheel.complete_spin();
    Some(Settled { outcome, timed_out })
}

/// Spins and waits out the plain animation delay.
pub async fn spin_and_settle(
    wheel: &mut LetterWheel,
    timing: &SpinTiming,
) -> Result<Settled, WheelError> {
    let outcome = wheel.spin()?;
    let settled = settle(wheel, timing, tokio::time::sleep(timing.duration())).await;
    Ok(settled.unwrap_or(Settled {
        outcome,
        timed_out: false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::LetterSet;
    use crate::wheel::SpinConfig;
    use tokio::time::Instant;

    fn wheel() -> LetterWheel {
        LetterWheel::with_seed(LetterSet::default(), SpinConfig::default(), 42).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_after_the_animation_duration() {
        let mut w = wheel();
        let timing = SpinTiming::default();
        let start = Instant::now();

        let settled = spin_and_settle(&mut w, &timing).await.unwrap();

        assert_eq!(start.elapsed(), timing.duration());
        assert!(!settled.timed_out);
        assert!(!w.is_spinning());
        assert_eq!(w.selected_letter(), Some(settled.outcome.letter));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_animation_is_cut_off_by_the_safety_timeout() {
        let mut w = wheel();
        let timing = SpinTiming::default();
        let outcome = w.spin().unwrap();
        let start = Instant::now();

        let settled = settle(&mut w, &timing, std::future::pending::<()>())
            .await
            .unwrap();

        assert_eq!(start.elapsed(), timing.safety_timeout());
        assert!(settled.timed_out);
        assert_eq!(settled.outcome, outcome);
        assert!(!w.is_spinning());
    }

    #[tokio::test(start_paused = true)]
    async fn settling_an_idle_wheel_does_nothing() {
        let mut w = wheel();
        let timing = SpinTiming::default();
        assert!(settle(&mut w, &timing, async {}).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn settles_exactly_once_per_spin() {
        let mut w = wheel();
        let timing = SpinTiming::default();
        let first = w.spin().unwrap();
        // A second request before settling joins the same spin.
        assert_eq!(w.spin().unwrap(), first);

        let settled = settle(&mut w, &timing, async {}).await.unwrap();
        assert_eq!(settled.outcome, first);
        assert!(settle(&mut w, &timing, async {}).await.is_none());
    }
}
