//! # Animation driver
//!
//! The shared [`EpochClock`] and the [`AnimationDriver`] that advances it.
//!
//! The epoch lives in a `tokio::sync::watch` channel: every update replaces the value
//! atomically after clamping it to the supported range, and every subscriber sees a
//! change notification it can turn into a redraw.
//!
//! Playback runs as one tokio task at a time. Each cycle sleeps for the cadence and
//! then advances the clock by one time step; the sleep is raced against a cancel
//! flag, so stopping never applies a step that was still pending.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::orbitview_errors::OrbitViewError;
use crate::time::{Direction, Epoch, TimeDelta, TimeStep};

/// Default delay between two playback steps.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(50);

/// Current epoch, shared between the host, the renderer and the playback task.
#[derive(Debug)]
pub struct EpochClock {
    sender: watch::Sender<Epoch>,
}

impl EpochClock {
    pub fn new(initial: Epoch) -> Self {
        let (sender, _) = watch::channel(initial.clamp_to_supported());
        EpochClock { sender }
    }

    pub fn current(&self) -> Epoch {
        *self.sender.borrow()
    }

    /// Receiver notified after every update.
    pub fn subscribe(&self) -> watch::Receiver<Epoch> {
        self.sender.subscribe()
    }

    /// Replace the epoch, clamped to the supported range.
    pub fn set(&self, epoch: Epoch) -> Epoch {
        let clamped = epoch.clamp_to_supported();
        self.sender.send_replace(clamped);
        clamped
    }

    /// Advance by `delta` in `direction` and return the new epoch.
    pub fn advance(&self, delta: &TimeDelta, direction: Direction) -> Epoch {
        self.sender.send_modify(|epoch| {
            *epoch = epoch.apply_delta(delta, direction).clamp_to_supported();
        });
        self.current()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayState {
    #[default]
    Idle,
    PlayingForward,
    PlayingBackward,
}

impl PlayState {
    fn playing(direction: Direction) -> Self {
        match direction {
            Direction::Forward => PlayState::PlayingForward,
            Direction::Backward => PlayState::PlayingBackward,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            PlayState::Idle => None,
            PlayState::PlayingForward => Some(Direction::Forward),
            PlayState::PlayingBackward => Some(Direction::Backward),
        }
    }

    pub fn is_playing(self) -> bool {
        self != PlayState::Idle
    }
}

/// Handle on the running playback task.
#[derive(Debug)]
struct Playback {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

async fn run_playback(
    clock: Arc<EpochClock>,
    delta: TimeDelta,
    direction: Direction,
    cadence: Duration,
    mut cancel: watch::Receiver<bool>,
) {
    loop {
        if *cancel.borrow_and_update() {
            break;
        }
        tokio::select! {
            biased;
            // A dropped sender counts as a cancellation.
            _ = cancel.changed() => break,
            _ = tokio::time::sleep(cadence) => {
                clock.advance(&delta, direction);
            }
        }
    }
}

/// Play, step and stop controls over an [`EpochClock`].
///
/// Must be used from within a tokio runtime: playback spawns a task.
#[derive(Debug)]
pub struct AnimationDriver {
    clock: Arc<EpochClock>,
    cadence: Duration,
    time_step: TimeStep,
    state: PlayState,
    playback: Option<Playback>,
}

impl AnimationDriver {
    pub fn new(clock: Arc<EpochClock>, cadence: Duration, time_step: TimeStep) -> Self {
        AnimationDriver {
            clock,
            cadence,
            time_step,
            state: PlayState::Idle,
            playback: None,
        }
    }

    pub fn clock(&self) -> &Arc<EpochClock> {
        &self.clock
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn time_step(&self) -> TimeStep {
        self.time_step
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// The date can only be typed in while nothing plays.
    pub fn date_entry_allowed(&self) -> bool {
        self.state == PlayState::Idle
    }

    /// Start playing in `direction`.
    ///
    /// Playing the same way already is a no-op; playing the other way is stopped
    /// first, and the old task has terminated before the new one starts.
    pub async fn play(&mut self, direction: Direction) -> Result<(), OrbitViewError> {
        match self.state.direction() {
            Some(current) if current == direction => return Ok(()),
            Some(_) => self.stop().await?,
            None => {}
        }

        let (cancel, cancelled) = watch::channel(false);
        let handle = tokio::spawn(run_playback(
            Arc::clone(&self.clock),
            self.time_step.delta(),
            direction,
            self.cadence,
            cancelled,
        ));
        self.playback = Some(Playback { cancel, handle });
        self.state = PlayState::playing(direction);
        log::debug!("playback started {direction:?}, step {}", self.time_step.label());
        Ok(())
    }

    /// Stop playback and wait for the task to terminate.
    pub async fn stop(&mut self) -> Result<(), OrbitViewError> {
        self.state = PlayState::Idle;
        let Some(Playback { cancel, handle }) = self.playback.take() else {
            return Ok(());
        };

        // The task may already be gone, in which case nobody listens.
        let _ = cancel.send(true);
        handle
            .await
            .map_err(|err| OrbitViewError::PlaybackTaskFailed(err.to_string()))?;
        log::debug!("playback stopped at {}", self.clock.current());
        Ok(())
    }

    /// Advance once by the current time step, leaving the play state alone.
    pub fn step(&self, direction: Direction) -> Epoch {
        self.clock.advance(&self.time_step.delta(), direction)
    }

    /// Change the time step, restarting playback in the same direction if needed.
    pub async fn set_time_step(&mut self, time_step: TimeStep) -> Result<(), OrbitViewError> {
        if time_step == self.time_step {
            return Ok(());
        }

        let resume = self.state.direction();
        if resume.is_some() {
            self.stop().await?;
        }
        self.time_step = time_step;
        if let Some(direction) = resume {
            self.play(direction).await?;
        }
        Ok(())
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.handle.abort();
        }
    }
}

#[cfg(test)]
mod player_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn start() -> Epoch {
        Epoch::from_calendar(1986, 2, 9.0)
    }

    fn driver(step: TimeStep) -> AnimationDriver {
        let clock = Arc::new(EpochClock::new(start()));
        AnimationDriver::new(clock, DEFAULT_CADENCE, step)
    }

    #[test]
    fn test_clock_clamps() {
        let clock = EpochClock::new(Epoch::from_calendar(1500, 1, 1.0));
        let (min, max) = Epoch::supported_range();
        assert_eq!(clock.current(), min);

        let set = clock.set(Epoch::from_calendar(2500, 1, 1.0));
        assert_eq!(set, max);
        assert_eq!(clock.current(), max);

        let back = clock.advance(&TimeDelta::years(1), Direction::Forward);
        assert_eq!(back, max);
    }

    #[tokio::test]
    async fn test_clock_notifies_subscribers() {
        let clock = EpochClock::new(start());
        let mut rx = clock.subscribe();
        clock.advance(&TimeDelta::days(1), Direction::Forward);
        assert!(rx.has_changed().unwrap());
        assert_abs_diff_eq!(rx.borrow_and_update().jd(), start().jd() + 1.0);
    }

    #[test]
    fn test_step_does_not_change_state() {
        let driver = driver(TimeStep::TenDays);
        let epoch = driver.step(Direction::Backward);
        assert_abs_diff_eq!(epoch.jd(), start().jd() - 10.0);
        assert_eq!(driver.state(), PlayState::Idle);
        assert!(driver.date_entry_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_advances_every_cadence() {
        let mut driver = driver(TimeStep::OneDay);
        driver.play(Direction::Forward).await.unwrap();
        assert_eq!(driver.state(), PlayState::PlayingForward);
        assert!(!driver.date_entry_allowed());

        tokio::time::sleep(Duration::from_millis(425)).await;
        driver.stop().await.unwrap();

        assert_eq!(driver.state(), PlayState::Idle);
        assert_abs_diff_eq!(driver.clock().current().jd(), start().jd() + 8.0, epsilon = 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_drops_pending_step() {
        let mut driver = driver(TimeStep::OneDay);
        driver.play(Direction::Forward).await.unwrap();
        tokio::time::sleep(Duration::from_millis(75)).await;
        driver.stop().await.unwrap();
        let stopped = driver.clock().current();
        assert_abs_diff_eq!(stopped.jd(), start().jd() + 1.0, epsilon = 1e-9);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(driver.clock().current(), stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_same_direction_is_noop() {
        let mut driver = driver(TimeStep::OneDay);
        driver.play(Direction::Backward).await.unwrap();
        tokio::time::sleep(Duration::from_millis(75)).await;
        driver.play(Direction::Backward).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        driver.stop().await.unwrap();

        // The cadence was not reset: steps at 50 and 100 ms.
        assert_abs_diff_eq!(driver.clock().current().jd(), start().jd() - 2.0, epsilon = 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverse_direction() {
        let mut driver = driver(TimeStep::OneDay);
        driver.play(Direction::Forward).await.unwrap();
        tokio::time::sleep(Duration::from_millis(125)).await;
        driver.play(Direction::Backward).await.unwrap();
        assert_eq!(driver.state(), PlayState::PlayingBackward);
        tokio::time::sleep(Duration::from_millis(125)).await;
        driver.stop().await.unwrap();

        assert_abs_diff_eq!(driver.clock().current().jd(), start().jd(), epsilon = 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_time_step_restarts_playback() {
        let mut driver = driver(TimeStep::OneDay);
        driver.play(Direction::Forward).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        driver.set_time_step(TimeStep::TenDays).await.unwrap();
        assert_eq!(driver.state(), PlayState::PlayingForward);
        assert_eq!(driver.time_step(), TimeStep::TenDays);
        tokio::time::sleep(Duration::from_millis(60)).await;
        driver.stop().await.unwrap();

        assert_abs_diff_eq!(driver.clock().current().jd(), start().jd() + 11.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_stop_when_idle() {
        let mut driver = driver(TimeStep::OneDay);
        driver.stop().await.unwrap();
        driver.set_time_step(TimeStep::OneYear).await.unwrap();
        assert_eq!(driver.state(), PlayState::Idle);
        assert_eq!(driver.time_step(), TimeStep::OneYear);
    }
}
