use std::sync::{Arc, Mutex, PoisonError};

use greeting_core::countdown::Countdown;
use greeting_core::stage::{Stage, StageFlags, StageMachine};

use crate::Clock;
use crate::error::StageError;
use crate::progress_service::ProgressService;

/// Drives the stage machine and persists the flags that outlive a run.
///
/// Construct, then call [`StageController::initialize`] once before reading
/// the stage; until then the controller reports `Stage::Quiz`.
pub struct StageController {
    clock: Clock,
    countdown: Option<Countdown>,
    progress: Arc<ProgressService>,
    machine: Mutex<StageMachine>,
}

impl StageController {
    #[must_use]
    pub fn new(clock: Clock, countdown: Option<Countdown>, progress: Arc<ProgressService>) -> Self {
        Self {
            clock,
            countdown,
            progress,
            machine: Mutex::new(StageMachine::initial(StageFlags::default())),
        }
    }

    /// Read persisted flags and select the initial stage.
    pub async fn initialize(&self) -> Stage {
        let flags = self.read_flags().await;
        let machine = StageMachine::initial(flags);
        let stage = machine.current();
        *self.lock() = machine;
        tracing::info!(
            %stage,
            quiz_passed = flags.quiz_passed,
            countdown_pending = flags.countdown_pending,
            "stage initialized"
        );
        stage
    }

    #[must_use]
    pub fn current(&self) -> Stage {
        self.lock().current()
    }

    #[must_use]
    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The countdown target has passed.
    ///
    /// # Errors
    ///
    /// `StageError::Sequence` unless the countdown stage is active.
    pub async fn on_countdown_reached(&self) -> Result<Stage, StageError> {
        let quiz_passed = self.progress.quiz_passed().await;
        Ok(self.lock().countdown_finished(quiz_passed)?)
    }

    /// Open the card before the target, remembering the choice.
    ///
    /// # Errors
    ///
    /// `StageError::Sequence` unless the countdown stage is active.
    pub async fn skip_countdown(&self) -> Result<Stage, StageError> {
        if self.current() != Stage::Countdown {
            return Ok(self.lock().countdown_finished(false)?);
        }
        if let Err(err) = self.progress.mark_countdown_skipped().await {
            tracing::warn!(error = %err, "failed to persist countdown skip");
        }
        // The stage may have moved while the flag was written; the locked
        // transition re-checks it.
        self.on_countdown_reached().await
    }

    /// The visitor passed the quiz and confirmed.
    ///
    /// The flag write is best effort; the transition happens either way.
    ///
    /// # Errors
    ///
    /// `StageError::Sequence` unless the quiz stage is active.
    pub async fn on_quiz_passed(&self) -> Result<Stage, StageError> {
        if self.current() != Stage::Quiz {
            return Ok(self.lock().quiz_passed()?);
        }
        if let Err(err) = self.progress.mark_quiz_passed().await {
            tracing::warn!(error = %err, "failed to persist quiz pass");
        }
        // Re-checked under the lock: a second caller that raced past the
        // check above gets `InvalidState` here instead of a double move.
        Ok(self.lock().quiz_passed()?)
    }

    /// # Errors
    ///
    /// `StageError::Sequence` unless the slideshow stage is active.
    pub fn on_slideshow_sequence_end(&self) -> Result<Stage, StageError> {
        Ok(self.lock().slideshow_ended()?)
    }

    /// # Errors
    ///
    /// `StageError::Sequence` unless the reveal stage is active.
    pub fn on_reveal_dismissed(&self) -> Result<Stage, StageError> {
        Ok(self.lock().reveal_dismissed()?)
    }

    /// Clear persisted progress and restart from the initial stage.
    ///
    /// # Errors
    ///
    /// `StageError::Progress` if the flags cannot be cleared.
    pub async fn reset_progress(&self) -> Result<Stage, StageError> {
        self.progress.reset().await?;
        Ok(self.initialize().await)
    }

    async fn read_flags(&self) -> StageFlags {
        let quiz_passed = self.progress.quiz_passed().await;
        let countdown_pending = match self.countdown {
            Some(countdown) if !countdown.is_reached(self.clock.now()) => {
                !self.progress.countdown_skipped().await
            }
            _ => false,
        };
        StageFlags {
            quiz_passed,
            countdown_pending,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StageMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greeting_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn controller(countdown: Option<Countdown>) -> StageController {
        let repo = Arc::new(InMemoryRepository::new());
        let progress = Arc::new(ProgressService::new(fixed_clock(), repo));
        StageController::new(fixed_clock(), countdown, progress)
    }

    #[tokio::test]
    async fn reached_countdown_is_not_shown() {
        let past = Countdown::new(fixed_now() - chrono::Duration::hours(1));
        let ctl = controller(Some(past));
        assert_eq!(ctl.initialize().await, Stage::Quiz);
    }

    #[tokio::test]
    async fn future_countdown_gates_the_quiz() {
        let future = Countdown::new(fixed_now() + chrono::Duration::hours(1));
        let ctl = controller(Some(future));
        assert_eq!(ctl.initialize().await, Stage::Countdown);
        assert_eq!(ctl.on_countdown_reached().await.unwrap(), Stage::Quiz);
    }

    #[tokio::test]
    async fn skipped_countdown_stays_skipped_after_reinitialize() {
        let future = Countdown::new(fixed_now() + chrono::Duration::days(1));
        let ctl = controller(Some(future));
        ctl.initialize().await;
        assert_eq!(ctl.skip_countdown().await.unwrap(), Stage::Quiz);
        assert_eq!(ctl.initialize().await, Stage::Quiz);
    }

    #[tokio::test]
    async fn skip_outside_countdown_is_invalid_state() {
        let ctl = controller(None);
        ctl.initialize().await;
        let err = ctl.skip_countdown().await.unwrap_err();
        assert!(matches!(err, StageError::Sequence(e) if e.is_invalid_state()));
    }

    #[tokio::test]
    async fn wrong_stage_callbacks_fail_without_moving() {
        let ctl = controller(None);
        ctl.initialize().await;
        assert!(ctl.on_slideshow_sequence_end().is_err());
        assert!(ctl.on_reveal_dismissed().is_err());
        assert_eq!(ctl.current(), Stage::Quiz);
    }

    #[tokio::test]
    async fn concurrent_quiz_pass_moves_once() {
        let ctl = controller(None);
        ctl.initialize().await;
        let (first, second) = tokio::join!(ctl.on_quiz_passed(), ctl.on_quiz_passed());

        let moved = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(moved, 1, "{first:?} {second:?}");
        assert_eq!(ctl.current(), Stage::Slideshow);
        let err = if first.is_err() {
            first.unwrap_err()
        } else {
            second.unwrap_err()
        };
        assert!(matches!(err, StageError::Sequence(e) if e.is_invalid_state()));
    }

    #[tokio::test]
    async fn concurrent_countdown_skip_moves_once() {
        let future = Countdown::new(fixed_now() + chrono::Duration::days(1));
        let ctl = controller(Some(future));
        ctl.initialize().await;
        let (first, second) = tokio::join!(ctl.skip_countdown(), ctl.skip_countdown());

        assert_eq!([&first, &second].iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(ctl.current(), Stage::Quiz);
    }

    #[tokio::test]
    async fn reset_progress_returns_to_quiz() {
        let ctl = controller(None);
        ctl.initialize().await;
        ctl.on_quiz_passed().await.unwrap();
        assert_eq!(ctl.initialize().await, Stage::Slideshow);

        assert_eq!(ctl.reset_progress().await.unwrap(), Stage::Quiz);
    }
}
