use std::fmt;

use crate::error::SequenceError;

/// Top-level phase of the experience. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Countdown,
    Quiz,
    Slideshow,
    Reveal,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Countdown => "countdown",
            Stage::Quiz => "quiz",
            Stage::Slideshow => "slideshow",
            Stage::Reveal => "reveal",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs that decide the initial stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageFlags {
    /// The persisted "already passed" flag.
    pub quiz_passed: bool,
    /// A countdown is configured, not yet reached and not skipped.
    pub countdown_pending: bool,
}

/// Pure stage transition table; persistence lives with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMachine {
    current: Stage,
}

impl StageMachine {
    #[must_use]
    pub fn initial(flags: StageFlags) -> Self {
        let current = if flags.countdown_pending {
            Stage::Countdown
        } else {
            Self::after_countdown(flags.quiz_passed)
        };
        Self { current }
    }

    #[must_use]
    pub fn current(&self) -> Stage {
        self.current
    }

    /// Countdown reached or skipped.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the countdown is active.
    pub fn countdown_finished(&mut self, quiz_passed: bool) -> Result<Stage, SequenceError> {
        self.transition(Stage::Countdown, Self::after_countdown(quiz_passed))
    }

    /// # Errors
    ///
    /// `InvalidState` unless the quiz is active.
    pub fn quiz_passed(&mut self) -> Result<Stage, SequenceError> {
        self.transition(Stage::Quiz, Stage::Slideshow)
    }

    /// # Errors
    ///
    /// `InvalidState` unless the slideshow is active.
    pub fn slideshow_ended(&mut self) -> Result<Stage, SequenceError> {
        self.transition(Stage::Slideshow, Stage::Reveal)
    }

    /// Dismissing the reveal replays the slideshow.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the reveal is active.
    pub fn reveal_dismissed(&mut self) -> Result<Stage, SequenceError> {
        self.transition(Stage::Reveal, Stage::Slideshow)
    }

    fn after_countdown(quiz_passed: bool) -> Stage {
        if quiz_passed {
            Stage::Slideshow
        } else {
            Stage::Quiz
        }
    }

    fn transition(&mut self, from: Stage, to: Stage) -> Result<Stage, SequenceError> {
        if self.current != from {
            return Err(SequenceError::state(format!(
                "cannot leave {from} while {} is active",
                self.current
            )));
        }
        tracing::debug!(%from, %to, "stage transition");
        self.current = to;
        Ok(to)
    }
}
