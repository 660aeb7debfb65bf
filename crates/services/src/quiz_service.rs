use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use greeting_core::SequenceError;
use greeting_core::model::{QuizConfig, QuizCopy, QuizRules};
use greeting_core::quiz::QuizSession;

/// Builds quiz sessions from configuration.
#[derive(Debug, Clone)]
pub struct QuizService {
    config: QuizConfig,
}

impl QuizService {
    #[must_use]
    pub fn new(config: QuizConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn rules(&self) -> QuizRules {
        self.config.rules
    }

    #[must_use]
    pub fn copy(&self) -> &QuizCopy {
        &self.config.copy
    }

    #[must_use]
    pub fn celebration_image(&self) -> Option<&str> {
        self.config.celebration_image.as_deref()
    }

    /// Start a session, shuffling question order when configured.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidInput` if the configured rules do not
    /// fit the question list.
    pub fn start_session(&self) -> Result<QuizSession, SequenceError> {
        self.start_session_with(&mut rng())
    }

    /// Same as [`QuizService::start_session`] with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start_session`].
    pub fn start_session_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuizSession, SequenceError> {
        let mut questions = self.config.questions.clone();
        if self.config.rules.shuffle_questions {
            questions.shuffle(rng);
        }
        QuizSession::new(questions, self.config.rules.min_correct, self.config.rules.lives)
    }

    /// Restart a finished session. With shuffling on, the retry gets a fresh
    /// order; otherwise the order is kept.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidState` unless the session has finished.
    pub fn retry(&self, session: &mut QuizSession) -> Result<(), SequenceError> {
        session.retry()?;
        if self.config.rules.shuffle_questions {
            *session = self.start_session()?;
        }
        tracing::debug!("quiz retried");
        Ok(())
    }
}
