use std::sync::Arc;

use greeting_core::SequenceError;
use greeting_core::model::{Choice, QuizCopy};
use greeting_core::quiz::{ChoiceMark, Continue, Feedback, QuizOutcome, QuizPhase, QuizSession, Selection};
use services::QuizService;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizScreen {
    Question,
    Celebration(QuizOutcome),
    Passed(QuizOutcome),
    Failed(QuizOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub index: usize,
    pub label: String,
    pub image: Option<String>,
    pub class: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LivesVm {
    pub remaining: u32,
    pub total: u32,
}

impl LivesVm {
    /// One entry per life, `true` while still available.
    #[must_use]
    pub fn hearts(self) -> Vec<bool> {
        (0..self.total).map(|i| i < self.remaining).collect()
    }
}

pub struct QuizVm {
    service: Arc<QuizService>,
    session: QuizSession,
    screen: QuizScreen,
}

impl QuizVm {
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidInput` for an unusable quiz configuration.
    pub fn start(service: Arc<QuizService>) -> Result<Self, SequenceError> {
        let session = service.start_session()?;
        Ok(Self::with_session(service, session))
    }

    #[must_use]
    pub fn with_session(service: Arc<QuizService>, session: QuizSession) -> Self {
        Self {
            service,
            session,
            screen: QuizScreen::Question,
        }
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreen {
        self.screen
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn copy(&self) -> &QuizCopy {
        self.service.copy()
    }

    #[must_use]
    pub fn celebration_image(&self) -> Option<&str> {
        self.service.celebration_image()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.session.current_question().prompt()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        format!(
            "Question {} of {}",
            self.session.current_index() + 1,
            self.session.total()
        )
    }

    #[must_use]
    pub fn lives(&self) -> Option<LivesVm> {
        let total = self.service.rules().lives?;
        Some(LivesVm {
            remaining: self.session.lives_remaining().unwrap_or(total),
            total,
        })
    }

    #[must_use]
    pub fn choices(&self) -> Vec<ChoiceVm> {
        let answered = self.session.selected().is_some();
        self.session
            .current_question()
            .choices()
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceVm {
                index,
                label: choice.label().to_string(),
                image: match choice {
                    Choice::Image { image, .. } => Some(image.clone()),
                    Choice::Text(_) => None,
                },
                class: choice_class(self.session.choice_mark(index)),
                disabled: answered,
            })
            .collect()
    }

    /// Record a choice. `Ok(None)` when the question was already answered.
    ///
    /// # Errors
    ///
    /// Propagates `SequenceError` from the session.
    pub fn select(&mut self, choice: usize) -> Result<Option<Feedback>, SequenceError> {
        match self.session.select_choice(choice)? {
            Selection::Recorded(feedback) => Ok(Some(feedback)),
            Selection::AlreadyAnswered => Ok(None),
        }
    }

    /// Leave feedback: next question, celebration, or the fail screen.
    ///
    /// # Errors
    ///
    /// Propagates `SequenceError` from the session.
    pub fn advance(&mut self) -> Result<QuizScreen, SequenceError> {
        if let Continue::Finished(outcome) = self.session.continue_to_next()? {
            self.screen = if outcome.passed {
                QuizScreen::Celebration(outcome)
            } else {
                QuizScreen::Failed(outcome)
            };
        }
        Ok(self.screen)
    }

    pub fn finish_celebration(&mut self) {
        if let QuizScreen::Celebration(outcome) = self.screen {
            self.screen = QuizScreen::Passed(outcome);
        }
    }

    /// # Errors
    ///
    /// `SequenceError::InvalidState` unless the quiz has finished.
    pub fn retry(&mut self) -> Result<(), SequenceError> {
        self.service.retry(&mut self.session)?;
        self.screen = QuizScreen::Question;
        Ok(())
    }

    #[must_use]
    pub fn fail_body(&self, outcome: QuizOutcome) -> String {
        fill_score(&self.copy().fail_body, outcome)
    }
}

fn choice_class(mark: ChoiceMark) -> &'static str {
    match mark {
        ChoiceMark::Neutral => "quiz-choice",
        ChoiceMark::ChosenCorrect => "quiz-choice quiz-choice--correct",
        ChoiceMark::ChosenWrong => "quiz-choice quiz-choice--wrong",
        ChoiceMark::RevealedCorrect => "quiz-choice quiz-choice--reveal",
    }
}

#[must_use]
pub fn fill_score(template: &str, outcome: QuizOutcome) -> String {
    template
        .replace("{correct}", &outcome.correct.to_string())
        .replace("{total}", &outcome.total.to_string())
}
