//! Quiz sequencer.
//!
//! Answering and advancing are separate steps so the host can show right or
//! wrong feedback between them. The pass threshold is evaluated exactly once,
//! after the last answer (or after the last life is lost).

use crate::error::SequenceError;
use crate::model::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for a choice on the current question.
    Answering,
    /// A choice is recorded; waiting for `continue_to_next`.
    Feedback,
    /// Terminal reporting state; only `retry` leaves it.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub selected: usize,
    pub correct_choice: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
    pub out_of_lives: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Recorded(Feedback),
    /// A choice was already recorded for this question; nothing changed.
    AlreadyAnswered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continue {
    NextQuestion(usize),
    Finished(QuizOutcome),
}

/// How a choice button should look once feedback is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Neutral,
    ChosenCorrect,
    ChosenWrong,
    RevealedCorrect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    questions: Vec<Question>,
    min_correct: usize,
    lives: Option<u32>,
    current_index: usize,
    selected: Option<usize>,
    correct_count: usize,
    lives_remaining: Option<u32>,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidInput` when there are no questions, when
    /// `min_correct` exceeds the question count, or when `lives` is zero.
    pub fn new(
        questions: Vec<Question>,
        min_correct: usize,
        lives: Option<u32>,
    ) -> Result<Self, SequenceError> {
        if questions.is_empty() {
            return Err(SequenceError::input("quiz requires at least one question"));
        }
        if min_correct > questions.len() {
            return Err(SequenceError::input(format!(
                "min_correct {min_correct} exceeds question count {}",
                questions.len()
            )));
        }
        if lives == Some(0) {
            return Err(SequenceError::input("lives must be > 0 when set"));
        }

        Ok(Self {
            questions,
            min_correct,
            lives,
            current_index: 0,
            selected: None,
            correct_count: 0,
            lives_remaining: lives,
            outcome: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn min_correct(&self) -> usize {
        self.min_correct
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // current_index never leaves 0..len
        &self.questions[self.current_index]
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn lives_remaining(&self) -> Option<u32> {
        self.lives_remaining
    }

    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.outcome.is_some() {
            QuizPhase::Finished
        } else if self.selected.is_some() {
            QuizPhase::Feedback
        } else {
            QuizPhase::Answering
        }
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Record an answer for the current question.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an out-of-range choice, `InvalidState` once the
    /// session has finished.
    pub fn select_choice(&mut self, choice: usize) -> Result<Selection, SequenceError> {
        if self.outcome.is_some() {
            return Err(SequenceError::state("quiz already finished"));
        }
        let question = &self.questions[self.current_index];
        if choice >= question.choices().len() {
            return Err(SequenceError::input(format!(
                "choice {choice} out of range for {} choices",
                question.choices().len()
            )));
        }
        if self.selected.is_some() {
            return Ok(Selection::AlreadyAnswered);
        }

        let is_correct = question.is_correct(choice);
        let correct_choice = question.correct_choice();
        self.selected = Some(choice);
        if is_correct {
            self.correct_count += 1;
        } else if let Some(lives) = self.lives_remaining.as_mut() {
            *lives = lives.saturating_sub(1);
        }

        Ok(Selection::Recorded(Feedback {
            selected: choice,
            correct_choice,
            is_correct,
        }))
    }

    /// Leave the feedback state: move on, or finalize after the last question
    /// or the last life.
    ///
    /// # Errors
    ///
    /// `InvalidState` before any choice is recorded or after the session
    /// finished.
    pub fn continue_to_next(&mut self) -> Result<Continue, SequenceError> {
        if self.outcome.is_some() {
            return Err(SequenceError::state("quiz already finished"));
        }
        if self.selected.is_none() {
            return Err(SequenceError::state("no choice recorded for current question"));
        }

        let out_of_lives = self.lives_remaining == Some(0);
        if out_of_lives || self.is_last_question() {
            let outcome = QuizOutcome {
                correct: self.correct_count,
                total: self.questions.len(),
                passed: !out_of_lives && self.correct_count >= self.min_correct,
                out_of_lives,
            };
            tracing::debug!(
                correct = outcome.correct,
                total = outcome.total,
                passed = outcome.passed,
                out_of_lives,
                "quiz finished"
            );
            self.outcome = Some(outcome);
            return Ok(Continue::Finished(outcome));
        }

        self.current_index += 1;
        self.selected = None;
        Ok(Continue::NextQuestion(self.current_index))
    }

    /// Full restart with the same questions in the same order.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the session has finished.
    pub fn retry(&mut self) -> Result<(), SequenceError> {
        if self.outcome.is_none() {
            return Err(SequenceError::state("retry is only valid after the quiz finished"));
        }
        self.current_index = 0;
        self.selected = None;
        self.correct_count = 0;
        self.lives_remaining = self.lives;
        self.outcome = None;
        Ok(())
    }

    #[must_use]
    pub fn choice_mark(&self, choice: usize) -> ChoiceMark {
        let Some(selected) = self.selected else {
            return ChoiceMark::Neutral;
        };
        let correct = self.current_question().correct_choice();
        if choice == selected {
            if choice == correct {
                ChoiceMark::ChosenCorrect
            } else {
                ChoiceMark::ChosenWrong
            }
        } else if choice == correct {
            ChoiceMark::RevealedCorrect
        } else {
            ChoiceMark::Neutral
        }
    }
}
