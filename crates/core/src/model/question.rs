use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two choices, got {len}")]
    TooFewChoices { len: usize },

    #[error("choice {index} is empty")]
    EmptyChoice { index: usize },

    #[error("correct choice {correct} is out of range for {len} choices")]
    CorrectOutOfRange { correct: usize, len: usize },
}

/// A single answer option: plain text or an image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Text(String),
    Image {
        image: String,
        #[serde(default)]
        alt: Option<String>,
    },
}

impl Choice {
    /// Text shown for the choice (alt text for images).
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Choice::Text(text) => text,
            Choice::Image { alt: Some(alt), .. } => alt,
            Choice::Image { image, .. } => image,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Choice::Text(text) => text.trim().is_empty(),
            Choice::Image { image, .. } => image.trim().is_empty(),
        }
    }
}

impl From<&str> for Choice {
    fn from(value: &str) -> Self {
        Choice::Text(value.to_string())
    }
}

/// One quiz item with exactly one correct choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    choices: Vec<Choice>,
    correct: usize,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, there are fewer than two
    /// choices, a choice is blank, or `correct` does not index a choice.
    pub fn new(
        prompt: impl Into<String>,
        choices: Vec<Choice>,
        correct: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices { len: choices.len() });
        }
        if let Some(index) = choices.iter().position(Choice::is_blank) {
            return Err(QuestionError::EmptyChoice { index });
        }
        if correct >= choices.len() {
            return Err(QuestionError::CorrectOutOfRange {
                correct,
                len: choices.len(),
            });
        }

        Ok(Self {
            prompt,
            choices,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn correct_choice(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}
