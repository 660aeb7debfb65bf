//! Configuration schema for the whole experience.
//!
//! Every content-level difference between greeting variants (questions,
//! thresholds, slides, reveal, gating copy) lives here. The drafts are what a
//! config file deserializes into; `validate` turns them into domain types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::countdown::Countdown;
use crate::model::question::{Choice, Question, QuestionError};
use crate::model::reveal::Reveal;
use crate::model::slide::{MusicTrack, Slide, SlideContent, SlideError, SlideHeader};
use crate::slideshow::ResumePolicy;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("quiz needs at least one question")]
    NoQuestions,

    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("min_correct ({min_correct}) exceeds the number of questions ({total})")]
    UnreachableThreshold { min_correct: usize, total: usize },

    #[error("lives must be > 0 when set")]
    ZeroLives,

    #[error("slideshow needs at least one slide")]
    NoSlides,

    #[error("slide {index}: {source}")]
    Slide {
        index: usize,
        #[source]
        source: SlideError,
    },

    #[error("default slide duration must be > 0")]
    ZeroDefaultDuration,
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct GreetingConfigDraft {
    pub quiz: QuizDraft,
    pub slideshow: SlideshowDraft,
    pub reveal: RevealDraft,
    #[serde(default)]
    pub countdown: Option<CountdownDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizDraft {
    #[serde(default = "default_min_correct")]
    pub min_correct: u32,
    #[serde(default)]
    pub lives: Option<u32>,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default = "default_celebration_ms")]
    pub celebration_ms: u64,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default)]
    pub celebration_image: Option<String>,
    #[serde(default)]
    pub copy: QuizCopy,
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub choices: Vec<Choice>,
    pub correct: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideshowDraft {
    #[serde(default, rename = "loop")]
    pub loop_enabled: bool,
    #[serde(default = "default_slide_ms")]
    pub default_duration_ms: u64,
    #[serde(default)]
    pub resume: ResumePolicy,
    pub slides: Vec<SlideDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideDraft {
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub header: Option<SlideHeader>,
    #[serde(default)]
    pub music: Option<MusicTrack>,
    #[serde(flatten)]
    pub content: SlideContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevealDraft {
    #[serde(default = "default_intro_ms")]
    pub intro_ms: u64,
    #[serde(flatten)]
    pub content: Reveal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountdownDraft {
    pub target: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub music: Option<MusicTrack>,
}

/// Gating copy shown around the quiz. `{correct}` and `{total}` are
/// substituted in `fail_body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizCopy {
    pub intro: String,
    pub pass_title: String,
    pub pass_body: String,
    pub pass_button: String,
    pub fail_title: String,
    pub fail_body: String,
    pub retry_button: String,
    pub celebration_title: String,
    pub celebration_body: String,
}

impl Default for QuizCopy {
    fn default() -> Self {
        Self {
            intro: "Answer correctly to prove you are worthy of what comes next.".into(),
            pass_title: "You are worthy!".into(),
            pass_body: "You know us well. Tap to see your surprise.".into(),
            pass_button: "See my surprise".into(),
            fail_title: "Not quite".into(),
            fail_body: "You got {correct} of {total}. Think back on our moments!".into(),
            retry_button: "Try again".into(),
            celebration_title: "You are worthy!".into(),
            celebration_body: "Approved.".into(),
        }
    }
}

fn default_min_correct() -> u32 {
    2
}

fn default_feedback_ms() -> u64 {
    800
}

fn default_celebration_ms() -> u64 {
    2_500
}

fn default_slide_ms() -> u64 {
    5_000
}

fn default_intro_ms() -> u64 {
    400
}

//
// ─── VALIDATED CONFIG ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct GreetingConfig {
    pub quiz: QuizConfig,
    pub slideshow: SlideshowConfig,
    pub reveal: RevealConfig,
    pub countdown: Option<CountdownConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    pub questions: Vec<Question>,
    pub rules: QuizRules,
    pub copy: QuizCopy,
    pub celebration_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRules {
    pub min_correct: usize,
    pub lives: Option<u32>,
    pub feedback: Duration,
    pub celebration: Duration,
    pub shuffle_questions: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowConfig {
    pub slides: Vec<Slide>,
    pub loop_enabled: bool,
    pub default_duration: Duration,
    pub resume: ResumePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealConfig {
    pub content: Reveal,
    pub intro: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountdownConfig {
    pub countdown: Countdown,
    pub title: String,
    pub subtitle: Option<String>,
    pub music: Option<MusicTrack>,
}

impl GreetingConfigDraft {
    /// Validate the whole document.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found, quiz before slideshow.
    pub fn validate(self) -> Result<GreetingConfig, ConfigError> {
        let quiz = self.quiz.validate()?;
        let slideshow = self.slideshow.validate()?;
        let reveal = RevealConfig {
            content: self.reveal.content,
            intro: Duration::from_millis(self.reveal.intro_ms),
        };
        let countdown = self.countdown.map(|draft| CountdownConfig {
            countdown: Countdown::new(draft.target),
            title: draft
                .title
                .unwrap_or_else(|| "Your card opens soon".to_string()),
            subtitle: draft.subtitle,
            music: draft.music,
        });

        Ok(GreetingConfig {
            quiz,
            slideshow,
            reveal,
            countdown,
        })
    }
}

impl QuizDraft {
    /// # Errors
    ///
    /// Returns `ConfigError` for missing or malformed questions and an
    /// unreachable threshold.
    pub fn validate(self) -> Result<QuizConfig, ConfigError> {
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        if self.lives == Some(0) {
            return Err(ConfigError::ZeroLives);
        }

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                Question::new(draft.prompt, draft.choices, draft.correct)
                    .map_err(|source| ConfigError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let min_correct = usize::try_from(self.min_correct).unwrap_or(usize::MAX);
        if min_correct > questions.len() {
            return Err(ConfigError::UnreachableThreshold {
                min_correct,
                total: questions.len(),
            });
        }

        Ok(QuizConfig {
            questions,
            rules: QuizRules {
                min_correct,
                lives: self.lives,
                feedback: Duration::from_millis(self.feedback_ms),
                celebration: Duration::from_millis(self.celebration_ms),
                shuffle_questions: self.shuffle_questions,
            },
            copy: self.copy,
            celebration_image: self.celebration_image,
        })
    }
}

impl SlideshowDraft {
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty slide list, invalid slides or a zero
    /// default duration.
    pub fn validate(self) -> Result<SlideshowConfig, ConfigError> {
        if self.default_duration_ms == 0 {
            return Err(ConfigError::ZeroDefaultDuration);
        }
        if self.slides.is_empty() {
            return Err(ConfigError::NoSlides);
        }

        let slides = self
            .slides
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .into_slide()
                    .map_err(|source| ConfigError::Slide { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SlideshowConfig {
            slides,
            loop_enabled: self.loop_enabled,
            default_duration: Duration::from_millis(self.default_duration_ms),
            resume: self.resume,
        })
    }
}

impl SlideDraft {
    fn into_slide(self) -> Result<Slide, SlideError> {
        let mut slide = Slide::new(self.content)?;
        if let Some(ms) = self.duration_ms {
            slide = slide.with_duration(Duration::from_millis(ms))?;
        }
        if let Some(header) = self.header {
            slide = slide.with_header(header);
        }
        if let Some(music) = self.music {
            slide = slide.with_music(music);
        }
        Ok(slide)
    }
}
