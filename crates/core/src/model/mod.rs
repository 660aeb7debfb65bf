mod config;
mod question;
mod reveal;
mod slide;

pub use config::{
    ConfigError, CountdownConfig, CountdownDraft, GreetingConfig, GreetingConfigDraft,
    QuestionDraft, QuizConfig, QuizCopy, QuizDraft, QuizRules, RevealConfig, RevealDraft,
    SlideDraft, SlideshowConfig, SlideshowDraft,
};
pub use question::{Choice, Question, QuestionError};
pub use reveal::{CinemaInvite, DateInvite, Reveal};
pub use slide::{MusicTrack, Slide, SlideContent, SlideError, SlideHeader};
