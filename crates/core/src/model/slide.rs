use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SlideError {
    #[error("slide duration must be > 0")]
    ZeroDuration,

    #[error("photo slide requires an image")]
    MissingImage,

    #[error("list slide requires at least one item")]
    EmptyList,

    #[error("slide heading cannot be empty")]
    EmptyHeading,
}

/// Profile-style header shown above a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideHeader {
    pub heading: String,
    #[serde(default)]
    pub subheading: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Background music played while a slide (or the countdown) is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicTrack {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub start_secs: u32,
}

/// What a slide renders. Rendering itself lives in the UI crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideContent {
    Photo {
        image: String,
        #[serde(default)]
        caption: Option<String>,
        #[serde(default)]
        sticker: Option<String>,
    },
    Text {
        heading: String,
        #[serde(default)]
        body: String,
    },
    List {
        heading: String,
        items: Vec<String>,
    },
}

impl SlideContent {
    fn validate(&self) -> Result<(), SlideError> {
        match self {
            SlideContent::Photo { image, .. } if image.trim().is_empty() => {
                Err(SlideError::MissingImage)
            }
            SlideContent::Text { heading, .. } if heading.trim().is_empty() => {
                Err(SlideError::EmptyHeading)
            }
            SlideContent::List { heading, .. } if heading.trim().is_empty() => {
                Err(SlideError::EmptyHeading)
            }
            SlideContent::List { items, .. } if items.is_empty() => Err(SlideError::EmptyList),
            _ => Ok(()),
        }
    }
}

/// One timed unit of the slideshow.
///
/// A slide without its own duration uses the slideshow's default duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    duration: Option<Duration>,
    content: SlideContent,
    header: Option<SlideHeader>,
    music: Option<MusicTrack>,
}

impl Slide {
    /// # Errors
    ///
    /// Returns `SlideError` if the content is incomplete.
    pub fn new(content: SlideContent) -> Result<Self, SlideError> {
        content.validate()?;
        Ok(Self {
            duration: None,
            content,
            header: None,
            music: None,
        })
    }

    /// # Errors
    ///
    /// Returns `SlideError::ZeroDuration` for a zero duration.
    pub fn with_duration(mut self, duration: Duration) -> Result<Self, SlideError> {
        if duration.is_zero() {
            return Err(SlideError::ZeroDuration);
        }
        self.duration = Some(duration);
        Ok(self)
    }

    #[must_use]
    pub fn with_header(mut self, header: SlideHeader) -> Self {
        self.header = Some(header);
        self
    }

    #[must_use]
    pub fn with_music(mut self, music: MusicTrack) -> Self {
        self.music = Some(music);
        self
    }

    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    #[must_use]
    pub fn duration_or(&self, default: Duration) -> Duration {
        self.duration.unwrap_or(default)
    }

    #[must_use]
    pub fn content(&self) -> &SlideContent {
        &self.content
    }

    #[must_use]
    pub fn header(&self) -> Option<&SlideHeader> {
        self.header.as_ref()
    }

    #[must_use]
    pub fn music(&self) -> Option<&MusicTrack> {
        self.music.as_ref()
    }
}
