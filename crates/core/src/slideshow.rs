//! Self-advancing slideshow engine.
//!
//! The engine owns no clock or timer. The host feeds elapsed time through
//! [`SlideshowEngine::tick`] and forwards user navigation; the engine decides
//! when a slide's time is up and fires the configured callbacks synchronously.
//!
//! Pause/resume policy: with [`ResumePolicy::Continue`] (the default) a
//! resumed slide runs only for its remaining time; with
//! [`ResumePolicy::Restart`] it gets its full duration again.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::model::Slide;

pub type SlideCallback = Box<dyn FnMut(usize)>;
pub type EndCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    #[default]
    Continue,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Paused,
    Ended,
}

/// What a navigation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Wrapped,
    Ended,
    Ignored,
}

/// Options recognized by [`SlideshowEngine::start`].
pub struct SlideshowOptions {
    loop_enabled: bool,
    default_duration: Duration,
    resume_policy: ResumePolicy,
    on_slide_start: Option<SlideCallback>,
    on_slide_end: Option<SlideCallback>,
    on_sequence_end: Option<EndCallback>,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            loop_enabled: false,
            default_duration: Duration::from_secs(5),
            resume_policy: ResumePolicy::Continue,
            on_slide_start: None,
            on_slide_end: None,
            on_sequence_end: None,
        }
    }
}

impl SlideshowOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn looping(mut self, loop_enabled: bool) -> Self {
        self.loop_enabled = loop_enabled;
        self
    }

    #[must_use]
    pub fn default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    #[must_use]
    pub fn resume_policy(mut self, policy: ResumePolicy) -> Self {
        self.resume_policy = policy;
        self
    }

    #[must_use]
    pub fn on_slide_start(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_slide_start = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_slide_end(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_slide_end = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_sequence_end(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_sequence_end = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for SlideshowOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideshowOptions")
            .field("loop_enabled", &self.loop_enabled)
            .field("default_duration", &self.default_duration)
            .field("resume_policy", &self.resume_policy)
            .finish_non_exhaustive()
    }
}

/// Runtime state of one slideshow session.
///
/// `index` stays in `0..slide_count()` while running or paused and becomes
/// `slide_count()` once a non-looping sequence has ended.
pub struct SlideshowEngine {
    slides: Vec<Slide>,
    index: usize,
    elapsed: Duration,
    state: PlaybackState,
    options: SlideshowOptions,
}

impl SlideshowEngine {
    /// Start a session on slide 0 and fire `on_slide_start(0)`.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidInput` for an empty slide list or a zero
    /// default duration.
    pub fn start(slides: Vec<Slide>, options: SlideshowOptions) -> Result<Self, SequenceError> {
        if slides.is_empty() {
            return Err(SequenceError::input("slideshow requires at least one slide"));
        }
        if options.default_duration.is_zero() {
            return Err(SequenceError::input("default slide duration must be > 0"));
        }

        let mut engine = Self {
            slides,
            index: 0,
            elapsed: Duration::ZERO,
            state: PlaybackState::Running,
            options,
        };
        engine.emit_slide_start();
        Ok(engine)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state == PlaybackState::Ended
    }

    #[must_use]
    pub fn loop_enabled(&self) -> bool {
        self.options.loop_enabled
    }

    /// The slide on screen; `None` once the sequence has ended.
    #[must_use]
    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.index)
    }

    #[must_use]
    pub fn current_duration(&self) -> Duration {
        self.current()
            .map_or(Duration::ZERO, |slide| slide.duration_or(self.options.default_duration))
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.current_duration().saturating_sub(self.elapsed)
    }

    /// Fraction of the current slide that has played, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.is_ended() {
            return 1.0;
        }
        let total = self.current_duration().as_secs_f32();
        if total <= 0.0 {
            return 0.0;
        }
        (self.elapsed.as_secs_f32() / total).clamp(0.0, 1.0)
    }

    /// One fraction per slide for a segmented progress bar.
    #[must_use]
    pub fn segment_progress(&self) -> Vec<f32> {
        let current = self.progress();
        (0..self.slides.len())
            .map(|i| match i.cmp(&self.index) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Equal => current,
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    /// Move to the next slide.
    ///
    /// Works while running or paused (manual tap); a paused engine stays
    /// paused on the new slide. After a non-looping end this is a no-op.
    pub fn advance(&mut self) -> Advance {
        if self.is_ended() {
            return Advance::Ignored;
        }

        self.emit_slide_end();
        self.elapsed = Duration::ZERO;

        let next = self.index + 1;
        if next < self.slides.len() {
            self.index = next;
            self.emit_slide_start();
            Advance::Moved(next)
        } else if self.options.loop_enabled {
            self.index = 0;
            self.emit_slide_start();
            Advance::Wrapped
        } else {
            self.index = self.slides.len();
            self.state = PlaybackState::Ended;
            tracing::debug!(slides = self.slides.len(), "slideshow sequence ended");
            if let Some(callback) = self.options.on_sequence_end.as_mut() {
                callback();
            }
            Advance::Ended
        }
    }

    /// Step back one slide. No-op on the first slide and after the end.
    pub fn previous(&mut self) -> Advance {
        if self.is_ended() || self.index == 0 {
            return Advance::Ignored;
        }

        self.emit_slide_end();
        self.elapsed = Duration::ZERO;
        self.index -= 1;
        self.emit_slide_start();
        Advance::Moved(self.index)
    }

    /// Suspend the slide timer. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.state = PlaybackState::Paused;
        true
    }

    /// Restart the slide timer according to the resume policy. Returns whether
    /// the state changed.
    pub fn resume(&mut self) -> bool {
        if self.state != PlaybackState::Paused {
            return false;
        }
        if self.options.resume_policy == ResumePolicy::Restart {
            self.elapsed = Duration::ZERO;
        }
        self.state = PlaybackState::Running;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Ended => false,
        }
    }

    /// Feed elapsed wall time. Each expired slide advances exactly once and
    /// leftover time carries into the next slide. Ignored unless running.
    ///
    /// Returns how many slides were advanced past.
    pub fn tick(&mut self, delta: Duration) -> usize {
        if self.state != PlaybackState::Running {
            return 0;
        }

        let mut budget = delta;
        let mut advanced = 0;
        loop {
            let remaining = self.remaining();
            if budget < remaining {
                self.elapsed += budget;
                break;
            }
            budget -= remaining;
            self.advance();
            advanced += 1;
            if self.state != PlaybackState::Running {
                break;
            }
        }
        advanced
    }

    fn emit_slide_start(&mut self) {
        let index = self.index;
        if let Some(callback) = self.options.on_slide_start.as_mut() {
            callback(index);
        }
    }

    fn emit_slide_end(&mut self) {
        let index = self.index;
        if let Some(callback) = self.options.on_slide_end.as_mut() {
            callback(index);
        }
    }
}

impl fmt::Debug for SlideshowEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideshowEngine")
            .field("slides_len", &self.slides.len())
            .field("index", &self.index)
            .field("elapsed", &self.elapsed)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
