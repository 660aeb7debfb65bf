//! Audio service interface.
//!
//! A stage opens an [`AudioSession`] when it mounts and closes it when it
//! unmounts, so no sound outlives the stage that started it. Playback errors
//! stay inside the backend.

use std::sync::{Arc, Mutex, PoisonError};

use greeting_core::model::MusicTrack;

/// Short sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Wrong,
    SlideChange,
}

pub trait AudioSession {
    fn play_cue(&mut self, cue: Cue);

    /// Start a track, replacing whatever is playing.
    fn play_music(&mut self, track: &MusicTrack);

    fn pause_music(&mut self);

    fn resume_music(&mut self);

    fn stop_music(&mut self);

    /// Release the session. Further calls are ignored.
    fn close(&mut self);
}

pub trait AudioBackend: Send + Sync {
    fn open(&self) -> Box<dyn AudioSession>;
}

/// Backend that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn open(&self) -> Box<dyn AudioSession> {
        Box::new(SilentSession)
    }
}

struct SilentSession;

impl AudioSession for SilentSession {
    fn play_cue(&mut self, _cue: Cue) {}
    fn play_music(&mut self, _track: &MusicTrack) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn close(&mut self) {}
}

/// Everything a [`RecordingAudio`] session was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Opened,
    Cue(Cue),
    PlayMusic(String),
    PauseMusic,
    ResumeMusic,
    StopMusic,
    Closed,
}

/// Test double that records calls from every session it opens.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    events: Arc<Mutex<Vec<AudioEvent>>>,
}

impl RecordingAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<AudioEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sessions opened and not yet closed.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.events().iter().fold(0usize, |open, event| match event {
            AudioEvent::Opened => open + 1,
            AudioEvent::Closed => open.saturating_sub(1),
            _ => open,
        })
    }
}

impl AudioBackend for RecordingAudio {
    fn open(&self) -> Box<dyn AudioSession> {
        let mut session = RecordingSession {
            events: Arc::clone(&self.events),
            closed: false,
        };
        session.record(AudioEvent::Opened);
        Box::new(session)
    }
}

struct RecordingSession {
    events: Arc<Mutex<Vec<AudioEvent>>>,
    closed: bool,
}

impl RecordingSession {
    fn record(&mut self, event: AudioEvent) {
        if self.closed {
            return;
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl AudioSession for RecordingSession {
    fn play_cue(&mut self, cue: Cue) {
        self.record(AudioEvent::Cue(cue));
    }

    fn play_music(&mut self, track: &MusicTrack) {
        self.record(AudioEvent::PlayMusic(track.url.clone()));
    }

    fn pause_music(&mut self) {
        self.record(AudioEvent::PauseMusic);
    }

    fn resume_music(&mut self) {
        self.record(AudioEvent::ResumeMusic);
    }

    fn stop_music(&mut self) {
        self.record(AudioEvent::StopMusic);
    }

    fn close(&mut self) {
        self.record(AudioEvent::Closed);
        self.closed = true;
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.close();
    }
}
