use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use greeting_core::SequenceError;
use greeting_core::model::{MusicTrack, Slide, SlideContent, SlideshowConfig};
use greeting_core::slideshow::{Advance, PlaybackState, SlideshowEngine, SlideshowOptions};

use super::markdown_vm::markdown_to_html;

/// Engine callbacks, queued so the view can react outside the engine borrow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoryEvent {
    SlideStarted(usize),
    SequenceEnded,
}

/// Music change the view should apply after an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MusicChange {
    Play(MusicTrack),
    Keep,
}

/// Visitor navigation, from tap targets or the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoryAction {
    Next,
    Previous,
    TogglePause,
}

impl StoryAction {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" => Some(Self::Next),
            "ArrowLeft" => Some(Self::Previous),
            " " | "Spacebar" => Some(Self::TogglePause),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlideBody {
    Photo {
        image: String,
        caption: Option<String>,
        sticker: Option<String>,
    },
    Text {
        heading: String,
        body_html: String,
    },
    List {
        heading: String,
        items: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlideVm {
    pub index: usize,
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub profile_image: Option<String>,
    pub body: SlideBody,
    pub segments: Vec<f32>,
    pub paused: bool,
    /// Track the stage considers current, for the now-playing pill.
    pub music: Option<MusicTrack>,
}

pub struct StoriesVm {
    engine: SlideshowEngine,
    events: Rc<RefCell<VecDeque<StoryEvent>>>,
    playing: Option<MusicTrack>,
    // selected while paused, started on resume
    deferred: bool,
}

impl StoriesVm {
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidInput` for an empty slide list.
    pub fn start(config: &SlideshowConfig) -> Result<Self, SequenceError> {
        let events = Rc::new(RefCell::new(VecDeque::new()));
        let on_start = Rc::clone(&events);
        let on_end = Rc::clone(&events);
        let options = SlideshowOptions::new()
            .looping(config.loop_enabled)
            .default_duration(config.default_duration)
            .resume_policy(config.resume)
            .on_slide_start(move |index| {
                on_start.borrow_mut().push_back(StoryEvent::SlideStarted(index));
            })
            .on_sequence_end(move || on_end.borrow_mut().push_back(StoryEvent::SequenceEnded));
        let engine = SlideshowEngine::start(config.slides.clone(), options)?;
        Ok(Self {
            engine,
            events,
            playing: None,
            deferred: false,
        })
    }

    pub fn tick(&mut self, delta: Duration) -> usize {
        self.engine.tick(delta)
    }

    pub fn next(&mut self) -> Advance {
        self.engine.advance()
    }

    pub fn previous(&mut self) -> Advance {
        self.engine.previous()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.engine.toggle_pause()
    }

    pub fn pause(&mut self) -> bool {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.engine.resume()
    }

    pub fn apply(&mut self, action: StoryAction) {
        match action {
            StoryAction::Next => {
                self.next();
            }
            StoryAction::Previous => {
                self.previous();
            }
            StoryAction::TogglePause => {
                self.toggle_pause();
            }
        }
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    /// Track to start on resume, if one was selected while paused.
    pub fn take_deferred_music(&mut self) -> Option<MusicTrack> {
        if !std::mem::take(&mut self.deferred) {
            return None;
        }
        self.playing.clone()
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    /// Take queued engine events in firing order.
    pub fn drain_events(&mut self) -> Vec<StoryEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    /// Music to apply when `index` becomes current. A slide without music keeps
    /// the current track; a slide with the track already playing keeps it too.
    /// While paused the new track is only recorded; see
    /// [`StoriesVm::take_deferred_music`].
    pub fn music_for(&mut self, index: usize) -> MusicChange {
        let Some(track) = self.engine.slides().get(index).and_then(Slide::music) else {
            return MusicChange::Keep;
        };
        if self.playing.as_ref().is_some_and(|p| p.url == track.url) {
            return MusicChange::Keep;
        }
        self.playing = Some(track.clone());
        if self.engine.is_paused() {
            self.deferred = true;
            return MusicChange::Keep;
        }
        self.deferred = false;
        MusicChange::Play(track.clone())
    }

    #[must_use]
    pub fn current(&self) -> Option<SlideVm> {
        let slide = self.engine.current()?;
        let header = slide.header();
        Some(SlideVm {
            index: self.engine.index(),
            heading: header.map(|h| h.heading.clone()),
            subheading: header.and_then(|h| h.subheading.clone()),
            profile_image: header.and_then(|h| h.profile_image.clone()),
            body: slide_body(slide.content()),
            segments: self.engine.segment_progress(),
            paused: self.engine.is_paused(),
            music: self.playing.clone(),
        })
    }
}

fn slide_body(content: &SlideContent) -> SlideBody {
    match content {
        SlideContent::Photo {
            image,
            caption,
            sticker,
        } => SlideBody::Photo {
            image: image.clone(),
            caption: caption.clone(),
            sticker: sticker.clone(),
        },
        SlideContent::Text { heading, body } => SlideBody::Text {
            heading: heading.clone(),
            body_html: markdown_to_html(body),
        },
        SlideContent::List { heading, items } => SlideBody::List {
            heading: heading.clone(),
            items: items.clone(),
        },
    }
}

/// CSS width for one progress segment.
#[must_use]
pub fn segment_width(fraction: f32) -> String {
    format!("width: {:.1}%", fraction.clamp(0.0, 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{sample_config, track};

    fn vm() -> StoriesVm {
        StoriesVm::start(&sample_config().slideshow).unwrap()
    }

    #[test]
    fn start_queues_first_slide_event() {
        let mut vm = vm();
        assert_eq!(vm.drain_events(), vec![StoryEvent::SlideStarted(0)]);
        assert!(vm.drain_events().is_empty());
    }

    #[test]
    fn timed_run_queues_sequence_end_once() {
        let mut vm = vm();
        vm.drain_events();
        assert_eq!(vm.tick(Duration::from_secs(15)), 3);
        assert_eq!(
            vm.drain_events(),
            vec![
                StoryEvent::SlideStarted(1),
                StoryEvent::SlideStarted(2),
                StoryEvent::SequenceEnded,
            ]
        );
        assert!(vm.current().is_none());
        assert_eq!(vm.next(), Advance::Ignored);
        assert!(vm.drain_events().is_empty());
    }

    #[test]
    fn music_changes_only_when_track_differs() {
        let mut vm = vm();
        assert_eq!(vm.music_for(0), MusicChange::Play(track("music/first.mp3")));
        assert_eq!(vm.music_for(0), MusicChange::Keep);
        assert_eq!(vm.music_for(1), MusicChange::Keep);
        assert_eq!(vm.music_for(2), MusicChange::Play(track("music/second.mp3")));
    }

    #[test]
    fn current_slide_maps_header_and_markdown() {
        let mut vm = vm();
        let first = vm.current().unwrap();
        assert_eq!(first.heading.as_deref(), Some("Memories"));
        assert_eq!(first.segments, vec![0.0, 0.0, 0.0]);

        vm.next();
        let second = vm.current().unwrap();
        let SlideBody::Text { body_html, .. } = second.body else {
            panic!("expected text slide");
        };
        assert!(body_html.contains("<strong>favourite</strong>"));
        assert_eq!(second.segments[0], 1.0);
    }

    #[test]
    fn pause_is_reflected_in_slide_vm() {
        let mut vm = vm();
        assert!(vm.toggle_pause());
        assert!(vm.current().unwrap().paused);
        assert_eq!(vm.tick(Duration::from_secs(10)), 0);
        assert!(vm.resume());
    }

    #[test]
    fn keys_map_to_navigation() {
        assert_eq!(StoryAction::from_key("ArrowRight"), Some(StoryAction::Next));
        assert_eq!(StoryAction::from_key("ArrowLeft"), Some(StoryAction::Previous));
        assert_eq!(StoryAction::from_key(" "), Some(StoryAction::TogglePause));
        assert_eq!(StoryAction::from_key("Enter"), None);
        assert_eq!(StoryAction::from_key("a"), None);
    }

    #[test]
    fn keyboard_actions_drive_the_engine() {
        let mut vm = vm();
        for key in ["ArrowRight", "ArrowRight", "ArrowLeft", " "] {
            vm.apply(StoryAction::from_key(key).unwrap());
        }
        let slide = vm.current().unwrap();
        assert_eq!(slide.index, 1);
        assert!(slide.paused);

        vm.apply(StoryAction::from_key(" ").unwrap());
        assert!(!vm.is_paused());
    }

    #[test]
    fn current_slide_reports_now_playing() {
        let mut vm = vm();
        assert_eq!(vm.current().unwrap().music, None);
        vm.music_for(0);
        vm.next();
        vm.music_for(1);
        // text slide has no music of its own; the first track carries on
        assert_eq!(vm.current().unwrap().music, Some(track("music/first.mp3")));
    }

    #[test]
    fn track_selected_while_paused_waits_for_resume() {
        let mut vm = vm();
        assert!(matches!(vm.music_for(0), MusicChange::Play(_)));
        vm.pause();
        vm.next();
        vm.next();
        assert_eq!(vm.music_for(2), MusicChange::Keep);
        assert_eq!(
            vm.current().unwrap().music,
            Some(track("music/second.mp3"))
        );

        vm.resume();
        assert_eq!(vm.take_deferred_music(), Some(track("music/second.mp3")));
        assert_eq!(vm.take_deferred_music(), None);
    }

    #[test]
    fn resume_without_new_track_has_nothing_deferred() {
        let mut vm = vm();
        vm.music_for(0);
        vm.pause();
        vm.resume();
        assert_eq!(vm.take_deferred_music(), None);
    }

    #[test]
    fn segment_width_is_clamped_percent() {
        assert_eq!(segment_width(0.5), "width: 50.0%");
        assert_eq!(segment_width(3.0), "width: 100.0%");
    }
}
