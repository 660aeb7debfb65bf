//! Webview audio backend and the per-stage audio hook.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dioxus::document::eval;
use dioxus::prelude::*;
use greeting_core::model::MusicTrack;
use services::{AudioBackend, AudioSession, Cue};

use crate::context::AppContext;

/// Plays cues with Web Audio oscillators and music through an `<audio>`
/// element owned by the webview.
///
/// Each session keeps its own `AudioContext` and music element under
/// `window.__greetingAudio.sessions[id]`. Closing one session never touches
/// another, so the next stage may open before the previous one closes.
#[derive(Debug, Clone, Default)]
pub struct WebAudio {
    next_id: Arc<AtomicU64>,
}

impl WebAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_session_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl AudioBackend for WebAudio {
    fn open(&self) -> Box<dyn AudioSession> {
        let id = self.next_session_id();
        run(&open_script(id));
        Box::new(WebAudioSession { id, closed: false })
    }
}

struct WebAudioSession {
    id: u64,
    closed: bool,
}

impl WebAudioSession {
    fn exec(&self, script: &str) {
        if !self.closed {
            run(script);
        }
    }
}

impl AudioSession for WebAudioSession {
    fn play_cue(&mut self, cue: Cue) {
        self.exec(&cue_script(self.id, cue));
    }

    fn play_music(&mut self, track: &MusicTrack) {
        self.exec(&music_script(self.id, track));
    }

    fn pause_music(&mut self) {
        self.exec(&with_session(
            self.id,
            "if (state.music) { state.music.pause(); }",
        ));
    }

    fn resume_music(&mut self) {
        self.exec(&with_session(
            self.id,
            "if (state.music) { state.music.play().catch(() => {}); }",
        ));
    }

    fn stop_music(&mut self) {
        self.exec(&with_session(
            self.id,
            "if (state.music) { state.music.pause(); state.music = null; }",
        ));
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        run(&close_script(self.id));
        self.closed = true;
    }
}

impl Drop for WebAudioSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn run(script: &str) {
    // Playback is decoration; a failed script only gets logged.
    let eval = eval(script);
    spawn(async move {
        if let Err(err) = eval.await {
            tracing::debug!(error = ?err, "audio script failed");
        }
    });
}

/// Wrap `body` so it runs with `state` bound to session `id`. Does nothing
/// once the session is gone.
fn with_session(id: u64, body: &str) -> String {
    format!(
        r"(function() {{
    const root = window.__greetingAudio;
    const state = root && root.sessions[{id}];
    if (!state) {{ return; }}
    {body}
}})();"
    )
}

pub(crate) fn open_script(id: u64) -> String {
    format!(
        r"(function() {{
    const root = window.__greetingAudio || (window.__greetingAudio = {{ sessions: {{}} }});
    const Ctx = window.AudioContext || window.webkitAudioContext;
    root.sessions[{id}] = {{ ctx: Ctx ? new Ctx() : null, music: null }};
}})();"
    )
}

pub(crate) fn close_script(id: u64) -> String {
    with_session(
        id,
        &format!(
            "if (state.music) {{ state.music.pause(); }}
    if (state.ctx) {{ state.ctx.close().catch(() => {{}}); }}
    delete root.sessions[{id}];"
        ),
    )
}

/// Tone frequencies (Hz) played in sequence for a cue.
fn cue_tones(cue: Cue) -> &'static [u32] {
    match cue {
        Cue::Correct => &[523, 659, 784],
        Cue::Wrong => &[220, 196],
        Cue::SlideChange => &[880],
    }
}

pub(crate) fn cue_script(id: u64, cue: Cue) -> String {
    let tones = cue_tones(cue)
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let vibrate = if cue == Cue::SlideChange {
        "if (navigator.vibrate) { navigator.vibrate(15); }"
    } else {
        ""
    };
    with_session(
        id,
        &format!(
            r"{vibrate}
    const ctx = state.ctx;
    if (!ctx) {{ return; }}
    [{tones}].forEach((freq, i) => {{
        const osc = ctx.createOscillator();
        const gain = ctx.createGain();
        const start = ctx.currentTime + i * 0.12;
        osc.frequency.value = freq;
        gain.gain.setValueAtTime(0.15, start);
        gain.gain.exponentialRampToValueAtTime(0.001, start + 0.2);
        osc.connect(gain).connect(ctx.destination);
        osc.start(start);
        osc.stop(start + 0.22);
    }});"
        ),
    )
}

pub(crate) fn music_script(id: u64, track: &MusicTrack) -> String {
    let url = &track.url;
    let start = track.start_secs;
    with_session(
        id,
        &format!(
            r"if (state.music) {{ state.music.pause(); }}
    const music = new Audio({url:?});
    music.loop = true;
    music.currentTime = {start};
    state.music = music;
    music.play().catch(() => {{}});"
        ),
    )
}

/// Audio session scoped to the calling component.
#[derive(Clone)]
pub struct AudioHandle {
    session: Rc<RefCell<Box<dyn AudioSession>>>,
}

impl AudioHandle {
    pub fn cue(&self, cue: Cue) {
        self.session.borrow_mut().play_cue(cue);
    }

    pub fn play_music(&self, track: &MusicTrack) {
        self.session.borrow_mut().play_music(track);
    }

    pub fn pause_music(&self) {
        self.session.borrow_mut().pause_music();
    }

    pub fn resume_music(&self) {
        self.session.borrow_mut().resume_music();
    }

    pub fn stop_music(&self) {
        self.session.borrow_mut().stop_music();
    }
}

/// Opens a session on mount and closes it on unmount.
pub fn use_audio_session() -> AudioHandle {
    let ctx = use_context::<AppContext>();
    let handle = use_hook(move || AudioHandle {
        session: Rc::new(RefCell::new(ctx.audio().open())),
    });
    let on_drop = handle.clone();
    use_drop(move || on_drop.session.borrow_mut().close());
    handle
}
