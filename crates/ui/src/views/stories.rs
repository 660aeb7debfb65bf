use std::time::{Duration, Instant};

use dioxus::prelude::*;
use services::Cue;

use crate::audio::use_audio_session;
use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{MusicChange, SlideBody, StoriesVm, StoryAction, StoryEvent, segment_width};

const TICK: Duration = Duration::from_millis(100);

/// Story-style slideshow. Calls `on_end` once when a non-looping sequence
/// finishes.
#[component]
pub fn StoriesView(on_end: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let config = ctx.config();
    let audio = use_audio_session();
    let mut vm = use_signal(move || {
        StoriesVm::start(&config.slideshow).map_err(|err| {
            tracing::error!(error = %err, "slideshow configuration rejected");
            ViewError::Unknown
        })
    });

    let process_events = {
        let audio = audio.clone();
        use_callback(move |()| {
            let events = match vm.write().as_mut() {
                Ok(stories) => stories.drain_events(),
                Err(_) => return,
            };
            for event in events {
                match event {
                    StoryEvent::SlideStarted(index) => {
                        let change = match vm.write().as_mut() {
                            Ok(stories) => stories.music_for(index),
                            Err(_) => MusicChange::Keep,
                        };
                        if let MusicChange::Play(track) = change {
                            audio.play_music(&track);
                        }
                        if index > 0 {
                            audio.cue(Cue::SlideChange);
                        }
                    }
                    StoryEvent::SequenceEnded => {
                        audio.stop_music();
                        on_end.call(());
                    }
                }
            }
        })
    };

    // Cancelled with the component, so the ticker never outlives the stage.
    use_future(move || async move {
        process_events.call(());
        let mut last = Instant::now();
        loop {
            tokio::time::sleep(TICK).await;
            let now = Instant::now();
            let delta = now.duration_since(last);
            last = now;
            let advanced = match vm.write().as_mut() {
                Ok(stories) => stories.tick(delta),
                Err(_) => break,
            };
            if advanced > 0 {
                process_events.call(());
            }
        }
    });

    let act = {
        let audio = audio.clone();
        use_callback(move |action: StoryAction| {
            let toggled = match vm.write().as_mut() {
                Ok(stories) => {
                    stories.apply(action);
                    (action == StoryAction::TogglePause).then(|| {
                        let paused = stories.is_paused();
                        let deferred = if paused {
                            None
                        } else {
                            stories.take_deferred_music()
                        };
                        (paused, deferred)
                    })
                }
                Err(_) => return,
            };
            match toggled {
                Some((true, _)) => audio.pause_music(),
                Some((false, Some(track))) => audio.play_music(&track),
                Some((false, None)) => audio.resume_music(),
                None => {}
            }
            process_events.call(());
        })
    };

    let slide = match vm.read().as_ref() {
        Ok(stories) => stories.current(),
        Err(_) => {
            return rsx! {
                div { class: "stage stories",
                    p { {ViewError::message()} }
                }
            };
        }
    };
    let Some(slide) = slide else {
        return rsx! {
            div { class: "stage stories stories--ended" }
        };
    };

    let segments = slide.segments.iter().enumerate().map(|(i, fraction)| {
        let style = segment_width(*fraction);
        rsx! {
            div { key: "{i}", class: "stories-segment",
                div { class: "stories-segment-fill", style: "{style}" }
            }
        }
    });

    let body = match slide.body {
        SlideBody::Photo {
            image,
            caption,
            sticker,
        } => rsx! {
            div { class: "slide slide--photo",
                img { class: "slide-image", src: "{image}", alt: "" }
                if let Some(sticker) = sticker {
                    span { class: "slide-sticker", "{sticker}" }
                }
                if let Some(caption) = caption {
                    p { class: "slide-caption", "{caption}" }
                }
            }
        },
        SlideBody::Text { heading, body_html } => rsx! {
            div { class: "slide slide--text",
                h2 { "{heading}" }
                div { class: "slide-body", dangerous_inner_html: "{body_html}" }
            }
        },
        SlideBody::List { heading, items } => rsx! {
            div { class: "slide slide--list",
                h2 { "{heading}" }
                ul {
                    for (i, item) in items.iter().enumerate() {
                        li { key: "{i}", "{item}" }
                    }
                }
            }
        },
    };

    let pause_label = if slide.paused { "Play" } else { "Pause" };
    let stories_class = if slide.paused {
        "stage stories stories--paused"
    } else {
        "stage stories"
    };

    rsx! {
        div {
            class: "{stories_class}",
            "data-slide": "{slide.index}",
            tabindex: "0",
            autofocus: true,
            onkeydown: move |evt: KeyboardEvent| {
                if let Some(action) = StoryAction::from_key(&evt.key().to_string()) {
                    evt.prevent_default();
                    act.call(action);
                }
            },
            div { class: "stories-progress", {segments} }
            div { class: "stories-header",
                if let Some(image) = slide.profile_image.as_ref() {
                    img { class: "stories-avatar", src: "{image}", alt: "" }
                }
                div { class: "stories-header-text",
                    if let Some(heading) = slide.heading.as_ref() {
                        span { class: "stories-heading", "{heading}" }
                    }
                    if let Some(sub) = slide.subheading.as_ref() {
                        span { class: "stories-subheading", "{sub}" }
                    }
                }
                button {
                    class: "stories-pause",
                    r#type: "button",
                    onclick: move |_| act.call(StoryAction::TogglePause),
                    "{pause_label}"
                }
            }
            {body}
            if let Some(track) = slide.music.as_ref() {
                div { class: "slide-music",
                    span { class: "slide-music-title", "♪ {track.title}" }
                    if let Some(artist) = track.artist.as_ref() {
                        span { class: "slide-music-artist", "{artist}" }
                    }
                }
            }
            button {
                class: "stories-tap stories-tap--prev",
                r#type: "button",
                aria_label: "Previous",
                onclick: move |_| act.call(StoryAction::Previous),
            }
            button {
                class: "stories-tap stories-tap--next",
                r#type: "button",
                aria_label: "Next",
                onclick: move |_| act.call(StoryAction::Next),
            }
        }
    }
}
