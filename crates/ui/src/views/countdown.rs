use std::time::Duration;

use dioxus::prelude::*;

use crate::audio::use_audio_session;
use crate::context::AppContext;
use crate::vm::map_countdown;

const TICK: Duration = Duration::from_secs(1);

/// Holds the card closed until the configured instant. `on_done(true)` means
/// the visitor chose to open it early.
#[component]
pub fn CountdownView(on_done: EventHandler<bool>) -> Element {
    let ctx = use_context::<AppContext>();
    let config = ctx.config();
    let clock = ctx.clock();
    let audio = use_audio_session();
    let mut now = use_signal(move || clock.now());

    let settings = config.countdown.clone();
    let countdown = settings.as_ref().map(|s| s.countdown);
    let music = settings.as_ref().and_then(|s| s.music.clone());

    use_hook(move || {
        if let Some(track) = music.as_ref() {
            audio.play_music(track);
        }
    });

    use_future(move || async move {
        let Some(countdown) = countdown else {
            return;
        };
        loop {
            tokio::time::sleep(TICK).await;
            let at = clock.now();
            now.set(at);
            if countdown.is_reached(at) {
                on_done.call(false);
                break;
            }
        }
    });

    let (Some(settings), Some(countdown)) = (settings, countdown) else {
        return rsx! {
            div { class: "stage countdown" }
        };
    };

    let vm = map_countdown(countdown, now());
    let units = vm.units.iter().map(|unit| {
        rsx! {
            div { class: "countdown-unit",
                span { class: "countdown-value", "{unit.value}" }
                span { class: "countdown-label", "{unit.label}" }
            }
        }
    });

    rsx! {
        div { class: "stage countdown",
            h1 { class: "countdown-title", "{settings.title}" }
            if let Some(subtitle) = settings.subtitle.as_ref() {
                p { class: "countdown-subtitle", "{subtitle}" }
            }
            div { class: "countdown-units", {units} }
            p { class: "countdown-target", "Opens {vm.target_label}" }
            button {
                class: "btn btn-ghost countdown-skip",
                r#type: "button",
                onclick: move |_| on_done.call(true),
                "Open it now"
            }
        }
    }
}
