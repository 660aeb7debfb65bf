use dioxus::prelude::*;
use services::Cue;

use crate::audio::use_audio_session;
use crate::context::AppContext;
use crate::views::timers::use_timer_slot;
use crate::vm::{InviteKind, map_reveal};

/// Final invitation, introduced by a short "switching profile" screen.
#[component]
pub fn RevealView(on_dismiss: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let config = ctx.config();
    let intro = config.reveal.intro;
    let invite = map_reveal(&config.reveal.content);
    let audio = use_audio_session();
    let timer = use_timer_slot();
    let mut opened = use_signal(|| intro.is_zero());

    use_hook(move || {
        if intro.is_zero() {
            audio.cue(Cue::Correct);
            return;
        }
        timer.arm(intro, move || {
            opened.set(true);
            audio.cue(Cue::Correct);
        });
    });

    if !opened() {
        return rsx! {
            div { class: "stage reveal reveal--intro",
                if let Some(image) = invite.profile_image.as_ref() {
                    img { class: "reveal-avatar", src: "{image}", alt: "" }
                }
                p { class: "reveal-switching", "Switching to {invite.profile_name}…" }
            }
        };
    }

    let kind_class = match invite.kind {
        InviteKind::Cinema => "reveal-ticket reveal-ticket--cinema",
        InviteKind::Date => "reveal-ticket reveal-ticket--date",
    };
    let rows = invite.rows.iter().map(|row| {
        rsx! {
            div { key: "{row.label}", class: "reveal-row",
                span { class: "reveal-row-label", "{row.label}" }
                span { class: "reveal-row-value", "{row.value}" }
            }
        }
    });

    rsx! {
        div { class: "stage reveal",
            div { class: "{kind_class}",
                if let Some(poster) = invite.poster_url.as_ref() {
                    img { class: "reveal-poster", src: "{poster}", alt: "" }
                }
                h1 { class: "reveal-title", "{invite.title}" }
                div { class: "reveal-rows", {rows} }
                if let Some(ticket) = invite.ticket_number.as_ref() {
                    p { class: "reveal-ticket-number", "Ticket {ticket}" }
                }
                if let Some(qr) = invite.qr_code_data.as_ref() {
                    code { class: "reveal-qr", "{qr}" }
                }
                if let Some(message) = invite.message_html.as_ref() {
                    div { class: "reveal-message", dangerous_inner_html: "{message}" }
                }
            }
            button {
                class: "btn btn-secondary reveal-replay",
                r#type: "button",
                onclick: move |_| on_dismiss.call(()),
                "Watch our story again"
            }
        }
    }
}
