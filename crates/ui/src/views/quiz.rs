use dioxus::prelude::*;
use greeting_core::quiz::QuizPhase;
use services::Cue;

use crate::audio::use_audio_session;
use crate::context::AppContext;
use crate::views::ViewError;
use crate::views::timers::use_timer_slot;
use crate::vm::{QuizScreen, QuizVm};

#[component]
pub fn QuizView(on_passed: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let rules = quiz.rules();
    let mut vm = use_signal(move || {
        QuizVm::start(quiz).map_err(|err| {
            tracing::error!(error = %err, "quiz configuration rejected");
            ViewError::Unknown
        })
    });
    let audio = use_audio_session();
    let timer = use_timer_slot();

    let advance = {
        let timer = timer.clone();
        use_callback(move |()| {
            timer.cancel();
            let screen = {
                let mut guard = vm.write();
                match guard.as_mut() {
                    Ok(vm) => vm.advance(),
                    Err(_) => return,
                }
            };
            match screen {
                Ok(QuizScreen::Celebration(_)) => {
                    timer.arm(rules.celebration, move || {
                        if let Ok(vm) = vm.write().as_mut() {
                            vm.finish_celebration();
                        }
                    });
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "quiz advance rejected"),
            }
        })
    };

    let select = {
        let timer = timer.clone();
        let audio = audio.clone();
        use_callback(move |index: usize| {
            let feedback = {
                let mut guard = vm.write();
                match guard.as_mut() {
                    Ok(vm) => vm.select(index),
                    Err(_) => return,
                }
            };
            match feedback {
                Ok(Some(feedback)) => {
                    audio.cue(if feedback.is_correct { Cue::Correct } else { Cue::Wrong });
                    timer.arm(rules.feedback, move || advance.call(()));
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "quiz selection rejected"),
            }
        })
    };

    let retry = {
        let timer = timer.clone();
        use_callback(move |()| {
            timer.cancel();
            let result = match vm.write().as_mut() {
                Ok(vm) => vm.retry(),
                Err(_) => return,
            };
            if let Err(err) = result {
                tracing::warn!(error = %err, "quiz retry rejected");
            }
        })
    };

    let guard = vm.read();
    let Ok(quiz_vm) = guard.as_ref() else {
        return rsx! {
            div { class: "stage quiz",
                p { {ViewError::message()} }
            }
        };
    };
    let copy = quiz_vm.copy().clone();

    let body = match quiz_vm.screen() {
        QuizScreen::Question => {
            let prompt = quiz_vm.prompt().to_string();
            let progress = quiz_vm.progress_label();
            let show_next = quiz_vm.phase() == QuizPhase::Feedback;
            let hearts = quiz_vm.lives().map(|lives| lives.hearts()).unwrap_or_default();
            let choices = quiz_vm.choices().into_iter().map(|choice| {
                let index = choice.index;
                rsx! {
                    button {
                        key: "{index}",
                        class: "{choice.class}",
                        r#type: "button",
                        disabled: choice.disabled,
                        onclick: move |_| select.call(index),
                        if let Some(image) = choice.image.as_ref() {
                            img { class: "quiz-choice-image", src: "{image}", alt: "{choice.label}" }
                        } else {
                            span { "{choice.label}" }
                        }
                    }
                }
            });
            let heart_icons = hearts.into_iter().enumerate().map(|(i, alive)| {
                let class = if alive { "quiz-heart" } else { "quiz-heart quiz-heart--lost" };
                rsx! {
                    span { key: "{i}", class: "{class}", "♥" }
                }
            });
            rsx! {
                header { class: "quiz-header",
                    p { class: "quiz-intro", "{copy.intro}" }
                    div { class: "quiz-meta",
                        span { class: "quiz-progress", "{progress}" }
                        span { class: "quiz-lives", {heart_icons} }
                    }
                }
                h2 { class: "quiz-prompt", "{prompt}" }
                div { class: "quiz-choices", {choices} }
                if show_next {
                    button {
                        class: "btn btn-primary quiz-next",
                        r#type: "button",
                        onclick: move |_| advance.call(()),
                        "Next"
                    }
                }
            }
        }
        QuizScreen::Celebration(_) => {
            let image = quiz_vm.celebration_image().map(str::to_string);
            rsx! {
                div { class: "quiz-celebration",
                    if let Some(image) = image {
                        img { class: "quiz-celebration-image", src: "{image}", alt: "" }
                    }
                    h2 { "{copy.celebration_title}" }
                    p { "{copy.celebration_body}" }
                }
            }
        }
        QuizScreen::Passed(outcome) => rsx! {
            div { class: "quiz-result quiz-result--pass",
                h2 { "{copy.pass_title}" }
                p { class: "quiz-score", "{outcome.correct} / {outcome.total}" }
                p { "{copy.pass_body}" }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_passed.call(()),
                    "{copy.pass_button}"
                }
            }
        },
        QuizScreen::Failed(outcome) => {
            let body = quiz_vm.fail_body(outcome);
            rsx! {
                div { class: "quiz-result quiz-result--fail",
                    h2 { "{copy.fail_title}" }
                    p { "{body}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| retry.call(()),
                        "{copy.retry_button}"
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "stage quiz", {body} }
    }
}
