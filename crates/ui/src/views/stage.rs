use dioxus::prelude::*;
use greeting_core::stage::Stage;
use services::StageError;

use crate::context::AppContext;
use crate::views::{
    CountdownView, QuizView, RevealView, StoriesView, ViewError, ViewState,
    view_state_from_resource,
};

fn apply_transition(mut stage: Signal<Option<Stage>>, result: Result<Stage, StageError>) {
    match result {
        Ok(next) => stage.set(Some(next)),
        Err(err) => tracing::warn!(error = %err, "stage transition rejected"),
    }
}

/// Mounts exactly one stage. Switching stages unmounts the previous one,
/// which cancels its timers and closes its audio session.
#[component]
pub fn StageView() -> Element {
    let ctx = use_context::<AppContext>();
    let stages = ctx.stages();
    let stage = use_signal(|| None::<Stage>);

    let init = {
        let stages = stages.clone();
        use_resource(move || {
            let stages = stages.clone();
            async move { Ok::<_, ViewError>(stages.initialize().await) }
        })
    };

    let on_countdown_done = {
        let stages = stages.clone();
        use_callback(move |skipped: bool| {
            let stages = stages.clone();
            spawn(async move {
                let result = if skipped {
                    stages.skip_countdown().await
                } else {
                    stages.on_countdown_reached().await
                };
                apply_transition(stage, result);
            });
        })
    };

    let on_quiz_passed = {
        let stages = stages.clone();
        use_callback(move |()| {
            let stages = stages.clone();
            spawn(async move {
                apply_transition(stage, stages.on_quiz_passed().await);
            });
        })
    };

    let on_slideshow_end = {
        let stages = stages.clone();
        use_callback(move |()| apply_transition(stage, stages.on_slideshow_sequence_end()))
    };

    let on_reveal_dismissed = {
        let stages = stages.clone();
        use_callback(move |()| apply_transition(stage, stages.on_reveal_dismissed()))
    };

    let state = match stage() {
        Some(current) => ViewState::Ready(current),
        None => view_state_from_resource(&init),
    };

    match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            div { class: "stage stage--loading" }
        },
        ViewState::Error(_) => rsx! {
            div { class: "stage stage--error",
                p { {ViewError::message()} }
            }
        },
        ViewState::Ready(Stage::Countdown) => rsx! {
            CountdownView { on_done: on_countdown_done }
        },
        ViewState::Ready(Stage::Quiz) => rsx! {
            QuizView { on_passed: on_quiz_passed }
        },
        ViewState::Ready(Stage::Slideshow) => rsx! {
            StoriesView { on_end: on_slideshow_end }
        },
        ViewState::Ready(Stage::Reveal) => rsx! {
            RevealView { on_dismiss: on_reveal_dismissed }
        },
    }
}
