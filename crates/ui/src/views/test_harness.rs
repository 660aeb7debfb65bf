use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use greeting_core::model::GreetingConfig;
use greeting_core::stage::Stage;
use greeting_core::time::fixed_clock;
use services::{
    AppServices, AudioBackend, Clock, FLAG_SET, FlagKey, QuizService, RecordingAudio,
    StageController,
};
use storage::repository::{FlagRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{CountdownView, QuizView, RevealView, StageView, StoriesView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    audio: RecordingAudio,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn config(&self) -> Arc<GreetingConfig> {
        self.services.config()
    }

    fn stages(&self) -> Arc<StageController> {
        self.services.stages()
    }

    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn audio(&self) -> Arc<dyn AudioBackend> {
        Arc::new(self.audio.clone())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Stage,
    Reveal,
    /// Stage components switched from the test through [`StageRemote`].
    Switch(Stage),
}

/// Test-side handle on the stage shown by a `ViewKind::Switch` harness.
#[derive(Clone)]
pub struct StageRemote {
    inner: Rc<RemoteInner>,
}

struct RemoteInner {
    initial: Stage,
    signal: RefCell<Option<Signal<Stage>>>,
    sequence_ends: Cell<usize>,
}

impl StageRemote {
    fn new(initial: Stage) -> Self {
        Self {
            inner: Rc::new(RemoteInner {
                initial,
                signal: RefCell::new(None),
                sequence_ends: Cell::new(0),
            }),
        }
    }

    fn attach(&self, signal: Signal<Stage>) {
        *self.inner.signal.borrow_mut() = Some(signal);
    }

    fn record_sequence_end(&self) {
        self.inner.sequence_ends.set(self.inner.sequence_ends.get() + 1);
    }

    /// How many times the slideshow reported its end.
    pub fn sequence_ends(&self) -> usize {
        self.inner.sequence_ends.get()
    }
}

impl PartialEq for StageRemote {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    remote: StageRemote,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn HarnessRoot(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    match props.view {
        ViewKind::Stage => rsx! { StageView {} },
        ViewKind::Reveal => rsx! { RevealView { on_dismiss: |()| {} } },
        ViewKind::Switch(_) => rsx! { SwitchRoot { remote: props.remote.clone() } },
    }
}

/// Mounts one stage component at a time, like `StageView`, but takes its
/// stage from the test instead of the controller.
#[component]
fn SwitchRoot(remote: StageRemote) -> Element {
    let mut stage = use_signal(|| remote.inner.initial);
    {
        let remote = remote.clone();
        use_hook(move || remote.attach(stage));
    }
    let on_end = use_callback(move |()| {
        remote.record_sequence_end();
        stage.set(Stage::Reveal);
    });

    match stage() {
        Stage::Countdown => rsx! {
            CountdownView { on_done: move |_| stage.set(Stage::Quiz) }
        },
        Stage::Quiz => rsx! {
            QuizView { on_passed: move |()| stage.set(Stage::Slideshow) }
        },
        Stage::Slideshow => rsx! {
            StoriesView { on_end }
        },
        Stage::Reveal => rsx! {
            RevealView { on_dismiss: move |()| stage.set(Stage::Slideshow) }
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub audio: RecordingAudio,
    pub remote: StageRemote,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let pending resources and first-poll tasks settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    /// Drive the dom for roughly `total`, letting timers fire.
    pub async fn run_for(&mut self, total: std::time::Duration) {
        let deadline = tokio::time::Instant::now() + total;
        while tokio::time::Instant::now() < deadline {
            self.drive_async().await;
        }
    }

    /// Show `stage` in a `ViewKind::Switch` harness.
    pub fn switch_to(&mut self, stage: Stage) {
        let signal = *self.remote.inner.signal.borrow();
        if let Some(mut signal) = signal {
            self.dom.in_runtime(|| signal.set(stage));
        }
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Flags to persist before the view mounts.
#[derive(Clone, Copy, Default)]
pub struct Preset {
    pub quiz_passed: bool,
}

pub async fn setup_view_harness(
    view: ViewKind,
    config: GreetingConfig,
    preset: Preset,
) -> ViewHarness {
    let storage = Storage::in_memory();
    if preset.quiz_passed {
        storage
            .flags
            .set_flag(FlagKey::QuizPassed.as_str(), FLAG_SET, fixed_clock().now())
            .await
            .expect("preset flag");
    }

    let services = AppServices::new(&storage, fixed_clock(), config);
    let audio = RecordingAudio::new();
    let app = Arc::new(TestApp {
        services,
        audio: audio.clone(),
    });

    let initial = match view {
        ViewKind::Switch(stage) => stage,
        ViewKind::Stage | ViewKind::Reveal => Stage::Quiz,
    };
    let remote = StageRemote::new(initial);
    let dom = VirtualDom::new_with_props(
        HarnessRoot,
        HarnessProps {
            app,
            view,
            remote: remote.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        audio,
        remote,
    }
}
