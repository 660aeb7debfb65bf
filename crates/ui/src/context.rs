use std::sync::Arc;

use greeting_core::model::GreetingConfig;
use services::{AudioBackend, Clock, QuizService, StageController};

/// What the UI needs from the composition root.
pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn config(&self) -> Arc<GreetingConfig>;
    fn stages(&self) -> Arc<StageController>;
    fn quiz(&self) -> Arc<QuizService>;
    fn audio(&self) -> Arc<dyn AudioBackend>;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    config: Arc<GreetingConfig>,
    stages: Arc<StageController>,
    quiz: Arc<QuizService>,
    audio: Arc<dyn AudioBackend>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            config: app.config(),
            stages: app.stages(),
            quiz: app.quiz(),
            audio: app.audio(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn config(&self) -> Arc<GreetingConfig> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn stages(&self) -> Arc<StageController> {
        Arc::clone(&self.stages)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn audio(&self) -> Arc<dyn AudioBackend> {
        Arc::clone(&self.audio)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
