use std::sync::Arc;

use greeting_core::model::GreetingConfig;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;
use crate::stage_controller::StageController;

/// Assembles app-facing services around one storage backend and config.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    config: Arc<GreetingConfig>,
    progress: Arc<ProgressService>,
    stages: Arc<StageController>,
    quiz: Arc<QuizService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, config: GreetingConfig) -> Self {
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.flags)));
        let countdown = config.countdown.as_ref().map(|c| c.countdown);
        let stages = Arc::new(StageController::new(
            clock,
            countdown,
            Arc::clone(&progress),
        ));
        let quiz = Arc::new(QuizService::new(config.quiz.clone()));

        Self {
            clock,
            config: Arc::new(config),
            progress,
            stages,
            quiz,
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: GreetingConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock, config))
    }

    #[must_use]
    pub fn in_memory(clock: Clock, config: GreetingConfig) -> Self {
        Self::new(&Storage::in_memory(), clock, config)
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
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn stages(&self) -> Arc<StageController> {
        Arc::clone(&self.stages)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}
