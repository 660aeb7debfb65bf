use std::sync::Arc;

use storage::repository::{FlagRecord, FlagRepository};

use crate::Clock;
use crate::error::ProgressError;

/// Stored value for a set flag.
pub const FLAG_SET: &str = "1";

/// Durable progress flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKey {
    QuizPassed,
    CountdownSkipped,
}

impl FlagKey {
    pub const ALL: [FlagKey; 2] = [FlagKey::QuizPassed, FlagKey::CountdownSkipped];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKey::QuizPassed => "quiz-passed",
            FlagKey::CountdownSkipped => "countdown-skipped",
        }
    }
}

/// Reads and writes the persisted progress flags.
///
/// Reads are fail-safe: a storage failure is logged and treated as "flag not
/// set", so a broken database sends the visitor back through the gates
/// instead of crashing.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    flags: Arc<dyn FlagRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, flags: Arc<dyn FlagRepository>) -> Self {
        Self { clock, flags }
    }

    /// Strict read of a flag.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the repository cannot be read.
    pub async fn is_set(&self, key: FlagKey) -> Result<bool, ProgressError> {
        let record = self.flags.get_flag(key.as_str()).await?;
        Ok(record.is_some_and(|r| r.value == FLAG_SET))
    }

    pub async fn quiz_passed(&self) -> bool {
        self.is_set_or_default(FlagKey::QuizPassed).await
    }

    pub async fn countdown_skipped(&self) -> bool {
        self.is_set_or_default(FlagKey::CountdownSkipped).await
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the flag cannot be written.
    pub async fn mark_quiz_passed(&self) -> Result<(), ProgressError> {
        self.mark(FlagKey::QuizPassed).await
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the flag cannot be written.
    pub async fn mark_countdown_skipped(&self) -> Result<(), ProgressError> {
        self.mark(FlagKey::CountdownSkipped).await
    }

    /// Clear every progress flag. Returns how many were set.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if a flag cannot be removed.
    pub async fn reset(&self) -> Result<usize, ProgressError> {
        let mut cleared = 0;
        for key in FlagKey::ALL {
            if self.flags.clear_flag(key.as_str()).await? {
                cleared += 1;
            }
        }
        tracing::info!(cleared, "progress flags reset");
        Ok(cleared)
    }

    /// All stored flags, for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the repository cannot be read.
    pub async fn snapshot(&self) -> Result<Vec<FlagRecord>, ProgressError> {
        Ok(self.flags.list_flags().await?)
    }

    async fn mark(&self, key: FlagKey) -> Result<(), ProgressError> {
        self.flags
            .set_flag(key.as_str(), FLAG_SET, self.clock.now())
            .await?;
        tracing::info!(flag = key.as_str(), "progress flag set");
        Ok(())
    }

    async fn is_set_or_default(&self, key: FlagKey) -> bool {
        match self.is_set(key).await {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(flag = key.as_str(), error = %err, "flag read failed; assuming unset");
                false
            }
        }
    }
}
