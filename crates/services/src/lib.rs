#![forbid(unsafe_code)]

pub mod app_services;
pub mod audio;
pub mod error;
pub mod progress_service;
pub mod quiz_service;
pub mod stage_controller;

pub use greeting_core::Clock;

pub use app_services::AppServices;
pub use audio::{AudioBackend, AudioEvent, AudioSession, Cue, RecordingAudio, SilentAudio};
pub use error::{AppServicesError, ProgressError, StageError};
pub use progress_service::{FLAG_SET, FlagKey, ProgressService};
pub use quiz_service::QuizService;
pub use stage_controller::StageController;
