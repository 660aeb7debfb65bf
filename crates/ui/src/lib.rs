pub mod app;
pub mod audio;
pub mod context;
pub mod vm;
pub mod views;

#[cfg(test)]
mod test_fixtures;

pub use app::App;
pub use audio::WebAudio;
pub use context::{AppContext, UiApp, build_app_context};
