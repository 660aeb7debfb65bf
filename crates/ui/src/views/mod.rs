mod countdown;
mod quiz;
mod reveal;
mod stage;
mod state;
mod stories;
pub(crate) mod timers;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use countdown::CountdownView;
pub use quiz::QuizView;
pub use reveal::RevealView;
pub use stage::StageView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use stories::StoriesView;
