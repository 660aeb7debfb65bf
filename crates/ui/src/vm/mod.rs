mod countdown_vm;
mod markdown_vm;
mod quiz_vm;
mod reveal_vm;
mod stories_vm;

pub use countdown_vm::{CountdownUnit, CountdownVm, map_countdown};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use quiz_vm::{ChoiceVm, LivesVm, QuizScreen, QuizVm, fill_score};
pub use reveal_vm::{InviteKind, InviteRow, InviteVm, map_reveal};
pub use stories_vm::{
    MusicChange, SlideBody, SlideVm, StoriesVm, StoryAction, StoryEvent, segment_width,
};
