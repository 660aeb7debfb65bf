use serde::{Deserialize, Serialize};

/// Movie-night invitation rendered as a cinema ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinemaInvite {
    pub movie_title: Option<String>,
    pub cinema: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub seats: Option<String>,
    pub screen: Option<String>,
    pub qr_code_data: Option<String>,
    pub ticket_number: Option<String>,
    pub poster_url: Option<String>,
    pub message: Option<String>,
    /// Name and avatar of the "profile" the reveal appears to come from.
    pub profile_name: Option<String>,
    pub profile_image: Option<String>,
}

/// Plain date invitation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateInvite {
    pub title: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub message: Option<String>,
}

/// Final stage content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reveal {
    Cinema(CinemaInvite),
    Date(DateInvite),
}

impl Reveal {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Reveal::Cinema(invite) => invite.message.as_deref(),
            Reveal::Date(invite) => invite.message.as_deref(),
        }
    }
}
