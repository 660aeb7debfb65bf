use greeting_core::model::{CinemaInvite, DateInvite, Reveal};

use super::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InviteKind {
    Cinema,
    Date,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InviteRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InviteVm {
    pub kind: InviteKind,
    pub title: String,
    pub rows: Vec<InviteRow>,
    pub message_html: Option<String>,
    pub poster_url: Option<String>,
    pub ticket_number: Option<String>,
    pub qr_code_data: Option<String>,
    pub profile_name: String,
    pub profile_image: Option<String>,
}

#[must_use]
pub fn map_reveal(reveal: &Reveal) -> InviteVm {
    match reveal {
        Reveal::Cinema(invite) => map_cinema(invite),
        Reveal::Date(invite) => map_date(invite),
    }
}

fn rows(fields: &[(&'static str, &Option<String>)]) -> Vec<InviteRow> {
    fields
        .iter()
        .filter_map(|&(label, value)| {
            value.as_ref().map(|v| InviteRow {
                label,
                value: v.clone(),
            })
        })
        .collect()
}

fn message_html(message: Option<&String>) -> Option<String> {
    message.map(|m| markdown_to_html(m))
}

fn map_cinema(invite: &CinemaInvite) -> InviteVm {
    let mut all = rows(&[
        ("Cinema", &invite.cinema),
        ("Date", &invite.date),
        ("Time", &invite.time),
        ("Seats", &invite.seats),
    ]);
    if let Some(screen) = &invite.screen {
        all.push(InviteRow {
            label: "Screen",
            value: screen.clone(),
        });
    }
    InviteVm {
        kind: InviteKind::Cinema,
        title: invite
            .movie_title
            .clone()
            .unwrap_or_else(|| "Movie night".to_string()),
        rows: all,
        message_html: message_html(invite.message.as_ref()),
        poster_url: invite.poster_url.clone(),
        ticket_number: invite.ticket_number.clone(),
        qr_code_data: invite.qr_code_data.clone(),
        profile_name: invite
            .profile_name
            .clone()
            .unwrap_or_else(|| "Cinema".to_string()),
        profile_image: invite.profile_image.clone(),
    }
}

fn map_date(invite: &DateInvite) -> InviteVm {
    InviteVm {
        kind: InviteKind::Date,
        title: invite
            .title
            .clone()
            .unwrap_or_else(|| "A date with me".to_string()),
        rows: rows(&[
            ("Place", &invite.place),
            ("Date", &invite.date),
            ("Time", &invite.time),
        ]),
        message_html: message_html(invite.message.as_ref()),
        poster_url: None,
        ticket_number: None,
        qr_code_data: None,
        profile_name: "Invitation".to_string(),
        profile_image: None,
    }
}
