// src/content.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::types::{Blob, Content, Message, Part, Role};

static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+);base64,(?P<data>.+)$").unwrap()
});

/// Split a `data:<mime>;base64,<payload>` string into its declared mime type
/// and raw base64 payload.
pub fn parse_data_url(image: &str) -> Option<(String, String)> {
    let caps = DATA_URL.captures(image)?;
    Some((caps["mime"].to_string(), caps["data"].to_string()))
}

/// Rebuild the transcript, then the pending input, as provider contents. The
/// whole history goes out on every request; there is no server-side session,
/// which is what lets images sit anywhere in the transcript.
pub fn build_contents(
    history: &[Message],
    pending_text: &str,
    pending_image: Option<&str>,
) -> Vec<Content> {
    debug_assert!(
        !pending_text.is_empty() || pending_image.is_some(),
        "pending turn must carry text or an image"
    );

    let mut contents = Vec::with_capacity(history.len() + 1);
    for msg in history {
        push_turn(&mut contents, msg.role.as_str(), &msg.text, msg.image.as_deref());
    }
    push_turn(&mut contents, Role::User.as_str(), pending_text, pending_image);
    contents
}

fn push_turn(contents: &mut Vec<Content>, role: &str, text: &str, image: Option<&str>) {
    let mut parts = Vec::new();

    // The image part goes before the text part within a turn.
    if let Some(image) = image {
        match parse_data_url(image) {
            Some((mime_type, data)) => parts.push(Part::InlineData {
                inline_data: Blob { mime_type, data },
            }),
            None => warn!("dropping image that is not a base64 data URL"),
        }
    }
    if !text.is_empty() {
        parts.push(Part::Text {
            text: text.to_string(),
        });
    }

    if !parts.is_empty() {
        contents.push(Content {
            role: role.to_string(),
            parts,
        });
    }
}
