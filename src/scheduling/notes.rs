//! Structured client data stored in a reservation's free-text notes.
//!
//! The store only has a single `notes` column, so client name and phone are
//! written as prefixed lines:
//!
//! ```text
//! Cliente: Ana Pérez
//! Tel: 987654321
//! Notas: trae pelotas
//! ```
//!
//! `Notas:` always comes last and may span several lines. Notes written
//! before this convention existed have no prefix at all and decode as the
//! free-form note.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

static PREFIXED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(cliente|tel|notas):\s*(.*)$").expect("valid notes regex")
});

/// Decoded contents of a notes field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientNotes {
    pub client_name: String,
    pub client_phone: String,
    pub note: String,
}

/// Encode client data into the notes convention.
///
/// Empty fields are omitted; `None` when every field is empty.
pub fn encode(name: &str, phone: &str, note: &str) -> Option<String> {
    let lines: Vec<String> = [("Cliente", name), ("Tel", phone), ("Notas", note)]
        .into_iter()
        .filter_map(|(prefix, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| format!("{}: {}", prefix, value))
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Decode a notes field. Unprefixed text becomes the free-form note.
pub fn decode(raw: Option<&str>) -> ClientNotes {
    let raw = raw.unwrap_or_default().trim();
    if raw.is_empty() {
        return ClientNotes::default();
    }

    let mut decoded = ClientNotes::default();
    let mut matched = false;
    let mut lines = raw.lines();

    while let Some(line) = lines.next() {
        let Some(caps) = PREFIXED_LINE.captures(line) else {
            continue;
        };
        matched = true;
        let value = caps[2].trim();
        match caps[1].to_ascii_lowercase().as_str() {
            "cliente" if decoded.client_name.is_empty() => decoded.client_name = value.to_string(),
            "tel" if decoded.client_phone.is_empty() => decoded.client_phone = value.to_string(),
            "notas" => {
                // Free-form note runs to the end of the field
                let rest: Vec<&str> = std::iter::once(&caps[2]).chain(lines.by_ref()).collect();
                decoded.note = rest.join("\n").trim().to_string();
                break;
            }
            _ => {}
        }
    }

    if !matched
        || (decoded.client_name.is_empty()
            && decoded.client_phone.is_empty()
            && decoded.note.is_empty())
    {
        return ClientNotes {
            note: raw.to_string(),
            ..ClientNotes::default()
        };
    }
    decoded
}
