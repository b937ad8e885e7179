//! Persisted UI state: best-effort string flags in localStorage. Every read
//! and write is guarded; when storage is unavailable the dashboard simply
//! runs without persistence.

pub(crate) const ACTIVE_PAGE_KEY: &str = "mlb_dash_active_page";
pub(crate) const TEAM_OPEN_KEY_PREFIX: &str = "mlb_dash_team_open__";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn team_open_key(team: &str) -> String {
    format!("{TEAM_OPEN_KEY_PREFIX}{team}")
}

/// Canonical encoding for the team-open flag: the key says "open", so "1"
/// means expanded and "0" means collapsed.
pub(crate) fn encode_team_open(collapsed: bool) -> &'static str {
    if collapsed {
        "0"
    } else {
        "1"
    }
}

/// Returns the collapsed flag, or `None` for unknown values so callers fall
/// through to their default.
pub(crate) fn decode_team_open(value: &str) -> Option<bool> {
    match value {
        "1" => Some(false),
        "0" => Some(true),
        _ => None,
    }
}

pub(crate) fn save_active_page(page_id: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(ACTIVE_PAGE_KEY, page_id);
    }
}

pub(crate) fn load_active_page() -> Option<String> {
    let page_id = local_storage()?.get_item(ACTIVE_PAGE_KEY).ok().flatten()?;
    if page_id.is_empty() {
        None
    } else {
        Some(page_id)
    }
}

pub(crate) fn save_team_collapsed(team: &str, collapsed: bool) {
    if team.is_empty() {
        return;
    }
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(&team_open_key(team), encode_team_open(collapsed));
    }
}

pub(crate) fn load_team_collapsed(team: &str) -> Option<bool> {
    if team.is_empty() {
        return None;
    }
    let value = local_storage()?
        .get_item(&team_open_key(team))
        .ok()
        .flatten()?;
    decode_team_open(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_open_key_includes_team() {
        assert_eq!(team_open_key("nyy"), "mlb_dash_team_open__nyy");
    }

    #[test]
    fn test_team_open_encoding_round_trip() {
        assert_eq!(decode_team_open(encode_team_open(true)), Some(true));
        assert_eq!(decode_team_open(encode_team_open(false)), Some(false));
    }

    #[test]
    fn test_decode_team_open_rejects_unknown_values() {
        assert_eq!(decode_team_open(""), None);
        assert_eq!(decode_team_open("yes"), None);
        assert_eq!(decode_team_open("2"), None);
    }
}
