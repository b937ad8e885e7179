/// One navigable page: a TOC link carrying the page id and the path of the
/// pre-rendered fragment that backs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PageEntry {
    pub page_id: String,
    pub file: String,
}

/// A single player row as read from the rendered markup.
///
/// `name` is stored case-folded so search matching never has to normalize it
/// again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlayerRow {
    pub name: String,
    pub is_minors: bool,
    pub is_hurt: bool,
}

impl PlayerRow {
    pub fn new(name: &str, is_minors: bool, is_hurt: bool) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            is_minors,
            is_hurt,
        }
    }
}

/// An entry of a role list, in document order: either a sub-group header
/// (e.g. "Catchers") or a player row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RosterItem {
    Header,
    Player(PlayerRow),
}

impl RosterItem {
    pub fn player(&self) -> Option<&PlayerRow> {
        match self {
            RosterItem::Player(row) => Some(row),
            RosterItem::Header => None,
        }
    }
}

/// One role list (e.g. batters or pitchers) of a team block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RoleList {
    pub role: String,
    pub items: Vec<RosterItem>,
}

/// The global search/filter state. The query is kept normalized (trimmed and
/// case-folded); "searching" is derived from query non-emptiness.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FilterState {
    pub query: String,
    pub hide_minors: bool,
    pub hide_hurt: bool,
}

impl FilterState {
    pub fn new(raw_query: &str, hide_minors: bool, hide_hurt: bool) -> Self {
        Self {
            query: normalize_query(raw_query),
            hide_minors,
            hide_hurt,
        }
    }

    pub fn searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// The row predicate: a row is visible iff it matches the query (when one
    /// is set) and is not excluded by either checkbox filter.
    pub fn row_visible(&self, row: &PlayerRow) -> bool {
        if self.searching() && !row.name.contains(&self.query) {
            return false;
        }
        if self.hide_minors && row.is_minors {
            return false;
        }
        if self.hide_hurt && row.is_hurt {
            return false;
        }
        true
    }
}

pub(crate) fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_trims_and_casefolds() {
        assert_eq!(normalize_query("  SmItH "), "smith");
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_player_row_name_is_casefolded() {
        let row = PlayerRow::new("  John SMITH ", false, false);
        assert_eq!(row.name, "john smith");
    }

    #[test]
    fn test_empty_query_is_not_searching() {
        assert!(!FilterState::new("", false, false).searching());
        assert!(!FilterState::new("   ", true, true).searching());
        assert!(FilterState::new("a", false, false).searching());
    }

    #[test]
    fn test_row_visible_truth_table() {
        // Every combination of {matches query, is_minors, is_hurt}
        // x {hide_minors, hide_hurt}.
        for matches in [false, true] {
            for is_minors in [false, true] {
                for is_hurt in [false, true] {
                    for hide_minors in [false, true] {
                        for hide_hurt in [false, true] {
                            let name = if matches { "smith" } else { "jones" };
                            let row = PlayerRow::new(name, is_minors, is_hurt);
                            let filters = FilterState::new("smith", hide_minors, hide_hurt);

                            let expected = matches
                                && !(hide_minors && is_minors)
                                && !(hide_hurt && is_hurt);
                            assert_eq!(
                                filters.row_visible(&row),
                                expected,
                                "matches={matches} minors={is_minors} hurt={is_hurt} \
                                 hide_minors={hide_minors} hide_hurt={hide_hurt}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_row_visible_without_query_ignores_name() {
        let filters = FilterState::new("", true, false);
        assert!(filters.row_visible(&PlayerRow::new("anyone", false, true)));
        assert!(!filters.row_visible(&PlayerRow::new("anyone", true, false)));
    }

    #[test]
    fn test_row_visible_query_is_substring_match() {
        let filters = FilterState::new("mit", false, false);
        assert!(filters.row_visible(&PlayerRow::new("John Smith", false, false)));
        assert!(!filters.row_visible(&PlayerRow::new("John Jones", false, false)));
    }
}
