use crate::models::{FilterState, RoleList, RosterItem};
use std::collections::HashMap;

/// Role tab a team falls back to when it is expanded outside of search mode.
pub(crate) const DEFAULT_ROLE: &str = "batters";

/// Search mode is an explicit state machine rather than a flag scattered over
/// the DOM: entering search captures each team's pre-search collapse state
/// exactly once so leaving search can restore it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Browsing,
    Searching {
        prev_collapsed: HashMap<String, bool>,
    },
}

impl Mode {
    pub fn is_searching(&self) -> bool {
        matches!(self, Mode::Searching { .. })
    }
}

/// Collapse state a team reverts to when search mode ends: the captured
/// pre-search state if present, else the persisted flag, else collapsed.
pub(crate) fn restore_collapsed(
    prev_collapsed: &HashMap<String, bool>,
    team: &str,
    persisted: Option<bool>,
) -> bool {
    prev_collapsed
        .get(team)
        .copied()
        .or(persisted)
        .unwrap_or(true)
}

/// Computed display state for one role list, aligned index-for-index with
/// `RoleList::items`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RoleListPlan {
    pub list_visible: bool,
    pub item_visible: Vec<bool>,
}

/// Computed display state for one team block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TeamPlan {
    pub team_visible: bool,
    pub lists: Vec<RoleListPlan>,
}

/// Derives the display plan for a single role list.
///
/// Player rows are decided by the filter predicate alone. A sub-group header
/// is shown only when at least one player row between it and the next header
/// is shown. The list itself is shown only when it has a visible player AND
/// it is either the team's active tab or a search is in progress (search
/// spans all tabs).
pub(crate) fn derive_role_list(
    list: &RoleList,
    filters: &FilterState,
    is_active_tab: bool,
) -> RoleListPlan {
    let mut item_visible = vec![false; list.items.len()];

    for (i, item) in list.items.iter().enumerate() {
        if let Some(row) = item.player() {
            item_visible[i] = filters.row_visible(row);
        }
    }

    let any_player_visible = list
        .items
        .iter()
        .zip(item_visible.iter())
        .any(|(item, vis)| item.player().is_some() && *vis);

    // A header is visible iff its section (up to the next header) has a
    // visible player row.
    for i in 0..list.items.len() {
        if !matches!(list.items[i], RosterItem::Header) {
            continue;
        }

        let mut section_has_visible = false;
        for j in (i + 1)..list.items.len() {
            match list.items[j] {
                RosterItem::Header => break,
                RosterItem::Player(_) => {
                    if item_visible[j] {
                        section_has_visible = true;
                        break;
                    }
                }
            }
        }
        item_visible[i] = section_has_visible;
    }

    RoleListPlan {
        list_visible: any_player_visible && (is_active_tab || filters.searching()),
        item_visible,
    }
}

/// Derives the display plan for a whole team block.
///
/// The block is visible iff at least one of its player rows passes the filter
/// predicate, counting rows on inactive tabs too (collapse and tab selection
/// only hide rows, they do not exclude the team from matching).
pub(crate) fn derive_team(
    lists: &[RoleList],
    active_role: &str,
    filters: &FilterState,
) -> TeamPlan {
    let plans: Vec<RoleListPlan> = lists
        .iter()
        .map(|list| derive_role_list(list, filters, list.role == active_role))
        .collect();

    let team_visible = lists.iter().zip(plans.iter()).any(|(list, plan)| {
        list.items
            .iter()
            .zip(plan.item_visible.iter())
            .any(|(item, vis)| item.player().is_some() && *vis)
    });

    TeamPlan {
        team_visible,
        lists: plans,
    }
}
