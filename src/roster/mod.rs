//! Scans the pre-rendered roster markup into an explicit in-memory model and
//! writes computed display plans back as minimal DOM diffs. The scan runs
//! once at boot; derivations never re-query the document.

use crate::models::{PlayerRow, RoleList, RosterItem};
use crate::util::{set_displayed, toggle_class};
use crate::visibility::{TeamPlan, DEFAULT_ROLE};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Element handles for one role list, aligned index-for-index with the
/// corresponding `RoleList::items`.
pub(crate) struct RoleListEls {
    pub root: HtmlElement,
    pub item_els: Vec<HtmlElement>,
}

/// One team block: its model, its element handles, and its UI state
/// (collapse flag and active role tab).
pub(crate) struct TeamDom {
    pub team: String,
    pub block: HtmlElement,
    pub title_btn: Option<HtmlElement>,
    pub tabs_bar: Option<HtmlElement>,
    /// (role, tab element) pairs in document order.
    pub tabs: Vec<(String, HtmlElement)>,
    /// Role list models, aligned with `doms`.
    pub models: Vec<RoleList>,
    pub doms: Vec<RoleListEls>,
    pub collapsed: bool,
    pub active_role: String,
}

pub(crate) fn scan_roster(document: &Document) -> Vec<TeamDom> {
    let mut teams = Vec::new();

    let Ok(blocks) = document.query_selector_all(".team_block") else {
        return teams;
    };

    for i in 0..blocks.length() {
        let Some(block) = blocks.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let team = block.get_attribute("data-team").unwrap_or_default();

        let title_btn = block
            .query_selector(".team_title")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let tabs_bar = block
            .query_selector(".role_tabs")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let mut tabs = Vec::new();
        let mut active_role: Option<String> = None;
        if let Ok(tab_nodes) = block.query_selector_all(".role_tab") {
            for j in 0..tab_nodes.length() {
                let Some(tab) = tab_nodes.get(j).and_then(|n| n.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let role = tab.get_attribute("data-role").unwrap_or_default();
                if active_role.is_none() && tab.class_list().contains("active") {
                    active_role = Some(role.clone());
                }
                tabs.push((role, tab));
            }
        }

        let mut models = Vec::new();
        let mut doms = Vec::new();
        if let Ok(list_nodes) = block.query_selector_all(".role_list") {
            for j in 0..list_nodes.length() {
                let Some(root) = list_nodes.get(j).and_then(|n| n.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let role = root.get_attribute("data-role").unwrap_or_default();
                let (items, item_els) = scan_role_list_items(&root);
                models.push(RoleList { role, items });
                doms.push(RoleListEls { root, item_els });
            }
        }

        teams.push(TeamDom {
            team,
            block,
            title_btn,
            tabs_bar,
            tabs,
            models,
            doms,
            collapsed: true,
            active_role: active_role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        });
    }

    teams
}

/// Walks the children of a list's `.player_list` in document order and
/// classifies each as a sub-group header or a player row. Rows may be the
/// child itself or nested one level down inside a wrapper.
fn scan_role_list_items(list_root: &HtmlElement) -> (Vec<RosterItem>, Vec<HtmlElement>) {
    let mut items = Vec::new();
    let mut els = Vec::new();

    let Ok(Some(ul)) = list_root.query_selector(".player_list") else {
        return (items, els);
    };

    let kids = ul.children();
    for i in 0..kids.length() {
        let Some(kid) = kids.item(i) else {
            continue;
        };

        if kid.class_list().contains("sub_role_label") {
            if let Ok(header_el) = kid.dyn_into::<HtmlElement>() {
                items.push(RosterItem::Header);
                els.push(header_el);
            }
            continue;
        }

        let row_el = if kid.class_list().contains("player_li") {
            Some(kid)
        } else {
            kid.query_selector(".player_li").ok().flatten()
        };
        let Some(row_el) = row_el.and_then(|el| el.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };

        let row = row_el
            .query_selector(".toc_link")
            .ok()
            .flatten()
            .map(|a| player_from_link(&a))
            .unwrap_or_default();
        items.push(RosterItem::Player(row));
        els.push(row_el);
    }

    (items, els)
}

fn player_from_link(link: &Element) -> PlayerRow {
    PlayerRow::new(
        &link.get_attribute("data-name").unwrap_or_default(),
        link.get_attribute("data-is_minors").as_deref() == Some("1"),
        link.get_attribute("data-is_hurt").as_deref() == Some("1"),
    )
}

/// Writes a computed team plan to the DOM: the block, each role list, and
/// every header/row inside them.
pub(crate) fn apply_team_plan(team: &TeamDom, plan: &TeamPlan) {
    set_displayed(&team.block, plan.team_visible);

    for (els, list_plan) in team.doms.iter().zip(plan.lists.iter()) {
        set_displayed(&els.root, list_plan.list_visible);
        for (el, visible) in els.item_els.iter().zip(list_plan.item_visible.iter()) {
            set_displayed(el, *visible);
        }
    }
}

pub(crate) fn set_collapsed_visual(team: &TeamDom, collapsed: bool) {
    toggle_class(&team.block, "collapsed", collapsed);
    if let Some(btn) = &team.title_btn {
        let _ = btn.set_attribute("aria-expanded", if collapsed { "false" } else { "true" });
    }
}

pub(crate) fn set_active_tab_visual(team: &TeamDom, role: &str) {
    for (tab_role, el) in &team.tabs {
        toggle_class(el, "active", tab_role == role);
    }
}

pub(crate) fn set_tabs_bar_visible(team: &TeamDom, shown: bool) {
    if let Some(bar) = &team.tabs_bar {
        set_displayed(bar, shown);
    }
}
