//! The dashboard controller: wires the pre-rendered controls at boot and
//! drives navigation, search/filter derivation, and collapse/tab state.

use crate::loader::{LoadError, LoadErrorKind};
use crate::models::FilterState;
use crate::state::DashState;
use crate::util::listen;
use crate::visibility::{derive_team, restore_collapsed, Mode, DEFAULT_ROLE};
use crate::{loader, nav, roster, storage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

/// How many sibling pages a successful load warms the cache with.
const PREFETCH_COUNT: usize = 2;

type Shared = Rc<RefCell<DashState>>;

pub(crate) fn boot() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let state_rc: Shared = Rc::new(RefCell::new(DashState::new(document)));

    init_collapse_defaults(&state_rc);
    wire_toc_links(&state_rc);
    wire_team_titles(&state_rc);
    wire_role_tabs(&state_rc);
    wire_search(&state_rc);
    wire_filter_boxes(&state_rc);

    {
        let rc = state_rc.clone();
        listen(&window, "hashchange", move |_| on_hash_change(&rc));
    }

    on_hash_change(&state_rc);
    let query = state_rc.borrow().current_query();
    apply_search_and_filters(&state_rc, &query);
    sync_clear_button(&state_rc.borrow());
}

/// Re-derives the whole dashboard for the given raw query, running the
/// search-mode transition first when the searching flag flips.
pub(crate) fn apply_search_and_filters(state_rc: &Shared, raw_query: &str) {
    let mut state = state_rc.borrow_mut();
    let filters: FilterState = state.filters_for(raw_query);
    let searching = filters.searching();

    if searching && !state.mode.is_searching() {
        enter_search_mode(&mut state);
    } else if !searching && state.mode.is_searching() {
        exit_search_mode(&mut state);
    }

    for team in &state.teams {
        let plan = derive_team(&team.models, &team.active_role, &filters);
        roster::apply_team_plan(team, &plan);
    }
}

/// Entering search: capture each team's collapse state once, force every
/// block open, hide the tab selectors (search spans all tabs).
fn enter_search_mode(state: &mut DashState) {
    let mut prev_collapsed = HashMap::new();
    for team in &state.teams {
        prev_collapsed.insert(team.team.clone(), team.collapsed);
    }
    state.mode = Mode::Searching { prev_collapsed };

    for team in &mut state.teams {
        team.collapsed = false;
        roster::set_collapsed_visual(team, false);
        roster::set_tabs_bar_visible(team, false);
    }
}

/// Leaving search: restore the captured collapse state (falling back to the
/// persisted flag, then to collapsed) and bring the tab selectors back.
fn exit_search_mode(state: &mut DashState) {
    let prev_collapsed = match std::mem::replace(&mut state.mode, Mode::Browsing) {
        Mode::Searching { prev_collapsed } => prev_collapsed,
        Mode::Browsing => HashMap::new(),
    };

    for team in &mut state.teams {
        let collapsed = restore_collapsed(
            &prev_collapsed,
            &team.team,
            storage::load_team_collapsed(&team.team),
        );
        team.collapsed = collapsed;
        roster::set_collapsed_visual(team, collapsed);
        roster::set_tabs_bar_visible(team, true);
    }
}

/// Makes `role` the exclusive active tab for `team` and re-derives, so tab
/// switches never bypass an active query or filter.
pub(crate) fn set_team_role_tab(state_rc: &Shared, team: &str, role: &str) {
    {
        let mut state = state_rc.borrow_mut();
        let Some(team_dom) = state.team_mut(team) else {
            return;
        };
        team_dom.active_role = role.to_string();
        roster::set_active_tab_visual(team_dom, role);
    }

    let query = state_rc.borrow().current_query();
    apply_search_and_filters(state_rc, &query);
}

pub(crate) fn set_team_collapsed(state_rc: &Shared, team: &str, collapsed: bool) {
    let searching = {
        let mut state = state_rc.borrow_mut();
        let searching = state.mode.is_searching();
        let Some(team_dom) = state.team_mut(team) else {
            return;
        };
        team_dom.collapsed = collapsed;
        roster::set_collapsed_visual(team_dom, collapsed);
        searching
    };

    storage::save_team_collapsed(team, collapsed);

    // Expanding a block outside of search lands on the default tab.
    if !collapsed && !searching {
        set_team_role_tab(state_rc, team, DEFAULT_ROLE);
    }
}

fn toggle_team_collapsed(state_rc: &Shared, team: &str) {
    let collapsed = {
        let state = state_rc.borrow();
        match state.teams.iter().find(|t| t.team == team) {
            Some(t) => t.collapsed,
            None => return,
        }
    };
    set_team_collapsed(state_rc, team, !collapsed);
}

fn init_collapse_defaults(state_rc: &Shared) {
    let teams: Vec<String> = state_rc
        .borrow()
        .teams
        .iter()
        .map(|t| t.team.clone())
        .collect();

    for team in teams {
        let collapsed = storage::load_team_collapsed(&team).unwrap_or(true);
        set_team_collapsed(state_rc, &team, collapsed);
    }
}

fn sync_clear_button(state: &DashState) {
    let Some(btn) = &state.clear_btn else {
        return;
    };
    let has_text = !state.current_query().trim().is_empty();
    let _ = if has_text {
        btn.style().set_property("display", "inline-flex")
    } else {
        btn.style().set_property("display", "none")
    };
}

/// Resolves a page id through the registry and, when known, loads it and
/// rewrites the location fragment (replace semantics). Unknown ids no-op.
pub(crate) fn activate_page(state_rc: &Shared, page_id: &str) {
    let file = {
        let state = state_rc.borrow();
        state.pages.resolve(page_id).map(|e| e.file.clone())
    };
    let Some(file) = file else {
        return;
    };

    load_page(state_rc, file, page_id.to_string());
    nav::replace_location_hash(page_id);
}

fn load_page(state_rc: &Shared, file: String, page_id: String) {
    let token = state_rc.borrow_mut().cache.begin_load();
    let state_rc = state_rc.clone();

    spawn_local(async move {
        let cached = state_rc.borrow().cache.get(&file).map(str::to_string);
        let html = match cached {
            Some(html) => html,
            None => match loader::fetch_fragment(&file).await {
                Ok(html) => {
                    state_rc
                        .borrow_mut()
                        .cache
                        .insert(file.clone(), html.clone());
                    html
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("page load failed: {e}").into());
                    show_load_failure(&state_rc, token, &e);
                    return;
                }
            },
        };

        // A newer load may have started while this one was in flight; stale
        // fragments must never overwrite newer content.
        let (document, region, current) = {
            let state = state_rc.borrow();
            (
                state.document.clone(),
                state.content_root.clone(),
                state.cache.is_current(token),
            )
        };
        if !current {
            return;
        }

        // Injection runs outside any borrow: embedded scripts execute
        // synchronously on insertion and may call back into handlers.
        if let Some(region) = &region {
            loader::inject_fragment(&document, region, &html);
        }
        nav::highlight_active_link(&document, &page_id);
        storage::save_active_page(&page_id);
        prefetch_siblings(&state_rc, &page_id);
    });
}

fn show_load_failure(state_rc: &Shared, token: u64, error: &LoadError) {
    let region: Option<Element> = {
        let state = state_rc.borrow();
        if state.cache.is_current(token) {
            state.content_root.clone()
        } else {
            None
        }
    };
    let Some(region) = region else {
        return;
    };

    let note = match error.kind {
        LoadErrorKind::Network => "Failed to load page (network problem).",
        LoadErrorKind::Http => "Failed to load page.",
    };
    region.set_inner_html(&format!(r#"<p class="load_error">{note}</p>"#));
}

/// Warms the cache with the next sibling pages. Fire-and-forget: a failed
/// warm-up only costs the later visitor a fetch.
fn prefetch_siblings(state_rc: &Shared, page_id: &str) {
    let files: Vec<String> = {
        let state = state_rc.borrow();
        state
            .pages
            .next_files(page_id, PREFETCH_COUNT)
            .into_iter()
            .filter(|f| !state.cache.contains(f))
            .collect()
    };

    for file in files {
        let state_rc = state_rc.clone();
        spawn_local(async move {
            match loader::fetch_fragment(&file).await {
                Ok(html) => state_rc.borrow_mut().cache.insert(file, html),
                Err(e) => web_sys::console::warn_1(&format!("prefetch failed: {e}").into()),
            }
        });
    }
}

fn on_hash_change(state_rc: &Shared) {
    let hash = web_sys::window()
        .map(|w| w.location().hash().unwrap_or_default())
        .unwrap_or_default();
    let page_id = nav::default_page_id(&hash, storage::load_active_page());
    activate_page(state_rc, &page_id);
}

fn wire_toc_links(state_rc: &Shared) {
    let links = {
        let state = state_rc.borrow();
        state.document.query_selector_all(".toc_link")
    };
    let Ok(links) = links else {
        return;
    };

    for i in 0..links.length() {
        let Some(link) = links.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(page_id) = link.get_attribute("data-page").filter(|v| !v.is_empty()) else {
            continue;
        };
        if link
            .get_attribute("data-file")
            .filter(|v| !v.is_empty())
            .is_none()
        {
            continue;
        }

        let rc = state_rc.clone();
        listen(&link, "click", move |ev| {
            ev.prevent_default();
            activate_page(&rc, &page_id);
        });
    }
}

fn wire_team_titles(state_rc: &Shared) {
    let buttons: Vec<(String, web_sys::HtmlElement)> = {
        let state = state_rc.borrow();
        state
            .teams
            .iter()
            .filter_map(|t| t.title_btn.clone().map(|btn| (t.team.clone(), btn)))
            .collect()
    };

    for (team, btn) in buttons {
        let rc = state_rc.clone();
        listen(&btn, "click", move |_| toggle_team_collapsed(&rc, &team));
    }
}

fn wire_role_tabs(state_rc: &Shared) {
    let tabs: Vec<(String, String, web_sys::HtmlElement)> = {
        let state = state_rc.borrow();
        state
            .teams
            .iter()
            .flat_map(|t| {
                t.tabs
                    .iter()
                    .map(|(role, el)| (t.team.clone(), role.clone(), el.clone()))
            })
            .collect()
    };

    for (team, role, el) in tabs {
        let rc = state_rc.clone();
        listen(&el, "click", move |_| {
            set_team_role_tab(&rc, &team, &role);
        });
    }
}

fn wire_search(state_rc: &Shared) {
    let input = state_rc.borrow().search_input.clone();
    let Some(input) = input else {
        return;
    };

    {
        let rc = state_rc.clone();
        let inp = input.clone();
        listen(&input, "input", move |_| {
            apply_search_and_filters(&rc, &inp.value());
            sync_clear_button(&rc.borrow());
        });
    }

    {
        let rc = state_rc.clone();
        let inp = input.clone();
        listen(&input, "keydown", move |ev| {
            let Ok(key_ev) = ev.dyn_into::<web_sys::KeyboardEvent>() else {
                return;
            };
            if key_ev.key() != "Escape" {
                return;
            }
            inp.set_value("");
            apply_search_and_filters(&rc, "");
            sync_clear_button(&rc.borrow());
        });
    }

    let clear_btn = state_rc.borrow().clear_btn.clone();
    if let Some(btn) = clear_btn {
        let rc = state_rc.clone();
        listen(&btn, "click", move |_| {
            input.set_value("");
            apply_search_and_filters(&rc, "");
            sync_clear_button(&rc.borrow());
            let _ = input.focus();
        });
    }
}

fn wire_filter_boxes(state_rc: &Shared) {
    let boxes = {
        let state = state_rc.borrow();
        [state.hide_minors_box.clone(), state.hide_hurt_box.clone()]
    };

    for checkbox in boxes.into_iter().flatten() {
        let rc = state_rc.clone();
        listen(&checkbox, "change", move |_| {
            let query = rc.borrow().current_query();
            apply_search_and_filters(&rc, &query);
        });
    }
}
