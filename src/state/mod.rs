use crate::loader::FragmentCache;
use crate::models::FilterState;
use crate::nav::{scan_pages, PageRegistry};
use crate::roster::{scan_roster, TeamDom};
use crate::visibility::Mode;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

/// All dashboard state: the scanned roster model, the page registry, the
/// fragment cache, the search-mode state machine, and the handles of the UI
/// controls this layer consumes. Anchors are looked up once here; a missing
/// anchor turns the operations that need it into no-ops.
pub(crate) struct DashState {
    pub document: Document,
    pub content_root: Option<Element>,
    pub search_input: Option<HtmlInputElement>,
    pub clear_btn: Option<HtmlElement>,
    pub hide_minors_box: Option<HtmlInputElement>,
    pub hide_hurt_box: Option<HtmlInputElement>,
    pub teams: Vec<TeamDom>,
    pub pages: PageRegistry,
    pub cache: FragmentCache,
    pub mode: Mode,
}

impl DashState {
    pub fn new(document: Document) -> Self {
        let content_root = document.get_element_by_id("content_root");
        let search_input = document
            .get_element_by_id("player_search")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let clear_btn = document
            .get_element_by_id("search_clear")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let hide_minors_box = document
            .get_element_by_id("filter_hide_minors")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let hide_hurt_box = document
            .get_element_by_id("filter_hide_hurt")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        let teams = scan_roster(&document);
        let pages = scan_pages(&document);

        Self {
            document,
            content_root,
            search_input,
            clear_btn,
            hide_minors_box,
            hide_hurt_box,
            teams,
            pages,
            cache: FragmentCache::new(),
            mode: Mode::Browsing,
        }
    }

    pub fn current_query(&self) -> String {
        self.search_input
            .as_ref()
            .map(|input| input.value())
            .unwrap_or_default()
    }

    /// Filter state as currently reflected by the controls, with the query
    /// taken from the caller (event payloads carry the freshest value).
    pub fn filters_for(&self, raw_query: &str) -> FilterState {
        FilterState::new(
            raw_query,
            self.hide_minors_box
                .as_ref()
                .map(|b| b.checked())
                .unwrap_or(false),
            self.hide_hurt_box
                .as_ref()
                .map(|b| b.checked())
                .unwrap_or(false),
        )
    }

    pub fn team_mut(&mut self, team: &str) -> Option<&mut TeamDom> {
        self.teams.iter_mut().find(|t| t.team == team)
    }
}
