mod app;
mod loader;
mod models;
mod nav;
mod roster;
mod state;
mod storage;
mod util;
mod visibility;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    app::boot();
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::models::{PlayerRow, RosterItem};
    use crate::{nav, roster, storage};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> web_sys::Document {
        web_sys::window()
            .expect("window")
            .document()
            .expect("document")
    }

    fn raw_storage_item(key: &str) -> Option<String> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(key).ok().flatten())
    }

    #[wasm_bindgen_test]
    fn test_active_page_round_trip() {
        storage::save_active_page("team-42");
        assert_eq!(storage::load_active_page(), Some("team-42".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_team_collapsed_round_trip_and_encoding() {
        storage::save_team_collapsed("nyy", true);
        assert_eq!(storage::load_team_collapsed("nyy"), Some(true));
        assert_eq!(
            raw_storage_item("mlb_dash_team_open__nyy").as_deref(),
            Some("0")
        );

        storage::save_team_collapsed("nyy", false);
        assert_eq!(storage::load_team_collapsed("nyy"), Some(false));
        assert_eq!(
            raw_storage_item("mlb_dash_team_open__nyy").as_deref(),
            Some("1")
        );
    }

    const FIXTURE: &str = r#"
        <div class="team_block" data-team="nyy">
          <button class="team_title" data-team="nyy">Yankees</button>
          <div class="role_tabs">
            <button class="role_tab" data-team="nyy" data-role="batters">Batters</button>
            <button class="role_tab active" data-team="nyy" data-role="pitchers">Pitchers</button>
          </div>
          <div class="role_list" data-team="nyy" data-role="batters">
            <ul class="player_list">
              <li class="sub_role_label">Catchers</li>
              <li class="player_li">
                <a class="toc_link" data-page="p-smith" data-file="pages/p-smith.html"
                   data-name="john smith" data-is_minors="0" data-is_hurt="1">John Smith</a>
              </li>
            </ul>
          </div>
          <div class="role_list" data-team="nyy" data-role="pitchers">
            <ul class="player_list">
              <li class="player_li">
                <a class="toc_link" data-page="p-jones" data-file="pages/p-jones.html"
                   data-name="ed jones" data-is_minors="1" data-is_hurt="0">Ed Jones</a>
              </li>
            </ul>
          </div>
        </div>
    "#;

    #[wasm_bindgen_test]
    fn test_scan_roster_builds_model_from_markup() {
        let document = document();
        let body = document.body().expect("body");
        body.set_inner_html(FIXTURE);

        let teams = roster::scan_roster(&document);
        assert_eq!(teams.len(), 1);

        let team = &teams[0];
        assert_eq!(team.team, "nyy");
        assert_eq!(team.active_role, "pitchers");
        assert_eq!(team.tabs.len(), 2);
        assert_eq!(team.models.len(), 2);

        let batters = &team.models[0];
        assert_eq!(batters.role, "batters");
        assert_eq!(batters.items.len(), 2);
        assert_eq!(batters.items[0], RosterItem::Header);
        assert_eq!(
            batters.items[1],
            RosterItem::Player(PlayerRow::new("john smith", false, true))
        );

        let pitchers = &team.models[1];
        assert_eq!(pitchers.role, "pitchers");
        assert_eq!(
            pitchers.items[0],
            RosterItem::Player(PlayerRow::new("ed jones", true, false))
        );

        body.set_inner_html("");
    }

    #[wasm_bindgen_test]
    fn test_scan_pages_reads_toc_links_in_order() {
        let document = document();
        let body = document.body().expect("body");
        body.set_inner_html(FIXTURE);

        let pages = nav::scan_pages(&document);
        assert_eq!(
            pages.resolve("p-smith").map(|e| e.file.as_str()),
            Some("pages/p-smith.html")
        );
        assert_eq!(pages.next_files("p-smith", 2), vec!["pages/p-jones.html"]);

        body.set_inner_html("");
    }
}
