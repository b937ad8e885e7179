//! Navigation: maps the location fragment to a page id, resolves page ids to
//! fragment files through the rendered TOC links, and keeps the active-link
//! highlight and browser history in sync.

use crate::models::PageEntry;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

pub(crate) const FALLBACK_PAGE_ID: &str = "home";

/// The navigable pages in TOC document order. Order matters: it defines the
/// siblings considered for prefetch.
#[derive(Clone, Debug, Default)]
pub(crate) struct PageRegistry {
    entries: Vec<PageEntry>,
}

impl PageRegistry {
    pub fn new(entries: Vec<PageEntry>) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, page_id: &str) -> Option<&PageEntry> {
        self.entries.iter().find(|e| e.page_id == page_id)
    }

    /// Fragment files of up to `n` pages following `page_id` in TOC order,
    /// skipping duplicates and the current page's own file.
    pub fn next_files(&self, page_id: &str, n: usize) -> Vec<String> {
        let Some(pos) = self.entries.iter().position(|e| e.page_id == page_id) else {
            return Vec::new();
        };
        let current_file = &self.entries[pos].file;

        let mut files: Vec<String> = Vec::new();
        for entry in self.entries.iter().skip(pos + 1) {
            if files.len() == n {
                break;
            }
            if entry.file == *current_file || files.contains(&entry.file) {
                continue;
            }
            files.push(entry.file.clone());
        }
        files
    }
}

/// Extracts the percent-decoded page id from a location fragment string
/// (`"#team-42"`). Empty fragments yield `None`.
pub(crate) fn page_id_from_hash(hash: &str) -> Option<String> {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    if raw.is_empty() {
        return None;
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(raw.to_string()),
    }
}

/// Initial page resolution: location fragment, else the persisted last page,
/// else the fixed fallback.
pub(crate) fn default_page_id(hash: &str, persisted: Option<String>) -> String {
    page_id_from_hash(hash)
        .or(persisted)
        .unwrap_or_else(|| FALLBACK_PAGE_ID.to_string())
}

/// Reads the page registry out of the rendered TOC links. Links missing
/// either data attribute are not navigable and are skipped.
pub(crate) fn scan_pages(document: &Document) -> PageRegistry {
    let mut entries = Vec::new();

    if let Ok(links) = document.query_selector_all(".toc_link") {
        for i in 0..links.length() {
            let Some(link) = links.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(page_id) = link.get_attribute("data-page").filter(|v| !v.is_empty())
            else {
                continue;
            };
            let Some(file) = link.get_attribute("data-file").filter(|v| !v.is_empty()) else {
                continue;
            };
            entries.push(PageEntry { page_id, file });
        }
    }

    PageRegistry::new(entries)
}

/// Moves the "active" highlight to the TOC link of the given page.
pub(crate) fn highlight_active_link(document: &Document, page_id: &str) {
    let Ok(links) = document.query_selector_all(".toc_link") else {
        return;
    };
    for i in 0..links.length() {
        let Some(link) = links.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };
        let active = link.get_attribute("data-page").as_deref() == Some(page_id);
        let _ = link.class_list().toggle_with_force("active", active);
    }
}

/// Writes the page id into the location fragment without a navigation.
/// Replace semantics: back/forward steps through real page changes only.
pub(crate) fn replace_location_hash(page_id: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let url = format!("#{}", urlencoding::encode(page_id));
    let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(page_id: &str, file: &str) -> PageEntry {
        PageEntry {
            page_id: page_id.to_string(),
            file: file.to_string(),
        }
    }

    fn registry() -> PageRegistry {
        PageRegistry::new(vec![
            entry("home", "pages/home.html"),
            entry("team-42", "pages/team-42.html"),
            entry("team-43", "pages/team-43.html"),
            entry("team-44", "pages/team-44.html"),
        ])
    }

    #[test]
    fn test_resolve_known_and_unknown_pages() {
        let reg = registry();
        assert_eq!(
            reg.resolve("team-42").map(|e| e.file.as_str()),
            Some("pages/team-42.html")
        );
        assert!(reg.resolve("nope").is_none());
    }

    #[test]
    fn test_next_files_takes_following_siblings() {
        let reg = registry();
        assert_eq!(
            reg.next_files("home", 2),
            vec!["pages/team-42.html", "pages/team-43.html"]
        );
    }

    #[test]
    fn test_next_files_at_end_of_list() {
        let reg = registry();
        assert_eq!(reg.next_files("team-43", 2), vec!["pages/team-44.html"]);
        assert!(reg.next_files("team-44", 2).is_empty());
        assert!(reg.next_files("unknown", 2).is_empty());
    }

    #[test]
    fn test_next_files_skips_duplicate_files() {
        let reg = PageRegistry::new(vec![
            entry("a", "one.html"),
            entry("a-alias", "one.html"),
            entry("b", "two.html"),
            entry("c", "three.html"),
        ]);
        assert_eq!(reg.next_files("a", 2), vec!["two.html", "three.html"]);
    }

    #[test]
    fn test_page_id_from_hash() {
        assert_eq!(page_id_from_hash("#team-42"), Some("team-42".to_string()));
        assert_eq!(page_id_from_hash("team-42"), Some("team-42".to_string()));
        assert_eq!(page_id_from_hash("#"), None);
        assert_eq!(page_id_from_hash(""), None);
    }

    #[test]
    fn test_page_id_from_hash_percent_decodes() {
        assert_eq!(
            page_id_from_hash("#team%2042"),
            Some("team 42".to_string())
        );
    }

    #[test]
    fn test_default_page_id_precedence() {
        // Fragment wins over the persisted page.
        assert_eq!(
            default_page_id("#team-42", Some("team-43".to_string())),
            "team-42"
        );
        // Persisted page wins over the fallback.
        assert_eq!(default_page_id("", Some("team-43".to_string())), "team-43");
        assert_eq!(default_page_id("", None), "home");
        assert_eq!(default_page_id("#", None), "home");
    }
}
