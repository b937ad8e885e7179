//! Fragment cache and loader: fetches pre-rendered HTML fragments by file
//! path, caches them in memory, and injects them into the content region.

use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LoadErrorKind {
    Network,
    Http,
}

#[derive(Clone, Debug)]
pub(crate) struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl LoadError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: LoadErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, file: &str) -> Self {
        Self {
            kind: LoadErrorKind::Http,
            message: format!("fetching {file} failed ({status})"),
        }
    }
}

pub(crate) type LoadResult<T> = Result<T, LoadError>;

/// In-memory fragment cache keyed by file path, plus the monotonic load
/// sequence used to discard stale responses.
///
/// Without the sequence token a slow fetch for an earlier page could resolve
/// after a newer one and overwrite the content region with stale markup.
#[derive(Debug, Default)]
pub(crate) struct FragmentCache {
    entries: HashMap<String, String>,
    seq: u64,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &str) -> Option<&str> {
        self.entries.get(file).map(String::as_str)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.entries.contains_key(file)
    }

    pub fn insert(&mut self, file: String, html: String) {
        self.entries.insert(file, html);
    }

    /// Starts a new primary load and returns its token. Only the most
    /// recently issued token is current.
    pub fn begin_load(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.seq == token
    }
}

/// Fetches one fragment body. The in-memory cache is the cache of record;
/// the request asks the browser not to serve its own stale copy.
pub(crate) async fn fetch_fragment(file: &str) -> LoadResult<String> {
    let client = reqwest::Client::new();
    let res = client
        .get(file)
        .header("Cache-Control", "no-cache")
        .send()
        .await
        .map_err(LoadError::network)?;

    if !res.status().is_success() {
        return Err(LoadError::http(res.status(), file));
    }

    res.text().await.map_err(LoadError::network)
}

/// Replaces the content region with the fragment markup and re-instantiates
/// embedded scripts, since scripts injected via innerHTML are parsed but
/// never executed.
pub(crate) fn inject_fragment(document: &Document, region: &Element, html: &str) {
    region.set_inner_html(html);
    reinstantiate_scripts(document, region);
}

fn reinstantiate_scripts(document: &Document, region: &Element) {
    let Ok(scripts) = region.query_selector_all("script") else {
        return;
    };

    // Snapshot first; replacing nodes while iterating a live list skips
    // entries.
    let mut old_scripts = Vec::new();
    for i in 0..scripts.length() {
        if let Some(el) = scripts.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            old_scripts.push(el);
        }
    }

    for old in old_scripts {
        let Ok(fresh) = document.create_element("script") else {
            continue;
        };
        for attr in ["src", "type", "defer", "async"] {
            if let Some(value) = old.get_attribute(attr) {
                let _ = fresh.set_attribute(attr, &value);
            }
        }
        fresh.set_text_content(old.text_content().as_deref());

        if let Some(parent) = old.parent_node() {
            let _ = parent.replace_child(&fresh, &old);
        }
    }
}
