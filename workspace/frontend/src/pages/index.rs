//! Landing page: the post feed next to the sidebar.

use serde::Deserialize;
use web_sys::Document;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::common::current_user::CurrentUserContext;
use crate::components::layout::Layout;
use crate::components::modals::{ModalContext, ModalKind};
use crate::components::posts::Posts;
use crate::components::sidebar::Sidebar;
use crate::router::Route;

const PAGE_TITLE: &str = "PairHub";

/// `(attribute, key, content)` for each social card tag in the document head.
const SOCIAL_META: &[(&str, &str, &str)] = &[
    ("name", "twitter:card", "summary"),
    ("name", "twitter:site", "@pairhub"),
    ("property", "twitter:title", "PairHub"),
    ("property", "twitter:description", "Find remote pair programming partners"),
    ("property", "twitter:image", "https://pairhub.io/static/pairhub-logo-white-180.png"),
];

/// Query string of `/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndexQuery {
    /// Present (and empty) right after a member's first login
    pub welcome: Option<String>,
    /// Feed search phrase
    pub s: Option<String>,
}

impl IndexQuery {
    /// `/?welcome` and `/?welcome=` ask for the welcome modal; any value does not.
    pub fn wants_welcome(&self) -> bool {
        self.welcome.as_deref() == Some("")
    }
}

/// Inserts or updates `<meta {attribute}="{key}" content="{content}">`.
fn upsert_meta(document: &Document, attribute: &str, key: &str, content: &str) {
    let selector = format!("meta[{}=\"{}\"]", attribute, key);
    let existing = document.query_selector(&selector).ok().flatten();

    let meta = match existing {
        Some(meta) => meta,
        None => {
            let Ok(meta) = document.create_element("meta") else {
                return;
            };
            if let Some(head) = document.head() {
                if head.append_child(&meta).is_err() {
                    log::warn!("Could not append {} meta tag", key);
                    return;
                }
            }
            meta
        }
    };

    if meta.set_attribute(attribute, key).is_err() || meta.set_attribute("content", content).is_err() {
        log::warn!("Could not set {} meta tag", key);
    }
}

fn apply_head() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    document.set_title(PAGE_TITLE);
    for (attribute, key, content) in SOCIAL_META {
        upsert_meta(&document, attribute, key, content);
    }
}

#[function_component(IndexPage)]
pub fn index_page() -> Html {
    let location = use_location();
    let navigator = use_navigator();
    let modals = use_context::<ModalContext>();
    let current = use_context::<CurrentUserContext>().unwrap_or_default();

    let query = location
        .as_ref()
        .and_then(|location| location.query::<IndexQuery>().ok())
        .unwrap_or_default();

    use_effect_with((), |_| {
        apply_head();
        || ()
    });

    // Once the URL is replaced the parameter is gone, so this fires once per visit
    use_effect_with(query.wants_welcome(), move |wants_welcome| {
        if *wants_welcome {
            if let Some(modals) = &modals {
                modals.open_modal(ModalKind::Welcome);
            }
            if let Some(navigator) = &navigator {
                navigator.replace(&Route::Home);
            }
        }
        || ()
    });

    html! {
        <Layout>
            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="lg:col-span-2">
                    <Posts current_user={current.user.clone()} search_phrase={query.s.clone()} />
                </div>
                <Sidebar search_phrase={query.s.clone()} />
            </div>
        </Layout>
    }
}
