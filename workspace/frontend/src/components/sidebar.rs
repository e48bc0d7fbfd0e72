use serde::Serialize;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::posts::normalize_phrase;
use crate::router::Route;

#[derive(Serialize)]
struct SearchQuery<'a> {
    s: &'a str,
}

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    /// Prefills the search box
    #[prop_or_default]
    pub search_phrase: Option<String>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let navigator = use_navigator();
    let input_ref = use_node_ref();

    let on_search = {
        let input_ref = input_ref.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(navigator) = &navigator else {
                return;
            };

            let value = input_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();

            let pushed = match normalize_phrase(Some(&value)) {
                Some(phrase) => {
                    log::debug!("Searching posts for '{}'", phrase);
                    navigator.push_with_query(&Route::Home, &SearchQuery { s: phrase })
                }
                None => {
                    navigator.push(&Route::Home);
                    Ok(())
                }
            };
            if let Err(e) = pushed {
                log::error!("Failed to navigate to search results: {:?}", e);
            }
        })
    };

    html! {
        <aside class="flex flex-col gap-4">
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h2 class="card-title">{"About PairHub"}</h2>
                    <p class="text-sm">
                        {"PairHub helps you find remote pair programming partners. \
                          Post what you want to work on, or browse the feed and reach out."}
                    </p>
                </div>
            </div>
            <form class="join w-full" onsubmit={on_search}>
                <input
                    ref={input_ref}
                    type="search"
                    name="s"
                    class="input input-bordered join-item w-full"
                    placeholder="Search posts"
                    value={props.search_phrase.clone().unwrap_or_default()}
                />
                <button type="submit" class="btn join-item">
                    <i class="fas fa-search"></i>
                </button>
            </form>
        </aside>
    }
}
