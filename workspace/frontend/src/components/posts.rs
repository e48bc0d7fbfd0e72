use common::{CreatePostRequest, PostDto, UserDto};
use web_sys::{FormData, HtmlFormElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::posts::{create_post, get_posts, normalize_phrase};
use crate::common::error::ErrorDisplay;
use crate::common::fetch_hook::use_fetch;
use crate::common::loading::Loading;
use crate::common::toast::ToastContext;
use crate::hooks::FetchState;
use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct PostsProps {
    #[prop_or_default]
    pub current_user: Option<UserDto>,
    #[prop_or_default]
    pub search_phrase: Option<String>,
}

fn empty_message(search_phrase: Option<&str>) -> String {
    match normalize_phrase(search_phrase) {
        Some(phrase) => format!("No posts match \"{}\".", phrase),
        None => "No posts yet. Be the first to look for a partner!".to_string(),
    }
}

#[function_component(Posts)]
pub fn posts(props: &PostsProps) -> Html {
    let (fetch_state, refetch) = use_fetch(props.search_phrase.clone(), |phrase: Option<String>| async move {
        get_posts(phrase.as_deref()).await
    });

    let list = match &*fetch_state {
        FetchState::Loading => html! { <Loading text={"Loading posts..."} /> },
        FetchState::Error(err) => html! { <ErrorDisplay message={err.clone()} on_retry={refetch.clone()} /> },
        FetchState::Success(posts) if posts.is_empty() => html! {
            <p class="text-center text-gray-500 py-8">{empty_message(props.search_phrase.as_deref())}</p>
        },
        FetchState::Success(posts) => html! {
            <div class="flex flex-col gap-4">
                { for posts.iter().map(|post| html! { <PostCard key={post.id} post={post.clone()} /> }) }
            </div>
        },
    };

    html! {
        <section class="flex flex-col gap-4">
            if props.current_user.is_some() {
                <NewPostForm on_created={refetch} />
            }
            {list}
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct PostCardProps {
    post: PostDto,
}

#[function_component(PostCard)]
fn post_card(props: &PostCardProps) -> Html {
    let post = &props.post;
    let author = &post.author;

    html! {
        <article class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex items-center gap-3">
                    <img class="w-10 h-10 rounded-full" src={author.avatar_url.clone()} alt={author.username.clone()} />
                    <div class="flex flex-col">
                        <Link<Route> to={Route::Profile { username: author.username.clone() }} classes={classes!("font-semibold")}>
                            {author.display_name()}
                        </Link<Route>>
                        <span class="text-xs text-gray-500">{post.created_at.format("%b %e, %Y").to_string()}</span>
                    </div>
                </div>
                <h2 class="card-title">{&post.title}</h2>
                <p class="whitespace-pre-line">{&post.body}</p>
            </div>
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct NewPostFormProps {
    on_created: Callback<()>,
}

#[function_component(NewPostForm)]
fn new_post_form(props: &NewPostFormProps) -> Html {
    let form_ref = use_node_ref();
    let submitting = use_state(|| false);
    let toast_ctx = use_context::<ToastContext>();

    let on_submit = {
        let form_ref = form_ref.clone();
        let submitting = submitting.clone();
        let on_created = props.on_created.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(form) = form_ref.cast::<HtmlFormElement>() else {
                return;
            };
            let Ok(form_data) = FormData::new_with_form(&form) else {
                log::error!("Could not read the post form");
                return;
            };

            let request = CreatePostRequest {
                title: form_data.get("title").as_string().unwrap_or_default().trim().to_string(),
                body: form_data.get("body").as_string().unwrap_or_default().trim().to_string(),
            };
            if request.title.is_empty() {
                if let Some(toast_ctx) = &toast_ctx {
                    toast_ctx.show_error("Give your post a title".to_string());
                }
                return;
            }

            submitting.set(true);
            let submitting = submitting.clone();
            let on_created = on_created.clone();
            let toast_ctx = toast_ctx.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let result = create_post(request).await;
                submitting.set(false);
                match result {
                    Ok(_) => {
                        form.reset();
                        if let Some(toast_ctx) = &toast_ctx {
                            toast_ctx.show_success("Post published".to_string());
                        }
                        on_created.emit(());
                    }
                    Err(err) => {
                        if let Some(toast_ctx) = &toast_ctx {
                            toast_ctx.show_error(err);
                        }
                    }
                }
            });
        })
    };

    html! {
        <form ref={form_ref} onsubmit={on_submit} class="card bg-base-100 shadow-sm">
            <div class="card-body gap-3">
                <input
                    type="text"
                    name="title"
                    class="input input-bordered w-full"
                    placeholder="What do you want to pair on?"
                    maxlength="120"
                    required={true}
                />
                <textarea
                    name="body"
                    class="textarea textarea-bordered w-full"
                    placeholder="Stack, timezone, availability..."
                    maxlength="5000"
                    rows="3"
                />
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary btn-sm" disabled={*submitting}>
                        if *submitting {
                            <span class="loading loading-spinner loading-xs"></span>
                        }
                        {"Post"}
                    </button>
                </div>
            </div>
        </form>
    }
}
