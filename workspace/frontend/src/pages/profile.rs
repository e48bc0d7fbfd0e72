use common::UserDto;
use yew::prelude::*;

use crate::api_client::users::get_user;
use crate::common::error::ErrorDisplay;
use crate::common::fetch_hook::use_fetch;
use crate::common::loading::Loading;
use crate::components::layout::Layout;
use crate::hooks::FetchState;

#[derive(Properties, PartialEq)]
pub struct ProfilePageProps {
    pub username: String,
}

#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfilePageProps) -> Html {
    let (fetch_state, refetch) = use_fetch(props.username.clone(), |username: String| async move {
        get_user(&username).await
    });

    {
        let username = props.username.clone();
        use_effect_with(username, |username| {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document.set_title(&format!("{} - PairHub", username));
            }
            || ()
        });
    }

    let content = match &*fetch_state {
        FetchState::Loading => html! { <Loading /> },
        FetchState::Error(err) => html! { <ErrorDisplay message={err.clone()} on_retry={refetch} /> },
        FetchState::Success(user) => html! { <ProfileCard user={user.clone()} /> },
    };

    html! { <Layout>{content}</Layout> }
}

#[derive(Properties, PartialEq)]
struct ProfileCardProps {
    user: UserDto,
}

#[function_component(ProfileCard)]
fn profile_card(props: &ProfileCardProps) -> Html {
    let user = &props.user;

    html! {
        <div class="card bg-base-100 shadow-sm max-w-xl mx-auto">
            <div class="card-body items-center text-center">
                <img class="w-24 h-24 rounded-full" src={user.avatar_url.clone()} alt={user.username.clone()} />
                <h1 class="card-title text-2xl">{user.display_name()}</h1>
                <p class="text-gray-500">{format!("@{}", user.username)}</p>
                if let Some(bio) = &user.bio {
                    <p>{bio}</p>
                }
                <a class="btn btn-sm btn-outline" href={user.github_url.clone()} target="_blank" rel="noopener noreferrer">
                    <i class="fab fa-github"></i>
                    {" GitHub profile"}
                </a>
            </div>
        </div>
    }
}
