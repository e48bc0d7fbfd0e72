use yew::prelude::*;
use yew_router::prelude::*;

use crate::common::current_user::CurrentUserContext;
use crate::components::profile_area::ProfileArea;
use crate::router::Route;

#[function_component(Navbar)]
pub fn navbar() -> Html {
    let current = use_context::<CurrentUserContext>().unwrap_or_default();

    let account = match (&current.user, current.loaded, current.login_enabled) {
        (Some(user), _, _) => html! { <ProfileArea current_user={user.clone()} /> },
        (None, true, true) => html! {
            <a href="/login/github" class="btn btn-sm btn-neutral">
                <i class="fab fa-github"></i>
                {" Log in with GitHub"}
            </a>
        },
        // Still loading, or the server runs without a GitHub client id
        _ => html! {},
    };

    html! {
        <div class="navbar bg-base-100 shadow-sm z-40 sticky top-0">
            <div class="flex-1 px-4">
                <Link<Route> to={Route::Home} classes={classes!("text-xl", "font-bold")}>
                    {"PairHub"}
                </Link<Route>>
            </div>
            <div class="flex-none gap-2 px-4">
                {account}
            </div>
        </div>
    }
}
