use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::index::IndexPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::profile::ProfilePage;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/profile/:username")]
    Profile { username: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    log::debug!("Routing to: {:?}", routes);
    match routes {
        Route::Home => html! { <IndexPage /> },
        Route::Profile { username } => {
            log::trace!("Rendering profile page for {}", username);
            html! { <ProfilePage key={username.clone()} {username} /> }
        }
        Route::NotFound => html! { <NotFoundPage /> },
    }
}
