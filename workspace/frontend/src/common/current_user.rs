use common::{MeResponse, UserDto};
use yew::prelude::*;
use crate::api_client::me::get_me;
use crate::common::fetch_hook::use_fetch;
use crate::hooks::FetchState;

/// Who is browsing, shared with every page through context.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct CurrentUserContext {
    pub user: Option<UserDto>,
    pub login_enabled: bool,
    /// False until `/me` has answered
    pub loaded: bool,
}

impl CurrentUserContext {
    fn from_state(state: &FetchState<MeResponse>) -> Self {
        match state {
            FetchState::Loading => Self::default(),
            FetchState::Success(me) => Self {
                user: me.user.clone(),
                login_enabled: me.login_enabled,
                loaded: true,
            },
            // Treat an unreachable API as an anonymous visit
            FetchState::Error(_) => Self {
                loaded: true,
                ..Self::default()
            },
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct CurrentUserProviderProps {
    pub children: Children,
}

#[function_component(CurrentUserProvider)]
pub fn current_user_provider(props: &CurrentUserProviderProps) -> Html {
    let (state, _) = use_fetch((), |_| get_me());
    let context = CurrentUserContext::from_state(&state);

    html! {
        <ContextProvider<CurrentUserContext> {context}>
            {props.children.clone()}
        </ContextProvider<CurrentUserContext>>
    }
}
