use yew::prelude::*;
use yew_router::prelude::*;

pub mod api_client;
pub mod common;
mod components;
pub mod hooks;
mod pages;
pub mod router;
pub mod settings;

use self::common::current_user::CurrentUserProvider;
use self::common::toast::ToastProvider;
use components::modals::ModalProvider;
use router::{Route, switch};

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ToastProvider>
            <CurrentUserProvider>
                <BrowserRouter>
                    <ModalProvider>
                        <Switch<Route> render={switch} />
                    </ModalProvider>
                </BrowserRouter>
            </CurrentUserProvider>
        </ToastProvider>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    settings::init_settings();

    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== PairHub frontend starting ===");
    log::info!("Application settings: {:?}", settings);
    log::debug!("API base URL: {}", settings.api_base_url());

    yew::Renderer::<App>::new().render();
}
