use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::layout::Layout;
use crate::router::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    log::warn!("404 - Route not found");
    html! {
        <Layout>
            <div class="flex flex-col items-center gap-4 py-12">
                <h1 class="text-2xl font-bold">{"404 Not Found"}</h1>
                <Link<Route> to={Route::Home} classes={classes!("btn", "btn-primary", "btn-sm")}>
                    {"Back to the feed"}
                </Link<Route>>
            </div>
        </Layout>
    }
}
