use yew::prelude::*;
use super::navbar::Navbar;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub children: Children,
}

#[function_component(Layout)]
pub fn layout(props: &Props) -> Html {
    html! {
        <div class="flex flex-col min-h-screen bg-base-200">
            <Navbar />
            <main class="flex-1 p-6 max-w-5xl w-full mx-auto">
                { for props.children.iter() }
            </main>
        </div>
    }
}
