use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or_default]
    pub text: Option<String>,
}

/// Centered spinner with an optional caption
#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex flex-col justify-center items-center py-12 gap-4">
            <span class="loading loading-spinner loading-md"></span>
            if let Some(text) = &props.text {
                <p class="text-sm text-gray-500">{text}</p>
            }
        </div>
    }
}
