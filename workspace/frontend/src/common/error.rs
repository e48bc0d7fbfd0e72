use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component(ErrorDisplay)]
pub fn error_display(props: &ErrorDisplayProps) -> Html {
    log::warn!("Showing error: {}", props.message);

    let retry = props.on_retry.clone().map(|on_retry| {
        Callback::from(move |_: MouseEvent| {
            log::debug!("Retry requested");
            on_retry.emit(());
        })
    });

    html! {
        <div class="flex flex-col items-center justify-center py-8 gap-4">
            <div class="alert alert-error max-w-lg">
                <i class="fas fa-exclamation-circle text-2xl"></i>
                <span>{&props.message}</span>
            </div>
            if let Some(onclick) = retry {
                <button class="btn btn-primary btn-sm" {onclick}>
                    <i class="fas fa-redo"></i>
                    {" Try again"}
                </button>
            }
        </div>
    }
}
