use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct WelcomeModalProps {
    pub show: bool,
    pub on_close: Callback<()>,
}

/// Shown once, right after a member's first login.
#[function_component(WelcomeModal)]
pub fn welcome_modal(props: &WelcomeModalProps) -> Html {
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <dialog class={classes!("modal", props.show.then_some("modal-open"))} id="welcome_modal">
            <div class="modal-box max-w-lg">
                <h3 class="font-bold text-lg">{"Welcome to PairHub!"}</h3>
                <div class="py-4 space-y-2">
                    <p>{"PairHub is where developers find remote pair programming partners."}</p>
                    <p>
                        {"Write a post about what you would like to work on and when you are \
                          available, or browse the feed and reach out to someone."}
                    </p>
                </div>
                <div class="modal-action">
                    <button class="btn btn-primary" onclick={on_close.clone()}>{"Get started"}</button>
                </div>
            </div>
            <div class="modal-backdrop" onclick={on_close}></div>
        </dialog>
    }
}
