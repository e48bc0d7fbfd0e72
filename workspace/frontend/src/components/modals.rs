//! App-wide modal host. Pages open a modal by kind through [`ModalContext`];
//! the provider renders at most one at a time.

pub mod welcome_modal;

use yew::prelude::*;
pub use welcome_modal::WelcomeModal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Welcome,
}

#[derive(Clone, PartialEq)]
pub struct ModalContext {
    pub active: Option<ModalKind>,
    set_active: Callback<Option<ModalKind>>,
}

impl ModalContext {
    pub fn open_modal(&self, kind: ModalKind) {
        log::debug!("Opening modal {:?}", kind);
        self.set_active.emit(Some(kind));
    }

    pub fn close_modal(&self) {
        self.set_active.emit(None);
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalProviderProps {
    pub children: Children,
}

#[function_component(ModalProvider)]
pub fn modal_provider(props: &ModalProviderProps) -> Html {
    let active = use_state_eq(|| None::<ModalKind>);

    let set_active = {
        let active = active.clone();
        use_callback((), move |kind: Option<ModalKind>, _| active.set(kind))
    };

    let context = ModalContext {
        active: *active,
        set_active,
    };

    let on_close = {
        let context = context.clone();
        Callback::from(move |_| context.close_modal())
    };

    html! {
        <ContextProvider<ModalContext> context={context}>
            {props.children.clone()}
            <WelcomeModal show={*active == Some(ModalKind::Welcome)} {on_close} />
        </ContextProvider<ModalContext>>
    }
}
