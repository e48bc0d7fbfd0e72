//! Avatar button with a dropdown holding the profile and logout links.
//!
//! The open/closed state lives in a [`DropdownState`] reducer. A document-level
//! `mousedown` listener, registered on mount and dropped on unmount, closes the
//! dropdown when the press lands outside the component.

use common::UserDto;
use gloo_events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::Node;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropdownState {
    pub expanded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownAction {
    /// Avatar clicked
    Toggle,
    /// Mouse pressed anywhere in the document
    DocumentMousedown { inside: bool },
}

impl DropdownState {
    pub fn toggled(self) -> Self {
        Self { expanded: !self.expanded }
    }

    /// Presses outside an open dropdown close it; everything else is a no-op.
    pub fn on_document_mousedown(self, inside: bool) -> Self {
        if self.expanded && !inside {
            Self { expanded: false }
        } else {
            self
        }
    }

    pub fn apply(self, action: DropdownAction) -> Self {
        match action {
            DropdownAction::Toggle => self.toggled(),
            DropdownAction::DocumentMousedown { inside } => self.on_document_mousedown(inside),
        }
    }
}

impl Reducible for DropdownState {
    type Action = DropdownAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = (*self).apply(action);
        // Returning the same Rc skips the re-render
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

/// Whether the event target sits inside `root`.
fn event_is_inside(root: &NodeRef, event: &Event) -> bool {
    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
    match (root.get(), target) {
        (Some(root), Some(target)) => root.contains(Some(&target)),
        _ => false,
    }
}

#[derive(Properties, PartialEq)]
pub struct ProfileAreaProps {
    pub current_user: UserDto,
}

#[function_component(ProfileArea)]
pub fn profile_area(props: &ProfileAreaProps) -> Html {
    let root = use_node_ref();
    let dropdown = use_reducer(DropdownState::default);

    {
        let root = root.clone();
        let dispatcher = dropdown.dispatcher();

        use_effect_with((), move |_| {
            let listener = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| {
                    EventListener::new(&document, "mousedown", move |event| {
                        let inside = event_is_inside(&root, event);
                        dispatcher.dispatch(DropdownAction::DocumentMousedown { inside });
                    })
                });
            if listener.is_none() {
                log::warn!("No document available; outside clicks will not close the profile menu");
            }

            move || {
                log::trace!("Removing profile menu listener");
                drop(listener);
            }
        });
    }

    let on_avatar_click = {
        let dispatcher = dropdown.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(DropdownAction::Toggle))
    };

    let user = &props.current_user;

    html! {
        <div class="relative" ref={root}>
            <img
                class="w-12 h-12 rounded-full cursor-pointer inline-block"
                src={user.avatar_url.clone()}
                alt={user.username.clone()}
                onclick={on_avatar_click}
            />
            if dropdown.expanded {
                <div class="absolute right-0 w-40 bg-base-100 rounded-lg p-2 shadow-lg z-50">
                    <ul class="menu menu-sm p-0">
                        <li>
                            <Link<Route> to={Route::Profile { username: user.username.clone() }}>
                                {"Profile"}
                            </Link<Route>>
                        </li>
                        <li>
                            <a href="/logout" class="text-gray-400">{"Log out"}</a>
                        </li>
                    </ul>
                </div>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: DropdownState = DropdownState { expanded: true };
    const CLOSED: DropdownState = DropdownState { expanded: false };

    #[test]
    fn starts_closed() {
        assert_eq!(DropdownState::default(), CLOSED);
    }

    #[test]
    fn avatar_click_toggles() {
        assert_eq!(CLOSED.apply(DropdownAction::Toggle), OPEN);
        assert_eq!(OPEN.apply(DropdownAction::Toggle), CLOSED);
    }

    #[test]
    fn outside_press_closes_open_dropdown() {
        assert_eq!(OPEN.on_document_mousedown(false), CLOSED);
    }

    #[test]
    fn inside_press_keeps_dropdown_open() {
        assert_eq!(OPEN.on_document_mousedown(true), OPEN);
    }

    #[test]
    fn presses_while_closed_change_nothing() {
        assert_eq!(CLOSED.on_document_mousedown(false), CLOSED);
        assert_eq!(CLOSED.on_document_mousedown(true), CLOSED);
    }

    #[test]
    fn reducer_reuses_state_when_nothing_changes() {
        let open = Rc::new(OPEN);
        let same = Rc::clone(&open).reduce(DropdownAction::DocumentMousedown { inside: true });
        assert!(Rc::ptr_eq(&open, &same));

        let closed = open.reduce(DropdownAction::DocumentMousedown { inside: false });
        assert_eq!(*closed, CLOSED);
    }

    #[test]
    fn press_on_avatar_then_click_opens() {
        // The avatar's mousedown reaches the document first, then its click toggles
        let state = CLOSED
            .apply(DropdownAction::DocumentMousedown { inside: true })
            .apply(DropdownAction::Toggle);
        assert_eq!(state, OPEN);
    }
}
