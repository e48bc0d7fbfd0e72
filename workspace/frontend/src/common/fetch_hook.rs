use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;
use crate::common::toast::ToastContext;
use crate::hooks::FetchState;

/// Runs `fetch_fn(deps)` on mount and again whenever `deps` changes.
///
/// Returns the state and a callback that re-runs the fetch with the current
/// deps. Only the newest request may write the state, so a slow response for
/// an old search phrase cannot replace the results of a newer one.
#[hook]
pub fn use_fetch<T, D, F, Fut>(deps: D, fetch_fn: F) -> (UseStateHandle<FetchState<T>>, Callback<()>)
where
    T: 'static,
    D: PartialEq + Clone + 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let fetch_state = use_state(FetchState::default);
    let toast_ctx = use_context::<ToastContext>();
    let fetch_fn = use_memo((), move |_| fetch_fn);
    let generation = use_memo((), |_| Cell::new(0u32));

    let refetch = {
        let fetch_state = fetch_state.clone();

        use_callback(deps.clone(), move |_: (), deps: &D| {
            let fetch_state = fetch_state.clone();
            let toast_ctx = toast_ctx.clone();
            let generation = Rc::clone(&generation);
            let fut = (*fetch_fn)(deps.clone());

            let ticket = generation.get().wrapping_add(1);
            generation.set(ticket);
            fetch_state.set(FetchState::Loading);

            wasm_bindgen_futures::spawn_local(async move {
                let result = fut.await;
                if generation.get() != ticket {
                    log::trace!("Dropping stale response");
                    return;
                }
                match result {
                    Ok(data) => fetch_state.set(FetchState::Success(data)),
                    Err(err) => {
                        if let Some(toast_ctx) = &toast_ctx {
                            toast_ctx.show_error(err.clone());
                        }
                        fetch_state.set(FetchState::Error(err));
                    }
                }
            });
        })
    };

    {
        let refetch = refetch.clone();
        use_effect_with(deps, move |_| {
            refetch.emit(());
            || ()
        });
    }

    (fetch_state, refetch)
}
