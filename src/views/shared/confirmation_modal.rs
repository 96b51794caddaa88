// ============================================================================
// CONFIRMATION MODAL - Destructive-action guard
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, set_disabled, ElementBuilder};

/// Overlay asking the user to confirm a delete. The confirm button shows a
/// busy label and both buttons lock while the request is running.
pub fn render_confirmation_modal<C, X>(
    message: &str,
    busy: bool,
    error: Option<&str>,
    on_confirm: C,
    on_cancel: X,
) -> Result<Element, JsValue>
where
    C: Fn() + 'static,
    X: Fn() + 'static,
{
    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();

    let modal = ElementBuilder::new("div")?.class("modal").build();
    {
        // Clicks inside the dialog must not bubble to the overlay
        on_click(&modal, move |e| {
            e.stop_propagation();
        })?;
    }

    let title = ElementBuilder::new("h3")?
        .class("modal-title")
        .text("Delete product")
        .build();

    let body = ElementBuilder::new("p")?
        .class("modal-message")
        .text(message)
        .build();

    append_child(&modal, &title)?;
    append_child(&modal, &body)?;

    if let Some(error) = error {
        let error_el = ElementBuilder::new("p")?
            .class("modal-error")
            .text(error)
            .build();
        append_child(&modal, &error_el)?;
    }

    let actions = ElementBuilder::new("div")?.class("modal-actions").build();

    let cancel_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Cancel")
        .build();
    set_disabled(&cancel_btn, busy)?;
    on_click(&cancel_btn, move |_| on_cancel())?;

    let confirm_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-danger")
        .text(if busy { "Deleting..." } else { "Delete" })
        .build();
    set_disabled(&confirm_btn, busy)?;
    on_click(&confirm_btn, move |_| on_confirm())?;

    append_child(&actions, &cancel_btn)?;
    append_child(&actions, &confirm_btn)?;
    append_child(&modal, &actions)?;
    append_child(&overlay, &modal)?;

    Ok(overlay)
}
