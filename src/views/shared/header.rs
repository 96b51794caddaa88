// ============================================================================
// HEADER - Top navigation bar
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::{AppState, Route};

pub fn render_header(state: &AppState) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("header")?.class("app-header").build();

    let brand = ElementBuilder::new("div")?
        .class("app-brand")
        .text("Catalog Admin")
        .build();
    {
        let state = state.clone();
        on_click(&brand, move |_| {
            state.navigate(Route::Products);
        })?;
    }

    let nav = ElementBuilder::new("nav")?.class("app-nav").build();

    let products_link = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("nav-link")
        .text("Products")
        .build();
    {
        let state = state.clone();
        on_click(&products_link, move |_| {
            state.navigate(Route::Products);
        })?;
    }

    let create_link = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("nav-link")
        .text("Add Product")
        .build();
    {
        let state = state.clone();
        on_click(&create_link, move |_| {
            state.navigate(Route::CreateProduct);
        })?;
    }

    let logout_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("nav-link nav-logout")
        .text("Logout")
        .build();
    {
        let state = state.clone();
        on_click(&logout_btn, move |_| {
            // Clearing the session re-renders the app on the login page
            state.session.clear();
        })?;
    }

    append_child(&nav, &products_link)?;
    append_child(&nav, &create_link)?;
    append_child(&nav, &logout_btn)?;

    append_child(&header, &brand)?;
    append_child(&header, &nav)?;

    Ok(header)
}
