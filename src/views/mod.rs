// ============================================================================
// VIEWS - Page rendering
// ============================================================================

pub mod login;
pub mod product_card;
pub mod product_details;
pub mod product_form;
pub mod product_list;
pub mod shared;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::state::{AppState, Route};

/// Render the page for the current route. Unauthenticated sessions are
/// redirected to the login page before anything protected mounts.
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let mut route = state.route();
    if route.requires_auth() && !state.session.is_authenticated() {
        state.redirect(Route::Login);
        route = Route::Login;
    }

    let root = ElementBuilder::new("div")?.class("app-root").build();

    if let Route::Login = route {
        let page = login::render_login(state)?;
        append_child(&root, &page)?;
        return Ok(root);
    }

    let header = shared::render_header(state)?;
    append_child(&root, &header)?;

    let page = match route {
        Route::Products | Route::Login => product_list::render_products(state)?,
        Route::CreateProduct => product_form::render_create_product(state)?,
        Route::EditProduct(slug) => product_form::render_edit_product(state, &slug)?,
        Route::ProductDetails(slug) => product_details::render_product_details(state, &slug)?,
    };
    append_child(&root, &page)?;

    Ok(root)
}
