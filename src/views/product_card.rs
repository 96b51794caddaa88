// ============================================================================
// PRODUCT CARD - One grid cell in the product list
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::models::Product;
use crate::state::{AppState, Route};
use crate::viewmodels::ProductListViewModel;

pub fn render_product_card(
    state: &AppState,
    vm: &ProductListViewModel,
    product: &Product,
) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?.class("product-card").build();

    let image = ElementBuilder::new("img")?
        .class("product-image")
        .attr("src", product.primary_image())?
        .attr("alt", &product.name)?
        .build();

    let info = ElementBuilder::new("div")?.class("product-info").build();
    let name = ElementBuilder::new("h3")?
        .class("product-name")
        .text(&product.name)
        .build();
    let category = ElementBuilder::new("p")?
        .class("product-category")
        .text(&product.category.name)
        .build();
    let price = ElementBuilder::new("p")?
        .class("product-price")
        .text(&format!("${:.2}", product.price))
        .build();
    append_child(&info, &name)?;
    append_child(&info, &category)?;
    append_child(&info, &price)?;

    let actions = ElementBuilder::new("div")?.class("product-actions").build();

    let details_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Details")
        .build();
    {
        let state = state.clone();
        let slug = product.slug.clone();
        on_click(&details_btn, move |_| {
            state.navigate(Route::ProductDetails(slug.clone()));
        })?;
    }

    let edit_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Edit")
        .build();
    {
        let state = state.clone();
        let slug = product.slug.clone();
        on_click(&edit_btn, move |_| {
            state.navigate(Route::EditProduct(slug.clone()));
        })?;
    }

    let delete_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-danger")
        .text("Delete")
        .build();
    {
        let vm = vm.clone();
        let product = product.clone();
        on_click(&delete_btn, move |_| {
            vm.request_delete(product.clone());
        })?;
    }

    append_child(&actions, &details_btn)?;
    append_child(&actions, &edit_btn)?;
    append_child(&actions, &delete_btn)?;

    append_child(&card, &image)?;
    append_child(&card, &info)?;
    append_child(&card, &actions)?;

    Ok(card)
}
