// ============================================================================
// PRODUCT LIST VIEW - Grid, search, pagination and delete modal
// ============================================================================
// The toolbar is built once so the search input keeps focus while typing;
// only the grid, pagination and modal hosts re-render on state changes.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{
    append_child, create_element, event_target_value, on_click, on_input, set_attribute,
    set_class_name, set_disabled, set_inner_html, ElementBuilder,
};
use crate::state::{AppState, Route};
use crate::viewmodels::ProductListViewModel;
use crate::views::product_card::render_product_card;
use crate::views::shared::{render_confirmation_modal, render_skeleton_grid};

use std::rc::Rc;

pub fn render_products(state: &AppState) -> Result<Element, JsValue> {
    log::info!("🎬 Rendering product list");

    let page = ElementBuilder::new("div")?.class("products-page").build();

    let vm = ProductListViewModel::new(state.clone());

    // Toolbar
    let toolbar = ElementBuilder::new("div")?.class("products-toolbar").build();
    let heading = ElementBuilder::new("h1")?.text("Products").build();

    let search_input = create_element("input")?;
    set_attribute(&search_input, "type", "search")?;
    set_attribute(&search_input, "placeholder", "Search products...")?;
    set_class_name(&search_input, "search-input");
    {
        let vm = vm.clone();
        on_input(&search_input, move |e| {
            if let Some(value) = event_target_value(&e) {
                vm.set_search(value);
            }
        })?;
    }

    let add_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-primary")
        .text("Add Product")
        .build();
    {
        let state = state.clone();
        on_click(&add_btn, move |_| {
            state.navigate(Route::CreateProduct);
        })?;
    }

    append_child(&toolbar, &heading)?;
    append_child(&toolbar, &search_input)?;
    append_child(&toolbar, &add_btn)?;

    // Hosts that re-render on viewmodel changes
    let grid_host = ElementBuilder::new("div")?.class("grid-host").build();
    let pagination_host = ElementBuilder::new("div")?.class("pagination-host").build();
    let modal_host = ElementBuilder::new("div")?.class("modal-host").build();

    append_child(&page, &toolbar)?;
    append_child(&page, &grid_host)?;
    append_child(&page, &pagination_host)?;
    append_child(&page, &modal_host)?;

    let refresh: Rc<dyn Fn()> = {
        let state = state.clone();
        let vm = vm.clone();
        let grid_host = grid_host.clone();
        let pagination_host = pagination_host.clone();
        let modal_host = modal_host.clone();
        Rc::new(move || {
            if let Err(e) = render_grid(&state, &vm, &grid_host) {
                log::error!("❌ Grid render failed: {:?}", e);
            }
            if let Err(e) = render_pagination(&vm, &pagination_host) {
                log::error!("❌ Pagination render failed: {:?}", e);
            }
            if let Err(e) = render_delete_modal(&vm, &modal_host) {
                log::error!("❌ Modal render failed: {:?}", e);
            }
        })
    };

    {
        let refresh = refresh.clone();
        vm.start(move || refresh());
    }
    refresh();

    Ok(page)
}

fn render_grid(
    state: &AppState,
    vm: &ProductListViewModel,
    host: &Element,
) -> Result<(), JsValue> {
    set_inner_html(host, "");

    let products = vm.products();

    // Skeleton only for the first page of a key; a background refetch
    // (e.g. after a delete invalidation) keeps the current content visible
    if vm.is_initial_load() {
        let skeleton = render_skeleton_grid(CONFIG.page_size)?;
        append_child(host, &skeleton)?;
        return Ok(());
    }

    if let Some(error) = vm.error() {
        if products.is_empty() {
            let error_el = ElementBuilder::new("div")?
                .class("error-state")
                .text(error.message())
                .build();
            append_child(host, &error_el)?;
            return Ok(());
        }
        // Stale data stays visible; the failure shows above it
        let banner = ElementBuilder::new("div")?
            .class("error-banner")
            .text(error.message())
            .build();
        append_child(host, &banner)?;
    }

    if products.is_empty() {
        let empty = ElementBuilder::new("div")?
            .class("empty-state")
            .text("No products found.")
            .build();
        append_child(host, &empty)?;
        return Ok(());
    }

    let grid = ElementBuilder::new("div")?.class("product-grid").build();
    for product in &products {
        let card = render_product_card(state, vm, product)?;
        append_child(&grid, &card)?;
    }
    append_child(host, &grid)?;

    Ok(())
}

fn render_pagination(vm: &ProductListViewModel, host: &Element) -> Result<(), JsValue> {
    set_inner_html(host, "");

    // Search results are a single unpaged list
    if vm.is_searching() {
        return Ok(());
    }

    let bar = ElementBuilder::new("div")?.class("pagination").build();

    let prev_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Previous")
        .build();
    set_disabled(&prev_btn, vm.offset() == 0)?;
    {
        let vm = vm.clone();
        on_click(&prev_btn, move |_| vm.prev_page())?;
    }

    let page_number = vm.offset() / CONFIG.page_size + 1;
    let indicator = ElementBuilder::new("span")?
        .class("page-indicator")
        .text(&format!("Page {}", page_number))
        .build();

    let next_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Next")
        .build();
    {
        let vm = vm.clone();
        on_click(&next_btn, move |_| vm.next_page())?;
    }

    append_child(&bar, &prev_btn)?;
    append_child(&bar, &indicator)?;
    append_child(&bar, &next_btn)?;
    append_child(host, &bar)?;

    Ok(())
}

fn render_delete_modal(vm: &ProductListViewModel, host: &Element) -> Result<(), JsValue> {
    set_inner_html(host, "");

    let target = match vm.delete_target() {
        Some(target) => target,
        None => return Ok(()),
    };

    let message = format!(
        "Are you sure you want to delete \"{}\"? This action cannot be undone.",
        target.name
    );
    let error = vm.delete_error();

    let confirm_vm = vm.clone();
    let cancel_vm = vm.clone();
    let modal = render_confirmation_modal(
        &message,
        vm.is_deleting(),
        error.as_ref().map(|e| e.message()),
        move || confirm_vm.confirm_delete(),
        move || cancel_vm.cancel_delete(),
    )?;
    append_child(host, &modal)?;

    Ok(())
}
