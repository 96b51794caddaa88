// ============================================================================
// PRODUCT DETAILS VIEW - Gallery, metadata and delete
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, set_inner_html, ElementBuilder};
use crate::models::Product;
use crate::state::{AppState, Route};
use crate::viewmodels::ProductDetailsViewModel;
use crate::views::shared::render_confirmation_modal;

use std::rc::Rc;

pub fn render_product_details(state: &AppState, slug: &str) -> Result<Element, JsValue> {
    log::info!("🎬 Rendering product details: {}", slug);

    let page = ElementBuilder::new("div")?.class("details-page").build();
    let host = ElementBuilder::new("div")?.class("details-host").build();
    append_child(&page, &host)?;

    let vm = ProductDetailsViewModel::new(state.clone(), slug.to_string());

    let refresh: Rc<dyn Fn()> = {
        let state = state.clone();
        let vm = vm.clone();
        let host = host.clone();
        Rc::new(move || {
            if let Err(e) = render_content(&state, &vm, &host) {
                log::error!("❌ Details render failed: {:?}", e);
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

fn render_content(
    state: &AppState,
    vm: &ProductDetailsViewModel,
    host: &Element,
) -> Result<(), JsValue> {
    set_inner_html(host, "");

    let product = match vm.product() {
        Some(product) => product,
        None => {
            let status = if vm.is_loading() {
                "Loading product...".to_string()
            } else if let Some(error) = vm.error() {
                if error.is_not_found() {
                    "Product not found.".to_string()
                } else {
                    error.message().to_string()
                }
            } else {
                return Ok(());
            };
            let status_el = ElementBuilder::new("p")?
                .class("details-status")
                .text(&status)
                .build();
            append_child(host, &status_el)?;
            return Ok(());
        }
    };

    append_child(host, &render_gallery(vm, &product)?)?;
    append_child(host, &render_info(state, vm, &product)?)?;

    if vm.is_delete_requested() {
        let message = format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            product.name
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
    }

    Ok(())
}

fn render_gallery(vm: &ProductDetailsViewModel, product: &Product) -> Result<Element, JsValue> {
    let gallery = ElementBuilder::new("div")?.class("details-gallery").build();

    let images = product.display_images();
    let active = vm.active_image().min(images.len() - 1);

    let main_image = ElementBuilder::new("img")?
        .class("details-image")
        .attr("src", images[active])?
        .attr("alt", &product.name)?
        .build();
    append_child(&gallery, &main_image)?;

    if images.len() > 1 {
        let thumbnails = ElementBuilder::new("div")?
            .class("details-thumbnails")
            .build();
        for (index, url) in images.iter().enumerate() {
            let class = if index == active {
                "thumbnail thumbnail-active"
            } else {
                "thumbnail"
            };
            let thumb = ElementBuilder::new("img")?
                .class(class)
                .attr("src", url)?
                .attr("alt", &format!("{} image {}", product.name, index + 1))?
                .build();
            {
                let vm = vm.clone();
                on_click(&thumb, move |_| vm.select_image(index))?;
            }
            append_child(&thumbnails, &thumb)?;
        }
        append_child(&gallery, &thumbnails)?;
    }

    Ok(gallery)
}

fn render_info(
    state: &AppState,
    vm: &ProductDetailsViewModel,
    product: &Product,
) -> Result<Element, JsValue> {
    let info = ElementBuilder::new("div")?.class("details-info").build();

    let name = ElementBuilder::new("h1")?.text(&product.name).build();
    let category = ElementBuilder::new("p")?
        .class("details-category")
        .text(&product.category.name)
        .build();
    let price = ElementBuilder::new("p")?
        .class("details-price")
        .text(&format!("${:.2}", product.price))
        .build();
    let description = ElementBuilder::new("p")?
        .class("details-description")
        .text(&product.description)
        .build();
    let updated = ElementBuilder::new("p")?
        .class("details-timestamp")
        .text(&format!(
            "Last updated {}",
            product.updated_at.format("%Y-%m-%d %H:%M UTC")
        ))
        .build();

    let actions = ElementBuilder::new("div")?.class("details-actions").build();

    let back_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Back to products")
        .build();
    {
        let state = state.clone();
        on_click(&back_btn, move |_| {
            state.navigate(Route::Products);
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
        on_click(&delete_btn, move |_| vm.request_delete())?;
    }

    append_child(&actions, &back_btn)?;
    append_child(&actions, &edit_btn)?;
    append_child(&actions, &delete_btn)?;

    append_child(&info, &name)?;
    append_child(&info, &category)?;
    append_child(&info, &price)?;
    append_child(&info, &description)?;
    append_child(&info, &updated)?;
    append_child(&info, &actions)?;

    Ok(info)
}
