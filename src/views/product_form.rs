// ============================================================================
// PRODUCT FORM VIEW - Create and edit pages
// ============================================================================
// Inputs are built once; the refresh closure only touches error texts, the
// category options and the image rows, so typing never loses focus.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{
    append_child, create_element, event_target_value, on_blur, on_change, on_click, on_input,
    on_submit, set_attribute, set_class_name, set_disabled, set_inner_html, set_input_value,
    set_text_content, ElementBuilder,
};
use crate::models::Product;
use crate::query::{QueryKey, ResourceTag};
use crate::services::ApiClient;
use crate::state::{AppState, Route};
use crate::viewmodels::{FormMode, FormValues, ProductFormViewModel};

pub fn render_create_product(state: &AppState) -> Result<Element, JsValue> {
    log::info!("🎬 Rendering create product form");

    let page = ElementBuilder::new("div")?.class("form-page").build();
    let heading = ElementBuilder::new("h1")?.text("Add Product").build();
    append_child(&page, &heading)?;

    let form = build_form(state, FormMode::Create, FormValues::empty())?;
    append_child(&page, &form)?;

    Ok(page)
}

/// Edit is a two-phase render: fetch the product by slug first, then mount
/// the form with its values.
pub fn render_edit_product(state: &AppState, slug: &str) -> Result<Element, JsValue> {
    log::info!("🎬 Rendering edit form for: {}", slug);

    let page = ElementBuilder::new("div")?.class("form-page").build();
    let heading = ElementBuilder::new("h1")?.text("Edit Product").build();
    let host = ElementBuilder::new("div")?.class("form-host").build();
    append_child(&page, &heading)?;
    append_child(&page, &host)?;

    let token = match state.session.token() {
        Some(token) => token,
        None => return Ok(page),
    };

    #[derive(serde::Serialize)]
    struct Args<'a> {
        slug: &'a str,
    }

    let slot = state.new_subscription_slot();
    let mounted = Rc::new(Cell::new(false));

    let api = ApiClient::new();
    let fetch_slug = slug.to_string();
    let state_clone = state.clone();
    let subscription = state.queries.subscribe_query(
        QueryKey::new("getProductBySlug", &Args { slug }),
        &[ResourceTag::Product],
        move || {
            let api = api.clone();
            let token = token.clone();
            let slug = fetch_slug.clone();
            async move { api.get_product_by_slug(&token, &slug).await }
        },
        move |query_state| {
            // Once the form is mounted it owns the host
            if mounted.get() {
                return;
            }
            if let Some(product) = query_state.decode::<Product>() {
                mounted.set(true);
                set_inner_html(&host, "");
                let mode = FormMode::Edit {
                    id: product.id.clone(),
                };
                match build_form(&state_clone, mode, FormValues::from_product(&product)) {
                    Ok(form) => {
                        if let Err(e) = append_child(&host, &form) {
                            log::error!("❌ Form mount failed: {:?}", e);
                        }
                    }
                    Err(e) => log::error!("❌ Form build failed: {:?}", e),
                }
                return;
            }
            set_inner_html(&host, "");
            let status = if query_state.is_loading {
                "Loading product..."
            } else if let Some(error) = &query_state.error {
                if error.is_not_found() {
                    "Product not found."
                } else {
                    error.message()
                }
            } else {
                return;
            };
            if let Ok(status_el) = ElementBuilder::new("p") {
                let status_el = status_el.class("form-status").text(status).build();
                let _ = append_child(&host, &status_el);
            }
        },
    );
    *slot.borrow_mut() = Some(subscription);

    Ok(page)
}

fn build_form(
    state: &AppState,
    mode: FormMode,
    initial: FormValues,
) -> Result<Element, JsValue> {
    let vm = ProductFormViewModel::new(state.clone(), mode.clone(), initial.clone());

    let form = create_element("form")?;
    set_class_name(&form, "product-form");
    {
        let vm = vm.clone();
        on_submit(&form, move |e| {
            e.prevent_default();
            vm.submit();
        })?;
    }

    // Name
    let (name_group, name_err) = {
        let group = ElementBuilder::new("div")?.class("form-group").build();
        let label = ElementBuilder::new("label")?
            .attr("for", "product-name")?
            .text("Name")
            .build();
        let input = create_element("input")?;
        set_attribute(&input, "type", "text")?;
        set_attribute(&input, "id", "product-name")?;
        set_class_name(&input, "form-input");
        set_input_value(&input, &initial.name);
        {
            let vm = vm.clone();
            on_input(&input, move |e| {
                if let Some(value) = event_target_value(&e) {
                    vm.set_name(value);
                }
            })?;
        }
        {
            let vm = vm.clone();
            on_blur(&input, move |_| vm.blur_name())?;
        }
        let error = ElementBuilder::new("span")?.class("field-error").build();
        append_child(&group, &label)?;
        append_child(&group, &input)?;
        append_child(&group, &error)?;
        (group, error)
    };

    // Description
    let (description_group, description_err) = {
        let group = ElementBuilder::new("div")?.class("form-group").build();
        let label = ElementBuilder::new("label")?
            .attr("for", "product-description")?
            .text("Description")
            .build();
        let area = create_element("textarea")?;
        set_attribute(&area, "id", "product-description")?;
        set_attribute(&area, "rows", "4")?;
        set_class_name(&area, "form-input");
        set_input_value(&area, &initial.description);
        {
            let vm = vm.clone();
            on_input(&area, move |e| {
                if let Some(value) = event_target_value(&e) {
                    vm.set_description(value);
                }
            })?;
        }
        {
            let vm = vm.clone();
            on_blur(&area, move |_| vm.blur_description())?;
        }
        let error = ElementBuilder::new("span")?.class("field-error").build();
        append_child(&group, &label)?;
        append_child(&group, &area)?;
        append_child(&group, &error)?;
        (group, error)
    };

    // Price
    let (price_group, price_err) = {
        let group = ElementBuilder::new("div")?.class("form-group").build();
        let label = ElementBuilder::new("label")?
            .attr("for", "product-price")?
            .text("Price")
            .build();
        let input = create_element("input")?;
        set_attribute(&input, "type", "text")?;
        set_attribute(&input, "inputmode", "decimal")?;
        set_attribute(&input, "id", "product-price")?;
        set_class_name(&input, "form-input");
        set_input_value(&input, &initial.price);
        {
            let vm = vm.clone();
            on_input(&input, move |e| {
                if let Some(value) = event_target_value(&e) {
                    vm.set_price(value);
                }
            })?;
        }
        {
            let vm = vm.clone();
            on_blur(&input, move |_| vm.blur_price())?;
        }
        let error = ElementBuilder::new("span")?.class("field-error").build();
        append_child(&group, &label)?;
        append_child(&group, &input)?;
        append_child(&group, &error)?;
        (group, error)
    };

    // Category
    let (category_group, category_select, category_err) = {
        let group = ElementBuilder::new("div")?.class("form-group").build();
        let label = ElementBuilder::new("label")?
            .attr("for", "product-category")?
            .text("Category")
            .build();
        let select = create_element("select")?;
        set_attribute(&select, "id", "product-category")?;
        set_class_name(&select, "form-input");
        {
            let vm = vm.clone();
            on_change(&select, move |e| {
                if let Some(value) = event_target_value(&e) {
                    vm.set_category(value);
                }
            })?;
        }
        {
            let vm = vm.clone();
            on_blur(&select, move |_| vm.blur_category())?;
        }
        let error = ElementBuilder::new("span")?.class("field-error").build();
        append_child(&group, &label)?;
        append_child(&group, &select)?;
        append_child(&group, &error)?;
        (group, select, error)
    };

    // Images
    let (images_group, image_rows_host, images_err) = {
        let group = ElementBuilder::new("div")?.class("form-group").build();
        let label = ElementBuilder::new("label")?.text("Images").build();
        let rows_host = ElementBuilder::new("div")?.class("image-rows").build();
        let add_btn = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class("btn btn-secondary btn-add-image")
            .text("Add image URL")
            .build();
        {
            let vm = vm.clone();
            on_click(&add_btn, move |_| vm.add_image())?;
        }
        let error = ElementBuilder::new("span")?.class("field-error").build();
        append_child(&group, &label)?;
        append_child(&group, &rows_host)?;
        append_child(&group, &add_btn)?;
        append_child(&group, &error)?;
        (group, rows_host, error)
    };

    let submit_error_el = ElementBuilder::new("p")?.class("form-error").build();

    // Actions
    let actions = ElementBuilder::new("div")?.class("form-actions").build();
    let cancel_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn btn-secondary")
        .text("Cancel")
        .build();
    {
        let state = state.clone();
        on_click(&cancel_btn, move |_| {
            state.navigate(Route::Products);
        })?;
    }
    let submit_label = match &mode {
        FormMode::Create => "Create Product",
        FormMode::Edit { .. } => "Save Changes",
    };
    let submit_btn = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn btn-primary")
        .text(submit_label)
        .build();
    append_child(&actions, &cancel_btn)?;
    append_child(&actions, &submit_btn)?;

    append_child(&form, &name_group)?;
    append_child(&form, &description_group)?;
    append_child(&form, &price_group)?;
    append_child(&form, &category_group)?;
    append_child(&form, &images_group)?;
    append_child(&form, &submit_error_el)?;
    append_child(&form, &actions)?;

    // Refresh closure: errors, submit state, category options, image rows
    let last_image_count = Rc::new(Cell::new(usize::MAX));
    let last_category_count = Rc::new(Cell::new(usize::MAX));

    let refresh: Rc<dyn Fn()> = {
        let vm = vm.clone();
        let submit_label = submit_label.to_string();
        Rc::new(move || {
            let errors = vm.errors();
            set_text_content(&name_err, errors.name.as_deref().unwrap_or(""));
            set_text_content(&description_err, errors.description.as_deref().unwrap_or(""));
            set_text_content(&price_err, errors.price.as_deref().unwrap_or(""));
            if let Some(category_error) = errors.category.as_deref() {
                set_text_content(&category_err, category_error);
            } else if let Some(load_error) = vm.categories_error() {
                set_text_content(&category_err, load_error.message());
            } else {
                set_text_content(&category_err, "");
            }
            set_text_content(&images_err, errors.images.as_deref().unwrap_or(""));

            set_text_content(
                &submit_error_el,
                vm.submit_error().as_deref().unwrap_or(""),
            );

            if vm.is_submitting() {
                set_text_content(&submit_btn, "Saving...");
            } else {
                set_text_content(&submit_btn, &submit_label);
            }
            let _ = set_disabled(&submit_btn, vm.is_submitting());

            let categories = vm.categories();
            if categories.len() != last_category_count.get() {
                last_category_count.set(categories.len());
                set_inner_html(&category_select, "");
                if let Err(e) = rebuild_category_options(&category_select, &vm) {
                    log::error!("❌ Category options render failed: {:?}", e);
                }
            }
            let _ = set_disabled(&category_select, vm.is_loading_categories());

            let image_count = vm.values().images.len();
            if image_count != last_image_count.get() {
                last_image_count.set(image_count);
                if let Err(e) = rebuild_image_rows(&image_rows_host, &vm) {
                    log::error!("❌ Image rows render failed: {:?}", e);
                }
            }
        })
    };

    {
        let refresh = refresh.clone();
        vm.start(move || refresh());
    }
    refresh();

    Ok(form)
}

fn rebuild_category_options(
    select: &Element,
    vm: &ProductFormViewModel,
) -> Result<(), JsValue> {
    let placeholder = create_element("option")?;
    set_attribute(&placeholder, "value", "")?;
    set_text_content(&placeholder, "Select a category");
    append_child(select, &placeholder)?;

    for category in vm.categories() {
        let option = create_element("option")?;
        set_attribute(&option, "value", &category.id)?;
        set_text_content(&option, &category.name);
        append_child(select, &option)?;
    }

    // Restore the selection after the options were replaced
    set_input_value(select, &vm.values().category_id);
    Ok(())
}

fn rebuild_image_rows(host: &Element, vm: &ProductFormViewModel) -> Result<(), JsValue> {
    set_inner_html(host, "");

    let images = vm.values().images;
    let count = images.len();

    for (index, value) in images.iter().enumerate() {
        let row = ElementBuilder::new("div")?.class("image-row").build();

        let input = create_element("input")?;
        set_attribute(&input, "type", "text")?;
        set_attribute(&input, "placeholder", "https://example.com/image.jpg")?;
        set_class_name(&input, "form-input");
        set_input_value(&input, value);
        {
            let vm = vm.clone();
            on_input(&input, move |e| {
                if let Some(value) = event_target_value(&e) {
                    vm.set_image(index, value);
                }
            })?;
        }
        {
            let vm = vm.clone();
            on_blur(&input, move |_| vm.blur_images())?;
        }

        let remove_btn = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class("btn btn-secondary btn-remove-image")
            .text("✕")
            .build();
        // The form always keeps at least one row
        set_disabled(&remove_btn, count == 1)?;
        {
            let vm = vm.clone();
            on_click(&remove_btn, move |_| vm.remove_image(index))?;
        }

        append_child(&row, &input)?;
        append_child(&row, &remove_btn)?;
        append_child(host, &row)?;
    }

    Ok(())
}
