// ============================================================================
// LOGIN VIEW - Email-only sign in
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, create_element, event_target_value, on_input, on_submit, set_attribute,
    set_class_name, set_disabled, set_text_content, ElementBuilder,
};
use crate::state::AppState;
use crate::viewmodels::LoginViewModel;

pub fn render_login(state: &AppState) -> Result<Element, JsValue> {
    log::info!("🎬 Rendering login");

    // Local form state lives in the closures
    let email = Rc::new(RefCell::new(String::new()));
    let loading = Rc::new(Cell::new(false));

    let screen = ElementBuilder::new("div")?.class("login-screen").build();
    let container = ElementBuilder::new("div")?.class("login-container").build();

    let header = ElementBuilder::new("div")?.class("login-header").build();
    let title = ElementBuilder::new("h1")?.text("Catalog Admin").build();
    let subtitle = ElementBuilder::new("p")?
        .text("Sign in to manage your products")
        .build();
    append_child(&header, &title)?;
    append_child(&header, &subtitle)?;

    let form = create_element("form")?;
    set_class_name(&form, "login-form");

    let group = ElementBuilder::new("div")?.class("form-group").build();
    let label = ElementBuilder::new("label")?
        .attr("for", "email")?
        .text("Email")
        .build();

    let input = create_element("input")?;
    set_attribute(&input, "type", "email")?;
    set_attribute(&input, "id", "email")?;
    set_attribute(&input, "name", "email")?;
    set_attribute(&input, "placeholder", "you@example.com")?;
    set_class_name(&input, "form-input");
    {
        let email = email.clone();
        on_input(&input, move |e| {
            if let Some(value) = event_target_value(&e) {
                *email.borrow_mut() = value;
            }
        })?;
    }

    append_child(&group, &label)?;
    append_child(&group, &input)?;

    let error_el = ElementBuilder::new("p")?.class("form-error").build();

    let submit_btn = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn btn-primary btn-login")
        .text("Sign In")
        .build();

    {
        let email = email.clone();
        let loading = loading.clone();
        let state = state.clone();
        let error_el = error_el.clone();
        let submit_btn = submit_btn.clone();

        on_submit(&form, move |e| {
            e.prevent_default();

            if loading.get() {
                return;
            }
            loading.set(true);
            set_text_content(&error_el, "");
            set_text_content(&submit_btn, "Signing in...");
            let _ = set_disabled(&submit_btn, true);

            let email_val = email.borrow().clone();
            let state = state.clone();
            let loading = loading.clone();
            let error_el = error_el.clone();
            let submit_btn = submit_btn.clone();

            spawn_local(async move {
                let vm = LoginViewModel::new(state);
                match vm.login(&email_val).await {
                    Ok(()) => {
                        // Navigation already happened; the app re-renders
                        log::info!("✅ Login succeeded");
                    }
                    Err(error) => {
                        log::error!("❌ Login failed: {}", error);
                        set_text_content(&error_el, error.message());
                        set_text_content(&submit_btn, "Sign In");
                        let _ = set_disabled(&submit_btn, false);
                        loading.set(false);
                    }
                }
            });
        })?;
    }

    append_child(&form, &group)?;
    append_child(&form, &error_el)?;
    append_child(&form, &submit_btn)?;

    append_child(&container, &header)?;
    append_child(&container, &form)?;
    append_child(&screen, &container)?;

    Ok(screen)
}
