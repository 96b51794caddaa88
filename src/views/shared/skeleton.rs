// ============================================================================
// SKELETON - Loading placeholders for the product grid
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};

pub fn render_skeleton_grid(count: usize) -> Result<Element, JsValue> {
    let grid = ElementBuilder::new("div")?
        .class("product-grid product-grid-loading")
        .build();

    for _ in 0..count {
        let card = ElementBuilder::new("div")?.class("skeleton-card").build();
        let image = ElementBuilder::new("div")?.class("skeleton-image").build();
        let line = ElementBuilder::new("div")?.class("skeleton-line").build();
        let short = ElementBuilder::new("div")?
            .class("skeleton-line skeleton-line-short")
            .build();
        append_child(&card, &image)?;
        append_child(&card, &line)?;
        append_child(&card, &short)?;
        append_child(&grid, &card)?;
    }

    Ok(grid)
}
