pub mod confirmation_modal;
pub mod header;
pub mod skeleton;

pub use confirmation_modal::render_confirmation_modal;
pub use header::render_header;
pub use skeleton::render_skeleton_grid;
