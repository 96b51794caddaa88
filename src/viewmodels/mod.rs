// ============================================================================
// VIEWMODELS - Business logic behind each page
// ============================================================================
// Viewmodels own the per-page state and talk to the query layer; the views
// only render and forward DOM events.
// ============================================================================

pub mod login_viewmodel;
pub mod product_details_viewmodel;
pub mod product_form_viewmodel;
pub mod product_list_viewmodel;

pub use login_viewmodel::LoginViewModel;
pub use product_details_viewmodel::ProductDetailsViewModel;
pub use product_form_viewmodel::{FormMode, FormValues, ProductFormViewModel};
pub use product_list_viewmodel::ProductListViewModel;
