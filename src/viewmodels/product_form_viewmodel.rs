// ============================================================================
// PRODUCT FORM VIEWMODEL - Create/edit with field-level validation
// ============================================================================
// Validation runs on blur; once a field has an error it revalidates on every
// change until the error clears. Submit revalidates everything.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::{Category, CreateProductPayload, Product, UpdateProductPayload};
use crate::query::{QueryKey, ResourceTag};
use crate::services::{ApiClient, ApiError};
use crate::state::{AppState, Route, SubscriptionSlot};

#[derive(Clone, Debug, PartialEq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Raw field values as the user sees them. Price stays a string until
/// validation so partial input never gets clobbered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormValues {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category_id: String,
    pub images: Vec<String>,
}

impl FormValues {
    pub fn empty() -> Self {
        Self {
            // One blank row so the form always shows an image input
            images: vec![String::new()],
            ..Default::default()
        }
    }

    pub fn from_product(product: &Product) -> Self {
        let images = if product.images.is_empty() {
            vec![String::new()]
        } else {
            product.images.clone()
        };
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category_id: product.category.id.clone(),
            images,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormErrors {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub images: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.images.is_none()
    }
}

/// Validated, trimmed form output ready to become a request payload
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    pub images: Vec<String>,
}

impl ValidatedProduct {
    pub fn create_payload(&self) -> CreateProductPayload {
        CreateProductPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category_id: self.category_id.clone(),
            images: self.images.clone(),
        }
    }

    pub fn update_payload(&self) -> UpdateProductPayload {
        UpdateProductPayload {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            price: Some(self.price),
            category_id: Some(self.category_id.clone()),
            images: Some(self.images.clone()),
        }
    }
}

// ----------------------------------------------------------------------
// Field validators
// ----------------------------------------------------------------------

pub fn validate_name(name: &str) -> Option<String> {
    if name.trim().chars().count() < 2 {
        Some("Name must be at least 2 characters".to_string())
    } else {
        None
    }
}

pub fn validate_description(description: &str) -> Option<String> {
    if description.trim().chars().count() < 5 {
        Some("Description must be at least 5 characters".to_string())
    } else {
        None
    }
}

pub fn validate_price(price: &str) -> Option<String> {
    match price.trim().parse::<f64>() {
        Err(_) => Some("Price must be a number".to_string()),
        Ok(value) if value.is_nan() => Some("Price must be a number".to_string()),
        Ok(value) if value <= 0.0 => Some("Price must be greater than 0".to_string()),
        Ok(_) => None,
    }
}

pub fn validate_category(category_id: &str) -> Option<String> {
    if category_id.trim().is_empty() {
        Some("Category is required".to_string())
    } else {
        None
    }
}

pub fn validate_images(images: &[String]) -> Option<String> {
    if images.is_empty() {
        return Some("At least one image URL is required".to_string());
    }
    for image in images {
        let trimmed = image.trim();
        if trimmed.is_empty() {
            return Some("Image URL cannot be empty".to_string());
        }
        if url::Url::parse(trimmed).is_err() {
            return Some("Enter a valid URL".to_string());
        }
    }
    None
}

/// Validate the whole form, returning either trimmed payload data or the
/// full set of field errors.
pub fn validate(values: &FormValues) -> Result<ValidatedProduct, FormErrors> {
    let errors = FormErrors {
        name: validate_name(&values.name),
        description: validate_description(&values.description),
        price: validate_price(&values.price),
        category: validate_category(&values.category_id),
        images: validate_images(&values.images),
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    // validate_price accepted the input, so the parse cannot fail here
    let price = values.price.trim().parse::<f64>().map_err(|_| FormErrors {
        price: Some("Price must be a number".to_string()),
        ..Default::default()
    })?;

    Ok(ValidatedProduct {
        name: values.name.trim().to_string(),
        description: values.description.trim().to_string(),
        price,
        category_id: values.category_id.trim().to_string(),
        images: values.images.iter().map(|i| i.trim().to_string()).collect(),
    })
}

// ----------------------------------------------------------------------
// Viewmodel
// ----------------------------------------------------------------------

#[derive(Clone)]
pub struct ProductFormViewModel {
    api_client: ApiClient,
    state: AppState,
    mode: FormMode,

    values: Rc<RefCell<FormValues>>,
    errors: Rc<RefCell<FormErrors>>,
    submitting: Rc<Cell<bool>>,
    submit_error: Rc<RefCell<Option<String>>>,

    categories: Rc<RefCell<Vec<Category>>>,
    loading_categories: Rc<Cell<bool>>,
    categories_error: Rc<RefCell<Option<ApiError>>>,
    categories_subscription: SubscriptionSlot,

    on_change: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl ProductFormViewModel {
    pub fn new(state: AppState, mode: FormMode, initial: FormValues) -> Self {
        let categories_subscription = state.new_subscription_slot();
        Self {
            api_client: ApiClient::new(),
            state,
            mode,
            values: Rc::new(RefCell::new(initial)),
            errors: Rc::new(RefCell::new(FormErrors::default())),
            submitting: Rc::new(Cell::new(false)),
            submit_error: Rc::new(RefCell::new(None)),
            categories: Rc::new(RefCell::new(Vec::new())),
            loading_categories: Rc::new(Cell::new(false)),
            categories_error: Rc::new(RefCell::new(None)),
            categories_subscription,
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    pub fn start<F>(&self, on_change: F)
    where
        F: Fn() + 'static,
    {
        *self.on_change.borrow_mut() = Some(Rc::new(on_change));
        self.load_categories();
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn values(&self) -> FormValues {
        self.values.borrow().clone()
    }

    pub fn errors(&self) -> FormErrors {
        self.errors.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    pub fn submit_error(&self) -> Option<String> {
        self.submit_error.borrow().clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.borrow().clone()
    }

    pub fn is_loading_categories(&self) -> bool {
        self.loading_categories.get()
    }

    /// Category load failure. The form stays usable; only the select is
    /// affected.
    pub fn categories_error(&self) -> Option<ApiError> {
        self.categories_error.borrow().clone()
    }

    // ------------------------------------------------------------------
    // Field setters (revalidate on change only while the field is in error)
    // ------------------------------------------------------------------

    pub fn set_name(&self, name: String) {
        self.values.borrow_mut().name = name;
        let mut errors = self.errors.borrow_mut();
        if errors.name.is_some() {
            errors.name = validate_name(&self.values.borrow().name);
        }
        drop(errors);
        self.emit();
    }

    pub fn set_description(&self, description: String) {
        self.values.borrow_mut().description = description;
        let mut errors = self.errors.borrow_mut();
        if errors.description.is_some() {
            errors.description = validate_description(&self.values.borrow().description);
        }
        drop(errors);
        self.emit();
    }

    pub fn set_price(&self, price: String) {
        self.values.borrow_mut().price = price;
        let mut errors = self.errors.borrow_mut();
        if errors.price.is_some() {
            errors.price = validate_price(&self.values.borrow().price);
        }
        drop(errors);
        self.emit();
    }

    pub fn set_category(&self, category_id: String) {
        self.values.borrow_mut().category_id = category_id;
        let mut errors = self.errors.borrow_mut();
        if errors.category.is_some() {
            errors.category = validate_category(&self.values.borrow().category_id);
        }
        drop(errors);
        self.emit();
    }

    pub fn set_image(&self, index: usize, url: String) {
        {
            let mut values = self.values.borrow_mut();
            if let Some(slot) = values.images.get_mut(index) {
                *slot = url;
            }
        }
        let mut errors = self.errors.borrow_mut();
        if errors.images.is_some() {
            errors.images = validate_images(&self.values.borrow().images);
        }
        drop(errors);
        self.emit();
    }

    pub fn add_image(&self) {
        self.values.borrow_mut().images.push(String::new());
        self.emit();
    }

    pub fn remove_image(&self, index: usize) {
        {
            let mut values = self.values.borrow_mut();
            if values.images.len() > 1 && index < values.images.len() {
                values.images.remove(index);
            }
        }
        let mut errors = self.errors.borrow_mut();
        if errors.images.is_some() {
            errors.images = validate_images(&self.values.borrow().images);
        }
        drop(errors);
        self.emit();
    }

    // ------------------------------------------------------------------
    // Blur handlers
    // ------------------------------------------------------------------

    pub fn blur_name(&self) {
        self.errors.borrow_mut().name = validate_name(&self.values.borrow().name);
        self.emit();
    }

    pub fn blur_description(&self) {
        self.errors.borrow_mut().description =
            validate_description(&self.values.borrow().description);
        self.emit();
    }

    pub fn blur_price(&self) {
        self.errors.borrow_mut().price = validate_price(&self.values.borrow().price);
        self.emit();
    }

    pub fn blur_category(&self) {
        self.errors.borrow_mut().category = validate_category(&self.values.borrow().category_id);
        self.emit();
    }

    pub fn blur_images(&self) {
        self.errors.borrow_mut().images = validate_images(&self.values.borrow().images);
        self.emit();
    }

    // ------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------

    /// Validate and send. On success the whole product list is invalidated
    /// and the app returns to it.
    pub fn submit(&self) {
        if self.submitting.get() {
            return;
        }

        let validated = match validate(&self.values.borrow()) {
            Ok(validated) => validated,
            Err(errors) => {
                *self.errors.borrow_mut() = errors;
                self.emit();
                return;
            }
        };
        *self.errors.borrow_mut() = FormErrors::default();

        let token = match self.state.session.token() {
            Some(token) => token,
            None => {
                *self.submit_error.borrow_mut() =
                    Some("You are not authenticated".to_string());
                self.emit();
                return;
            }
        };

        self.submitting.set(true);
        *self.submit_error.borrow_mut() = None;
        self.emit();

        let vm = self.clone();
        let api = self.api_client.clone();
        let mode = self.mode.clone();
        self.state.queries.mutate(
            vec![ResourceTag::Product],
            async move {
                match mode {
                    FormMode::Create => {
                        api.create_product(&token, &validated.create_payload()).await
                    }
                    FormMode::Edit { id } => {
                        api.update_product(&token, &id, &validated.update_payload())
                            .await
                    }
                }
            },
            move |result: Result<Product, ApiError>| {
                vm.submitting.set(false);
                match result {
                    Ok(product) => {
                        log::info!("✅ Product saved: {}", product.id);
                        vm.state.navigate(Route::Products);
                    }
                    Err(error) => {
                        log::error!("❌ Save failed: {}", error);
                        *vm.submit_error.borrow_mut() = Some(error.message().to_string());
                        vm.emit();
                    }
                }
            },
        );
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    fn load_categories(&self) {
        let token = match self.state.session.token() {
            Some(token) => token,
            None => return,
        };

        let api = self.api_client.clone();
        let vm = self.clone();
        let subscription = self.state.queries.subscribe_query(
            QueryKey::bare("getCategories"),
            &[ResourceTag::Category],
            move || {
                let api = api.clone();
                let token = token.clone();
                async move { api.get_categories(&token).await }
            },
            move |query_state| {
                if let Some(categories) = query_state.decode::<Vec<Category>>() {
                    *vm.categories.borrow_mut() = categories;
                }
                vm.loading_categories.set(query_state.is_loading);
                *vm.categories_error.borrow_mut() = query_state.error;
                vm.emit();
            },
        );
        *self.categories_subscription.borrow_mut() = Some(subscription);
    }

    fn emit(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_values() -> FormValues {
        FormValues {
            name: "  Wooden Chair  ".to_string(),
            description: "A sturdy wooden chair".to_string(),
            price: "49.99".to_string(),
            category_id: "cat1".to_string(),
            images: vec!["https://example.com/chair.jpg".to_string()],
        }
    }

    #[test]
    fn valid_form_produces_trimmed_payload() {
        let validated = validate(&valid_values()).expect("valid form");
        assert_eq!(validated.name, "Wooden Chair");
        assert_eq!(validated.price, 49.99);

        let payload = validated.create_payload();
        assert_eq!(payload.name, "Wooden Chair");
        assert_eq!(payload.category_id, "cat1");
    }

    #[test]
    fn short_name_and_description_are_rejected() {
        assert_eq!(
            validate_name(" a "),
            Some("Name must be at least 2 characters".to_string())
        );
        assert_eq!(validate_name("ab"), None);
        assert_eq!(
            validate_description("tiny"),
            Some("Description must be at least 5 characters".to_string())
        );
        assert_eq!(validate_description("valid description"), None);
    }

    #[test]
    fn price_must_be_a_positive_number() {
        assert_eq!(
            validate_price("abc"),
            Some("Price must be a number".to_string())
        );
        assert_eq!(
            validate_price(""),
            Some("Price must be a number".to_string())
        );
        assert_eq!(
            validate_price("NaN"),
            Some("Price must be a number".to_string())
        );
        assert_eq!(
            validate_price("0"),
            Some("Price must be greater than 0".to_string())
        );
        assert_eq!(
            validate_price("-5"),
            Some("Price must be greater than 0".to_string())
        );
        assert_eq!(validate_price("12.50"), None);
    }

    #[test]
    fn image_entries_must_be_non_blank_valid_urls() {
        assert_eq!(
            validate_images(&[]),
            Some("At least one image URL is required".to_string())
        );
        assert_eq!(
            validate_images(&["".to_string()]),
            Some("Image URL cannot be empty".to_string())
        );
        assert_eq!(
            validate_images(&["not a url".to_string()]),
            Some("Enter a valid URL".to_string())
        );
        assert_eq!(
            validate_images(&["https://example.com/a.jpg".to_string()]),
            None
        );
    }

    #[test]
    fn invalid_form_reports_every_field() {
        let values = FormValues {
            name: "x".to_string(),
            description: "y".to_string(),
            price: "free".to_string(),
            category_id: String::new(),
            images: vec![String::new()],
        };
        let errors = validate(&values).expect_err("invalid form");
        assert!(errors.name.is_some());
        assert!(errors.description.is_some());
        assert_eq!(errors.price, Some("Price must be a number".to_string()));
        assert_eq!(errors.category, Some("Category is required".to_string()));
        assert_eq!(
            errors.images,
            Some("Image URL cannot be empty".to_string())
        );
    }

    #[test]
    fn error_revalidates_on_change_until_it_clears() {
        let vm = ProductFormViewModel::new(
            AppState::new(),
            FormMode::Create,
            FormValues::empty(),
        );

        vm.blur_name();
        assert!(vm.errors().name.is_some());

        // Still too short: the error sticks while typing
        vm.set_name("a".to_string());
        assert!(vm.errors().name.is_some());

        vm.set_name("ab".to_string());
        assert!(vm.errors().name.is_none());
    }

    #[test]
    fn pristine_fields_do_not_validate_on_change() {
        let vm = ProductFormViewModel::new(
            AppState::new(),
            FormMode::Create,
            FormValues::empty(),
        );

        vm.set_name("a".to_string());
        assert!(vm.errors().name.is_none());
    }

    #[test]
    fn the_last_image_row_cannot_be_removed() {
        let vm = ProductFormViewModel::new(
            AppState::new(),
            FormMode::Create,
            FormValues::empty(),
        );

        vm.remove_image(0);
        assert_eq!(vm.values().images.len(), 1);

        vm.add_image();
        assert_eq!(vm.values().images.len(), 2);
        vm.remove_image(1);
        assert_eq!(vm.values().images.len(), 1);
    }

    #[test]
    fn edit_values_come_from_the_product() {
        let json = serde_json::json!({
            "id": "p1",
            "slug": "wooden-chair",
            "name": "Chair",
            "description": "Wooden chair",
            "price": 49.99,
            "images": [],
            "category": {
                "id": "cat1",
                "name": "Furniture",
                "description": null,
                "image": "https://x/cat.jpg",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-02T00:00:00.000Z"
            },
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        });
        let product: Product = serde_json::from_value(json).expect("product json");
        let values = FormValues::from_product(&product);
        assert_eq!(values.price, "49.99");
        assert_eq!(values.category_id, "cat1");
        // An empty image list still renders one editable row
        assert_eq!(values.images, vec![String::new()]);
    }
}
