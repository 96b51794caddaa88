// ============================================================================
// API CLIENT - HTTP communication only (stateless)
// ============================================================================
// No business logic here: requests go out, typed models or ApiError come
// back. Caching and invalidation live in the query layer.
// ============================================================================

use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::models::{
    AuthRequest, AuthResponse, Category, CreateProductPayload, DeletedProduct, Product,
    UpdateProductPayload,
};
use crate::services::error::{classify_status, ApiError};

/// Paging and search arguments for the product list. Also doubles as the
/// cache-key argument object, so it must serialize deterministically.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searched_text: Option<String>,
}

impl ProductQueryArgs {
    /// A non-blank search term switches the request to the search endpoint
    pub fn is_search(&self) -> bool {
        self.searched_text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Build the product list URL. Search requests go to `/products/search`;
/// plain listing goes to `/products`. The search term is trimmed before
/// being sent.
fn products_url(base: &str, args: &ProductQueryArgs) -> String {
    let mut params: Vec<String> = Vec::new();
    if let Some(offset) = args.offset {
        params.push(format!("offset={}", offset));
    }
    if let Some(limit) = args.limit {
        params.push(format!("limit={}", limit));
    }
    let path = if args.is_search() {
        if let Some(text) = args.searched_text.as_deref() {
            let encoded: String = url::form_urlencoded::byte_serialize(text.trim().as_bytes()).collect();
            params.push(format!("searchedText={}", encoded));
        }
        "/products/search"
    } else {
        "/products"
    };
    if params.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, params.join("&"))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// API client for the catalog backend
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.api_base_url.clone(),
        }
    }

    /// Exchange an email for a bearer token
    pub async fn post_auth(&self, email: &str) -> Result<AuthResponse, ApiError> {
        let url = format!("{}/auth", self.base_url);
        let request = AuthRequest {
            email: email.to_string(),
        };

        log::info!("🔐 Requesting access token");

        let response = Request::post(&url)
            .json(&request)
            .map_err(|e| ApiError::Network(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            // Every login failure reads as an auth problem to the user
            let err = parse_error(response, "Authentication failed").await;
            return Err(ApiError::Auth(err.message().to_string()));
        }

        let auth = response
            .json::<AuthResponse>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))?;

        log::info!("✅ Access token received");
        Ok(auth)
    }

    /// List or search products, depending on the args
    pub async fn get_products(
        &self,
        token: &str,
        args: &ProductQueryArgs,
    ) -> Result<Vec<Product>, ApiError> {
        let url = products_url(&self.base_url, args);

        log::info!("📦 Fetching products: {}", url);

        let response = Request::get(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(parse_error(response, "Failed to load products").await);
        }

        let products = response
            .json::<Vec<Product>>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))?;

        log::info!("✅ {} products received", products.len());
        Ok(products)
    }

    /// Fetch a single product by its slug
    pub async fn get_product_by_slug(
        &self,
        token: &str,
        slug: &str,
    ) -> Result<Product, ApiError> {
        let url = format!("{}/products/{}", self.base_url, slug);

        let response = Request::get(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(parse_error(response, "Failed to load product").await);
        }

        response
            .json::<Product>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))
    }

    pub async fn create_product(
        &self,
        token: &str,
        payload: &CreateProductPayload,
    ) -> Result<Product, ApiError> {
        let url = format!("{}/products", self.base_url);

        log::info!("📝 Creating product: {}", payload.name);

        let response = Request::post(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .json(payload)
            .map_err(|e| ApiError::Network(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(parse_error(response, "Failed to create product").await);
        }

        let product = response
            .json::<Product>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))?;

        log::info!("✅ Product created: {}", product.id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        token: &str,
        id: &str,
        payload: &UpdateProductPayload,
    ) -> Result<Product, ApiError> {
        let url = format!("{}/products/{}", self.base_url, id);

        log::info!("📝 Updating product: {}", id);

        let response = Request::put(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .json(payload)
            .map_err(|e| ApiError::Network(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(parse_error(response, "Failed to update product").await);
        }

        response
            .json::<Product>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))
    }

    pub async fn delete_product(&self, token: &str, id: &str) -> Result<DeletedProduct, ApiError> {
        let url = format!("{}/products/{}", self.base_url, id);

        log::info!("🗑️ Deleting product: {}", id);

        let response = Request::delete(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(parse_error(response, "Failed to delete product").await);
        }

        response
            .json::<DeletedProduct>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))
    }

    pub async fn get_categories(&self, token: &str) -> Result<Vec<Category>, ApiError> {
        let url = format!("{}/categories", self.base_url);

        let response = Request::get(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(parse_error(response, "Failed to load categories").await);
        }

        let categories = response
            .json::<Vec<Category>>()
            .await
            .map_err(|e| ApiError::Network(format!("Parse error: {}", e)))?;

        log::info!("✅ {} categories received", categories.len());
        Ok(categories)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the server's error message out of a failed response, if any
async fn parse_error(response: Response, fallback: &str) -> ApiError {
    let status = response.status();
    let body_message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    classify_status(status, body_message, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.example.com/api/v1";

    #[test]
    fn plain_listing_without_params() {
        let args = ProductQueryArgs::default();
        assert_eq!(products_url(BASE, &args), format!("{}/products", BASE));
    }

    #[test]
    fn listing_with_offset_and_limit() {
        let args = ProductQueryArgs {
            offset: Some(18),
            limit: Some(9),
            searched_text: None,
        };
        assert_eq!(
            products_url(BASE, &args),
            format!("{}/products?offset=18&limit=9", BASE)
        );
    }

    #[test]
    fn non_blank_search_switches_to_search_endpoint() {
        let args = ProductQueryArgs {
            offset: Some(0),
            limit: Some(9),
            searched_text: Some("chair".to_string()),
        };
        assert_eq!(
            products_url(BASE, &args),
            format!("{}/products/search?offset=0&limit=9&searchedText=chair", BASE)
        );
    }

    #[test]
    fn blank_search_stays_on_plain_listing() {
        let args = ProductQueryArgs {
            offset: Some(0),
            limit: Some(9),
            searched_text: Some("   ".to_string()),
        };
        assert!(!args.is_search());
        assert_eq!(
            products_url(BASE, &args),
            format!("{}/products?offset=0&limit=9", BASE)
        );
    }

    #[test]
    fn search_term_is_trimmed_and_encoded() {
        let args = ProductQueryArgs {
            offset: None,
            limit: None,
            searched_text: Some("  wooden chair  ".to_string()),
        };
        assert_eq!(
            products_url(BASE, &args),
            format!("{}/products/search?searchedText=wooden+chair", BASE)
        );
    }
}
