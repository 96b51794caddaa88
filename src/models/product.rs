use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::models::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    /// Stable human-readable identifier, used for detail/edit navigation.
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First non-blank image URL, or the placeholder when there is none.
    pub fn primary_image(&self) -> &str {
        self.images
            .iter()
            .map(|u| u.trim())
            .find(|u| !u.is_empty())
            .unwrap_or(&CONFIG.placeholder_image)
    }

    /// All usable image URLs; never empty (falls back to the placeholder).
    pub fn display_images(&self) -> Vec<&str> {
        let urls: Vec<&str> = self
            .images
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            vec![CONFIG.placeholder_image.as_str()]
        } else {
            urls
        }
    }
}

/// Write shape for POST /products: `categoryId` replaces the nested category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    pub images: Vec<String>,
}

/// Partial write shape for PUT /products/{id}.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletedProduct {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(images: Vec<String>) -> Product {
        let json = serde_json::json!({
            "id": "p1",
            "slug": "wooden-chair",
            "name": "Chair",
            "description": "Wooden chair",
            "price": 49.99,
            "images": images,
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
        serde_json::from_value(json).expect("product json")
    }

    #[test]
    fn deserializes_camel_case_wire_format() {
        let product = sample_product(vec!["https://x/img.jpg".to_string()]);
        assert_eq!(product.slug, "wooden-chair");
        assert_eq!(product.category.id, "cat1");
        assert_eq!(product.category.description, None);
        assert_eq!(product.primary_image(), "https://x/img.jpg");
    }

    #[test]
    fn missing_images_field_defaults_to_empty() {
        let json = serde_json::json!({
            "id": "p1",
            "slug": "wooden-chair",
            "name": "Chair",
            "description": "Wooden chair",
            "price": 49.99,
            "category": {
                "id": "cat1",
                "name": "Furniture",
                "description": "wood things",
                "image": "https://x/cat.jpg",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-02T00:00:00.000Z"
            },
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        });
        let product: Product = serde_json::from_value(json).expect("product json");
        assert!(product.images.is_empty());
        assert_eq!(product.primary_image(), CONFIG.placeholder_image);
    }

    #[test]
    fn blank_image_entries_fall_back_to_placeholder() {
        let product = sample_product(vec!["   ".to_string(), String::new()]);
        assert_eq!(product.primary_image(), CONFIG.placeholder_image);
        assert_eq!(product.display_images(), vec![CONFIG.placeholder_image.as_str()]);
    }

    #[test]
    fn update_payload_skips_unset_fields() {
        let payload = UpdateProductPayload {
            price: Some(12.5),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).expect("payload json");
        assert_eq!(json, serde_json::json!({ "price": 12.5 }));
    }

    #[test]
    fn create_payload_uses_category_id_key() {
        let payload = CreateProductPayload {
            name: "Chair".to_string(),
            description: "Wooden chair".to_string(),
            price: 49.99,
            category_id: "cat1".to_string(),
            images: vec!["https://x/img.jpg".to_string()],
        };
        let json = serde_json::to_value(&payload).expect("payload json");
        assert_eq!(json["categoryId"], "cat1");
        assert!(json.get("category").is_none());
    }
}
