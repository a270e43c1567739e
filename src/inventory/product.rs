//! Product and category records as the backend sends and accepts them

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::api::ApiRequest;

/// Product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub name: String,
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend id (absent until the product has been created)
    #[serde(
        default,
        deserialize_with = "optional_id_from_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(default)]
    pub cost_price: f64,

    #[serde(default)]
    pub selling_price: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub number_available: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Product {
    /// A product with just a name and default numbers
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            image_url: None,
            description: String::new(),
            category_id: None,
            cost_price: 0.0,
            selling_price: 0.0,
            tags: Vec::new(),
            number_available: 0,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Payload for creating a product
///
/// Optional numbers are sent as `null` when the user left them empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub cost_price: Option<u64>,
    pub selling_price: Option<u64>,
    pub number_available: Option<u64>,
    pub category_id: Option<String>,
}

impl NewProduct {
    /// `POST /products`; the response carries the new product's id
    pub fn create_request(&self) -> serde_json::Result<ApiRequest> {
        ApiRequest::post("products").json(self)
    }
}

/// Last step of a create: point the product at its uploaded picture
pub fn image_patch_request(product_id: &str, image_url: &str) -> serde_json::Result<ApiRequest> {
    ApiRequest::patch(&format!("products/image/{}", product_id))
        .json(&json!({ "imageUrl": image_url }))
}

/// Ids arrive as strings from some endpoints and as numbers from others
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

pub(crate) fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_id_from_text_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
