//! Product resource: paginated list, create, edit, delete.
//!
//! Create and edit accept multipart forms so an image can ride along; the
//! file goes to object storage under a generated key and only the public
//! URL is stored on the row.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use dimakatso_core::format_zar;
use dimakatso_supabase::types::{ProductPatch, ProductRow};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::{AppState, PRODUCT_IMAGE_BUCKET};

/// Rows per list page.
const PER_PAGE: u64 = 20;

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Case-insensitive name filter.
    pub q: Option<String>,
}

/// One row of the product table.
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub is_special: bool,
    pub is_active: bool,
    pub image_url: String,
}

impl From<&ProductRow> for ProductRowView {
    fn from(row: &ProductRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            category: row.category.clone().unwrap_or_else(|| "General".to_string()),
            price: format_zar(row.price.unwrap_or_default()),
            is_special: row.is_special.unwrap_or(false),
            is_active: row.is_active.unwrap_or(true),
            image_url: row.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub products: Vec<ProductRowView>,
    pub q: String,
    pub page: u64,
    pub total: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: u64,
    pub next_page: u64,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    /// Empty for the create form, the row id for edits.
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    /// One benefit per line.
    pub benefits: String,
    pub is_special: bool,
    pub is_active: bool,
    pub image_url: String,
    /// Inline error message, empty when none.
    pub error: String,
}

impl ProductFormTemplate {
    fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            benefits: String::new(),
            is_special: false,
            is_active: true,
            image_url: String::new(),
            error: String::new(),
        }
    }

    fn from_row(row: &ProductRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            description: row.description.clone().unwrap_or_default(),
            price: row.price.unwrap_or_default().to_string(),
            category: row.category.clone().unwrap_or_default(),
            benefits: row.benefits.clone().unwrap_or_default().join("\n"),
            is_special: row.is_special.unwrap_or(false),
            is_active: row.is_active.unwrap_or(true),
            image_url: row.image_url.clone().unwrap_or_default(),
            error: String::new(),
        }
    }

    fn from_submission(id: &str, form: &ProductFormData, error: String) -> Self {
        Self {
            id: id.to_string(),
            name: form.name.clone(),
            description: form.description.clone(),
            price: form.price_raw.clone(),
            category: form.category.clone(),
            benefits: form.benefits_raw.clone(),
            is_special: form.is_special,
            is_active: form.is_active,
            image_url: String::new(),
            error,
        }
    }
}

/// Decoded multipart submission.
#[derive(Default)]
pub struct ProductFormData {
    pub name: String,
    pub description: String,
    pub price_raw: String,
    pub category: String,
    pub benefits_raw: String,
    pub is_special: bool,
    pub is_active: bool,
    pub image: Option<UploadedImage>,
}

/// An image file carried by the form.
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ProductFormData {
    /// Read the multipart body into the form struct.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;
                    if !file_name.is_empty() && !bytes.is_empty() {
                        form.image = Some(UploadedImage {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                other => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("invalid field: {e}")))?;
                    match other {
                        "name" => form.name = value,
                        "description" => form.description = value,
                        "price" => form.price_raw = value,
                        "category" => form.category = value,
                        "benefits" => form.benefits_raw = value,
                        // Checkboxes submit only when ticked.
                        "is_special" => form.is_special = true,
                        "is_active" => form.is_active = true,
                        _ => {}
                    }
                }
            }
        }

        Ok(form)
    }

    /// Validate and convert into a row patch (without the image URL).
    fn to_patch(&self) -> std::result::Result<ProductPatch, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required.".to_string());
        }

        let price = Decimal::from_str(self.price_raw.trim())
            .map_err(|_| "Price must be a number.".to_string())?;
        if price < Decimal::ZERO {
            return Err("Price must not be negative.".to_string());
        }

        let benefits: Vec<String> = self
            .benefits_raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(ProductPatch {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            category: self.category.trim().to_string(),
            benefits,
            is_special: self.is_special,
            is_active: self.is_active,
            image_url: None,
        })
    }
}

/// Upload the form's image, returning its public URL.
async fn store_image(state: &AppState, image: &UploadedImage) -> Result<String> {
    let path = format!(
        "products/{}-{}",
        Uuid::new_v4(),
        sanitize_file_name(&image.file_name)
    );

    state
        .storage()
        .upload(
            PRODUCT_IMAGE_BUCKET,
            &path,
            image.bytes.clone(),
            &image.content_type,
        )
        .await?;

    Ok(state.storage().public_url(PRODUCT_IMAGE_BUCKET, &path))
}

/// Lowercase a file name and collapse whitespace to dashes.
fn sanitize_file_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Display the paginated, filterable product list.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let q = query.q.unwrap_or_default();

    let mut builder = state
        .data()
        .from("products")
        .order_desc("created_at")
        .page((page - 1) * PER_PAGE, PER_PAGE);
    if !q.trim().is_empty() {
        builder = builder.ilike("name", q.trim());
    }

    let (rows, total): (Vec<ProductRow>, u64) = builder.fetch_with_count().await?;

    let products = rows.iter().map(ProductRowView::from).collect();

    Ok(ProductIndexTemplate {
        products,
        q,
        page,
        total,
        has_prev: page > 1,
        has_next: page * PER_PAGE < total,
        prev_page: page.saturating_sub(1),
        next_page: page + 1,
    })
}

/// Display the create form.
#[instrument(skip(_admin))]
pub async fn new(RequireAdmin(_admin): RequireAdmin) -> impl IntoResponse {
    ProductFormTemplate::empty()
}

/// Create a product from a multipart submission.
#[instrument(skip(state, _admin, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Response> {
    let form = ProductFormData::from_multipart(multipart).await?;

    let mut patch = match form.to_patch() {
        Ok(patch) => patch,
        Err(message) => {
            return Ok(
                ProductFormTemplate::from_submission("", &form, message).into_response()
            );
        }
    };

    if let Some(image) = &form.image {
        patch.image_url = Some(store_image(&state, image).await?);
    }

    let created: ProductRow = state.data().insert("products", &patch, None).await?;
    tracing::info!(product_id = %created.id, "Product created");

    Ok(Redirect::to("/products").into_response())
}

/// Display the edit form.
#[instrument(skip(state, _admin))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let row: ProductRow = state.data().from("products").eq("id", id).fetch_one().await?;
    Ok(ProductFormTemplate::from_row(&row))
}

/// Update a product from a multipart submission.
///
/// Without a new upload the stored image URL is left untouched.
#[instrument(skip(state, _admin, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response> {
    let form = ProductFormData::from_multipart(multipart).await?;

    let mut patch = match form.to_patch() {
        Ok(patch) => patch,
        Err(message) => {
            return Ok(
                ProductFormTemplate::from_submission(&id.to_string(), &form, message)
                    .into_response(),
            );
        }
    };

    if let Some(image) = &form.image {
        patch.image_url = Some(store_image(&state, image).await?);
    }

    let updated: ProductRow = state.data().update("products", id, &patch, None).await?;
    tracing::info!(product_id = %updated.id, "Product updated");

    Ok(Redirect::to("/products").into_response())
}

/// Delete a product.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.data().delete("products", id, None).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Redirect::to("/products").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Salt Scrub 2.PNG"), "salt-scrub-2.png");
        assert_eq!(sanitize_file_name("plain.jpg"), "plain.jpg");
        assert_eq!(sanitize_file_name("  spaced   out .png"), "spaced-out-.png");
    }

    #[test]
    fn test_to_patch_requires_name_and_numeric_price() {
        let mut form = ProductFormData {
            name: "Lavender Soak".to_string(),
            price_raw: "129.00".to_string(),
            ..ProductFormData::default()
        };
        assert!(form.to_patch().is_ok());

        form.price_raw = "lots".to_string();
        assert_eq!(form.to_patch().unwrap_err(), "Price must be a number.");

        form.price_raw = "-5".to_string();
        assert_eq!(form.to_patch().unwrap_err(), "Price must not be negative.");

        form.name = "  ".to_string();
        form.price_raw = "129.00".to_string();
        assert_eq!(form.to_patch().unwrap_err(), "Name is required.");
    }

    #[test]
    fn test_to_patch_splits_benefit_lines() {
        let form = ProductFormData {
            name: "Lavender Soak".to_string(),
            price_raw: "129.00".to_string(),
            benefits_raw: "Calming\n\n  Eases tension  \n".to_string(),
            ..ProductFormData::default()
        };
        let patch = form.to_patch().expect("valid form");
        assert_eq!(patch.benefits, vec!["Calming", "Eases tension"]);
    }
}
