//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use dimakatso_core::{Product, ProductId, format_zar};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::cart::session_cart;
use crate::state::AppState;

/// Product detail display data.
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub category: String,
    pub benefits: Vec<String>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_zar(product.price),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            benefits: product.benefits.clone(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub cart_count: u32,
    pub signed_in: bool,
}

/// Display a product detail page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = id
        .parse::<Uuid>()
        .map_err(|_| AppError::BadRequest("invalid product id".to_string()))?;

    let product = state.catalog().get_product(ProductId::new(id)).await?;

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(&product),
        cart_count: session_cart(&session).await.item_count(),
        signed_in: user.is_some(),
    })
}
