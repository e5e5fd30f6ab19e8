//! Home and about page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use dimakatso_core::{Product, format_zar};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::cart::session_cart;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub category: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_zar(product.price),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Limited-time picks.
    pub specials: Vec<ProductCardView>,
    /// The regular collection.
    pub products: Vec<ProductCardView>,
    /// Whether the catalog failed to load (renders the error banner).
    pub load_error: bool,
    pub cart_count: u32,
    pub signed_in: bool,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub cart_count: u32,
    pub signed_in: bool,
}

/// Display the home page.
///
/// A catalog fetch error empties both the specials and the regular
/// collection - never a partial or stale render - and raises the banner.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    let cart_count = session_cart(&session).await.item_count();

    let (specials, products, load_error) = match state.catalog().load().await {
        Ok(catalog) => (
            catalog.specials.iter().map(ProductCardView::from).collect(),
            catalog.regular.iter().map(ProductCardView::from).collect(),
            false,
        ),
        Err(e) => {
            tracing::error!("Failed to load catalog: {e}");
            (Vec::new(), Vec::new(), true)
        }
    };

    HomeTemplate {
        specials,
        products,
        load_error,
        cart_count,
        signed_in: user.is_some(),
    }
}

/// Display the about page.
#[instrument(skip(session, user))]
pub async fn about(session: Session, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    AboutTemplate {
        cart_count: session_cart(&session).await.item_count(),
        signed_in: user.is_some(),
    }
}
