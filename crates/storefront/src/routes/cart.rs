//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; nothing is persisted to the
//! platform until checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use dimakatso_core::{Cart, CartLine, ProductId, format_zar};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.to_string(),
            name: line.product.name.clone(),
            quantity: line.quantity,
            price: format_zar(line.product.price),
            line_price: format_zar(line.line_total()),
            image_url: line.product.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: format_zar(cart.subtotal()),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, empty when none exists yet.
pub async fn session_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub async fn store_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: Uuid,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: Uuid,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
    pub signed_in: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(session, user))]
pub async fn show(session: Session, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    let cart = session_cart(&session).await;

    CartShowTemplate {
        cart_count: cart.item_count(),
        cart: CartView::from(&cart),
        signed_in: user.is_some(),
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Looks the product up in the catalog so the cart line carries a trusted
/// snapshot (price included) rather than client-supplied fields. Returns
/// an HTMX trigger to update the cart count badge.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product = match state.catalog().get_product(ProductId::new(form.product_id)).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to load product for add-to-cart: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"text-red-500\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let mut cart = session_cart(&session).await;
    cart.add_item(product);
    let count = cart.item_count();

    if let Err(e) = store_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
///
/// A quantity below 1 leaves the line unchanged; removal is its own
/// operation.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = session_cart(&session).await;
    cart.update_quantity(ProductId::new(form.product_id), form.quantity);

    if let Err(e) = store_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = session_cart(&session).await;
    cart.remove_item(ProductId::new(form.product_id));

    if let Err(e) = store_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: session_cart(&session).await.item_count(),
    }
}
