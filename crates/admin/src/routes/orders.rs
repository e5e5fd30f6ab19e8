//! Order resource: paginated list and detail view.
//!
//! Orders are read-only here: each row carries the line snapshot taken at
//! checkout, so there is nothing to recompute or edit.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use dimakatso_core::format_zar;
use dimakatso_supabase::types::OrderRow;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Rows per list page.
const PER_PAGE: u64 = 25;

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<u64>,
}

/// One row of the order table.
pub struct OrderRowView {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub destination: String,
    pub total: String,
    pub status: String,
    pub items: String,
    pub placed_at: String,
}

impl From<&OrderRow> for OrderRowView {
    fn from(order: &OrderRow) -> Self {
        let destination = [
            order.city.clone().unwrap_or_default(),
            order.state.clone().unwrap_or_default(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        Self {
            id: order.id.to_string(),
            customer_name: order.customer_name.clone().unwrap_or_default(),
            email: order.email.clone().unwrap_or_default(),
            destination,
            total: format_zar(order.total.unwrap_or_default()),
            status: order.status.clone().unwrap_or_default(),
            items: order.items_summary(),
            placed_at: order
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// One snapshotted line on the detail page.
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrderIndexTemplate {
    pub orders: Vec<OrderRowView>,
    pub page: u64,
    pub total: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: u64,
    pub next_page: u64,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderRowView,
    pub address: String,
    pub postal_code: String,
    pub lines: Vec<OrderLineView>,
    pub subtotal: String,
    pub shipping: String,
}

/// Display the paginated order list, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);

    let (rows, total): (Vec<OrderRow>, u64) = state
        .data()
        .from("orders")
        .order_desc("created_at")
        .page((page - 1) * PER_PAGE, PER_PAGE)
        .fetch_with_count()
        .await?;

    Ok(OrderIndexTemplate {
        orders: rows.iter().map(OrderRowView::from).collect(),
        page,
        total,
        has_prev: page > 1,
        has_next: page * PER_PAGE < total,
        prev_page: page.saturating_sub(1),
        next_page: page + 1,
    })
}

/// Display one order with its line snapshot.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let order: OrderRow = state.data().from("orders").eq("id", id).fetch_one().await?;

    let lines = order
        .items
        .clone()
        .unwrap_or_default()
        .iter()
        .map(|item| OrderLineView {
            name: item.name.clone(),
            quantity: item.quantity,
            price: format_zar(item.price),
            line_total: format_zar(item.price * rust_decimal::Decimal::from(item.quantity)),
        })
        .collect();

    Ok(OrderShowTemplate {
        address: order.address.clone().unwrap_or_default(),
        postal_code: order.zip.clone().unwrap_or_default(),
        subtotal: format_zar(order.subtotal.unwrap_or_default()),
        shipping: format_zar(order.shipping.unwrap_or_default()),
        order: OrderRowView::from(&order),
        lines,
    })
}
