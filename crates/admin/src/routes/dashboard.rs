//! Back-office dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use dimakatso_core::format_zar;
use dimakatso_supabase::types::OrderRow;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// A recent order for the dashboard table.
pub struct RecentOrderView {
    pub id: String,
    pub customer_name: String,
    pub total: String,
    pub status: String,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub product_count: u64,
    pub order_count: u64,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Number of orders shown in the recent table.
const RECENT_ORDERS: u64 = 5;

/// Display the dashboard: exact counts plus the newest orders.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let (_, product_count) = state
        .data()
        .from("products")
        .page(0, 1)
        .fetch_with_count::<serde_json::Value>()
        .await?;

    let (recent, order_count) = state
        .data()
        .from("orders")
        .order_desc("created_at")
        .page(0, RECENT_ORDERS)
        .fetch_with_count::<OrderRow>()
        .await?;

    let recent_orders = recent
        .into_iter()
        .map(|order| RecentOrderView {
            id: order.id.to_string(),
            customer_name: order.customer_name.clone().unwrap_or_default(),
            total: format_zar(order.total.unwrap_or_default()),
            status: order.status.clone().unwrap_or_default(),
        })
        .collect();

    Ok(DashboardTemplate {
        admin_email: admin.email,
        product_count,
        order_count,
        recent_orders,
    })
}
