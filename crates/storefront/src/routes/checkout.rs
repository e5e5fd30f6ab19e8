//! Checkout route handlers.
//!
//! The checkout view only opens for a signed-in shopper; anonymous
//! attempts are redirected to the login page by the `RequireAuth`
//! extractor. Submission snapshots the cart into an order row on the
//! platform and clears the cart only after the insert succeeds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use dimakatso_core::{Cart, CustomerDetails, OrderDraft, OrderStatus, format_zar, shipping_fee};
use dimakatso_supabase::types::{NewOrderRow, OrderRow};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::cart::{CartView, session_cart, store_cart};
use crate::state::AppState;

/// Checkout form fields.
///
/// The payment-card fields are captured for the form round-trip but never
/// stored, logged, or sent anywhere.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CheckoutForm {
    /// Validate required fields and produce the customer details.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message naming the missing fields.
    pub fn validate(&self) -> Result<CustomerDetails, String> {
        let required: [(&str, &str); 10] = [
            ("Email", &self.email),
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Address", &self.address),
            ("City", &self.city),
            ("Province", &self.province),
            ("Postal code", &self.postal_code),
            ("Card number", &self.card_number),
            ("Expiry", &self.expiry),
            ("CVV", &self.cvv),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| *label)
            .collect();

        if !missing.is_empty() {
            return Err(format!("Please fill in: {}", missing.join(", ")));
        }

        Ok(CustomerDetails {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            province: self.province.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
        })
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub shipping: String,
    pub total: String,
    pub form: CheckoutForm,
    pub error: String,
    pub cart_count: u32,
    pub signed_in: bool,
}

impl CheckoutTemplate {
    fn render_for(cart: &Cart, form: CheckoutForm, error: String) -> Self {
        Self {
            cart_count: cart.item_count(),
            cart: CartView::from(cart),
            shipping: format_zar(shipping_fee()),
            total: format_zar(cart.subtotal() + shipping_fee()),
            form,
            error,
            signed_in: true,
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub order_id: String,
    pub email: String,
    pub total: String,
    pub cart_count: u32,
    pub signed_in: bool,
}

/// Display the checkout form.
///
/// Requires a session; an empty cart bounces back to the cart page.
#[instrument(skip(session, user))]
pub async fn show(RequireAuth(user): RequireAuth, session: Session) -> Response {
    let cart = session_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let form = CheckoutForm {
        email: user.email,
        ..CheckoutForm::default()
    };

    CheckoutTemplate::render_for(&cart, form, String::new()).into_response()
}

/// Place the order.
///
/// On persistence failure the cart and the entered fields are re-rendered
/// unchanged so the shopper can retry; on success the cart is cleared and
/// the confirmation view is shown.
#[instrument(skip(state, session, user, form))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let cart = session_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let customer = match form.validate() {
        Ok(customer) => customer,
        Err(message) => {
            return CheckoutTemplate::render_for(&cart, form, message).into_response();
        }
    };

    let draft = OrderDraft::new(&cart, customer);

    // TODO: integrate a payment processor and derive the status from its
    // capture result; the card fields above are collected but not charged,
    // and every order is currently recorded as paid.
    let row = NewOrderRow::from_draft(Some(user.id.as_uuid()), &draft, OrderStatus::Paid);

    let stored: OrderRow = match state
        .data()
        .insert("orders", &row, Some(&user.access_token))
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Failed to persist order: {e}");
            return CheckoutTemplate::render_for(
                &cart,
                form,
                "Checkout failed. Please try again.".to_string(),
            )
            .into_response();
        }
    };

    // Only now that the order is stored does the cart reset.
    let mut cart = cart;
    cart.clear();
    if let Err(e) = store_cart(&session, &cart).await {
        tracing::error!("Failed to clear cart after checkout: {e}");
    }

    tracing::info!(order_id = %stored.id, total = %draft.total, "Order placed");

    CheckoutCompleteTemplate {
        order_id: stored.id.to_string(),
        email: draft.customer.email.clone(),
        total: format_zar(draft.total),
        cart_count: 0,
        signed_in: true,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            email: "thandi@example.com".to_string(),
            first_name: "Thandi".to_string(),
            last_name: "Mokoena".to_string(),
            address: "12 Protea Road".to_string(),
            city: "Johannesburg".to_string(),
            province: "Gauteng".to_string(),
            postal_code: "2196".to_string(),
            card_number: "4111 1111 1111 1111".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_filled_form() {
        let customer = filled_form().validate().expect("form is complete");
        assert_eq!(customer.email, "thandi@example.com");
        assert_eq!(customer.province, "Gauteng");
    }

    #[test]
    fn test_validate_names_missing_fields() {
        let mut form = filled_form();
        form.city = String::new();
        form.cvv = "  ".to_string();

        let message = form.validate().expect_err("missing fields");
        assert!(message.contains("City"));
        assert!(message.contains("CVV"));
        assert!(!message.contains("Email"));
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let mut form = filled_form();
        form.first_name = "  Thandi  ".to_string();
        let customer = form.validate().expect("form is complete");
        assert_eq!(customer.first_name, "Thandi");
    }

    #[test]
    fn test_card_fields_never_reach_customer_details() {
        let customer = filled_form().validate().expect("form is complete");
        let json = serde_json::to_string(&customer).expect("serialize");
        assert!(!json.contains("4111"));
        assert!(!json.contains("123"));
    }
}
