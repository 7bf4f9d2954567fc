// Checkout flow: per-field validation, booking creation and cart clearing

use crate::dom::Element;
use crate::format::format_price;
use crate::i18n::Translations;
use crate::ids;
use crate::models::{cart_total, Booking, BookingStatus, CartItem};
use crate::page::{Page, Route};
use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

pub const FORM_ERRORS_MESSAGE: &str = "Por favor, corrija os erros no formulário";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("field is required")]
    Required,

    #[error("invalid email")]
    InvalidEmail,
}

impl FieldError {
    pub fn message(&self, t: &Translations) -> &'static str {
        match self {
            FieldError::Required => t.required_field,
            FieldError::InvalidEmail => t.invalid_email,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("Missing checkout form")]
    MissingForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEntry {
    Ready,
    // Empty cart: sent back home, form never rendered
    Redirected,
}

// local@domain.tld: no whitespace, exactly one '@', a dot inside the domain with text on both sides
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_field(field: &Element) -> Result<(), FieldError> {
    let value = field.value.trim();
    if field.required && value.is_empty() {
        return Err(FieldError::Required);
    }
    if field.is_email() && !value.is_empty() && !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(())
}

pub fn render_checkout_summary(cart: &[CartItem]) -> String {
    let mut html: String = cart
        .iter()
        .map(|item| {
            format!(
                r#"<div class="cart-item"><div class="cart-line"><div class="cart-line-body"><strong>{}</strong><div class="small muted">{}</div></div></div></div>"#,
                item.title,
                format_price(item.price)
            )
        })
        .collect();
    html.push_str(&format!(
        r#"<div class="cart-total">Total: <strong>{}</strong></div>"#,
        format_price(cart_total(cart))
    ));
    html
}

impl Page {
    pub fn init_checkout(&mut self) -> CheckoutEntry {
        if self.state.cart().is_empty() {
            info!("checkout with an empty cart, redirecting home");
            self.navigator.navigate(Route::Home);
            return CheckoutEntry::Redirected;
        }
        self.render_checkout_summary();
        CheckoutEntry::Ready
    }

    pub fn render_checkout_summary(&mut self) {
        let html = render_checkout_summary(self.state.cart());
        if let Some(container) = self.document.get_mut("checkoutSummary") {
            container.inner_html = html;
        }
    }

    // Blur handler: clears the previous inline error, then sets a new one if the field fails
    pub fn on_field_blur(&mut self, id: &str) -> bool {
        let t = self.t();
        let Some(field) = self.document.get_mut(id) else {
            return true;
        };

        field.field_error = None;
        field.remove_class("invalid");
        match validate_field(field) {
            Ok(()) => true,
            Err(e) => {
                field.field_error = Some(e.message(t).to_string());
                field.add_class("invalid");
                false
            }
        }
    }

    fn form_inputs(&self) -> Vec<String> {
        self.document
            .get("checkoutForm")
            .map(|form| form.children.clone())
            .unwrap_or_default()
    }

    pub fn submit_checkout(&mut self) -> Result<Booking, CheckoutError> {
        if !self.document.contains("checkoutForm") {
            warn!("submit without a checkout form");
            return Err(CheckoutError::MissingForm);
        }
        if self.state.cart().is_empty() {
            self.navigator.navigate(Route::Home);
            return Err(CheckoutError::EmptyCart);
        }

        let inputs = self.form_inputs();
        let required: Vec<String> = inputs
            .iter()
            .filter(|id| self.document.get(id).is_some_and(|el| el.required))
            .cloned()
            .collect();

        // Every required field is checked so all inline errors show at once
        let invalid: Vec<String> = required
            .into_iter()
            .filter(|id| !self.on_field_blur(id))
            .collect();
        if !invalid.is_empty() {
            info!(?invalid, "checkout rejected");
            self.notifier.error(FORM_ERRORS_MESSAGE);
            return Err(CheckoutError::InvalidFields(invalid));
        }

        let customer: BTreeMap<String, String> = inputs
            .iter()
            .filter_map(|id| self.document.get(id))
            .filter_map(|el| el.name.clone().map(|name| (name, el.value.clone())))
            .collect();

        let now = Utc::now();
        let booking = Booking {
            id: ids::booking_id(u64::try_from(now.timestamp_millis()).unwrap_or_default()),
            items: self.state.cart().to_vec(),
            customer,
            date: now,
            status: BookingStatus::Confirmed,
        };

        info!(id = %booking.id, items = booking.items.len(), total = booking.total(), "booking confirmed");
        self.state.append_booking(booking.clone());
        self.state.clear_cart();

        self.notifier.success(self.t().booking_success);
        self.navigator
            .navigate_after(Route::Bookings, self.config.timings.checkout_redirect);

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::models::{ItemKind, Offer};
    use crate::notify::NotificationKind;
    use crate::storage::{
        read_json, KeyValueStore, MemoryStore, STORAGE_BOOKINGS, STORAGE_CART,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use test_case::test_case;
    use tokio::time::sleep;

    fn store_with_cart(titles: &[(&str, u64)]) -> Arc<dyn KeyValueStore> {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut page =
            Page::load(Route::Results, Arc::clone(&store), StorefrontConfig::default()).with_seed(2);
        for (title, price) in titles {
            page.add_to_cart(&Offer::new("FL-1", *title, *price, ItemKind::Flight));
        }
        store
    }

    fn checkout(store: &Arc<dyn KeyValueStore>) -> Page {
        let mut page = Page::load(Route::Checkout, Arc::clone(store), StorefrontConfig::default());
        page.init();
        page
    }

    fn fill(page: &mut Page, name: &str, email: &str, phone: &str) {
        page.document.set_value("name", name);
        page.document.set_value("email", email);
        page.document.set_value("phone", phone);
    }

    #[test_case("ana@example.com", true; "#1 plain")]
    #[test_case("a.b+c@mail.co.uk", true; "#2 subdomains")]
    #[test_case("ana@example", false; "#3 no tld")]
    #[test_case("ana example@x.com", false; "#4 whitespace")]
    #[test_case("@example.com", false; "#5 no local part")]
    #[test_case("ana@@example.com", false; "#6 double at")]
    #[test_case("ana@example.", false; "#7 empty tld")]
    #[test_case("ana@.com", false; "#8 empty domain label")]
    #[test_case("ana@mail.com.", true; "#9 trailing dot after a full label")]
    fn test_is_valid_email(value: &str, expected: bool) {
        assert_eq!(is_valid_email(value), expected);
    }

    #[test]
    fn test_empty_cart_redirects_without_rendering() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut page = Page::load(Route::Checkout, Arc::clone(&store), StorefrontConfig::default());

        assert_eq!(page.init_checkout(), CheckoutEntry::Redirected);
        assert_eq!(page.navigator.location(), Some(Route::Home));
        assert!(page.document.get("checkoutSummary").unwrap().inner_html.is_empty());
    }

    #[test]
    fn test_summary_lists_items_and_total() {
        let store = store_with_cart(&[("X", 100), ("Y", 1250)]);
        let page = checkout(&store);

        let html = &page.document.get("checkoutSummary").unwrap().inner_html;
        assert!(html.contains("<strong>X</strong>"));
        assert!(html.contains("Total: <strong>R$ 1.350</strong>"));
    }

    #[test]
    fn test_blur_sets_and_clears_inline_error() {
        let store = store_with_cart(&[("X", 100)]);
        let mut page = checkout(&store);

        page.document.set_value("email", "nope");
        assert!(!page.on_field_blur("email"));
        assert_eq!(
            page.document.get("email").unwrap().field_error.as_deref(),
            Some("Email inválido")
        );

        page.document.set_value("email", "ana@example.com");
        assert!(page.on_field_blur("email"));
        assert!(page.document.get("email").unwrap().field_error.is_none());
    }

    #[test]
    fn test_empty_name_aborts_submit() {
        let store = store_with_cart(&[("X", 100)]);
        let mut page = checkout(&store);
        fill(&mut page, "   ", "ana@example.com", "85999990000");

        let result = page.submit_checkout();
        assert_eq!(result, Err(CheckoutError::InvalidFields(vec!["name".to_string()])));
        assert_eq!(
            page.document.get("name").unwrap().field_error.as_deref(),
            Some("Este campo é obrigatório")
        );

        let last = page.notifier.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.message, FORM_ERRORS_MESSAGE);

        let bookings: Vec<Booking> = read_json(store.as_ref(), STORAGE_BOOKINGS, Vec::new());
        assert!(bookings.is_empty());
        let cart: Vec<CartItem> = read_json(store.as_ref(), STORAGE_CART, Vec::new());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_all_failing_fields_reported() {
        let store = store_with_cart(&[("X", 100)]);
        let mut page = checkout(&store);
        fill(&mut page, "", "bad", "");

        let Err(CheckoutError::InvalidFields(fields)) = page.submit_checkout() else {
            panic!("expected invalid fields");
        };
        assert_eq!(fields, vec!["name", "email", "phone"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_checkout() {
        let store = store_with_cart(&[("X", 100), ("Y", 50)]);
        let cart_before: Vec<CartItem> = read_json(store.as_ref(), STORAGE_CART, Vec::new());

        let mut page = checkout(&store);
        fill(&mut page, "Ana Souza", "ana@example.com", "85999990000");

        let booking = tokio_test::assert_ok!(page.submit_checkout());
        assert!(booking.id.starts_with("BK-"));
        assert_eq!(booking.items, cart_before);
        assert_eq!(booking.total(), 150);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.customer_name(), "Ana Souza");
        assert_eq!(booking.customer.get("email").map(String::as_str), Some("ana@example.com"));

        let cart: Vec<CartItem> = read_json(store.as_ref(), STORAGE_CART, Vec::new());
        assert!(cart.is_empty());
        let bookings: Vec<Booking> = read_json(store.as_ref(), STORAGE_BOOKINGS, Vec::new());
        assert_eq!(bookings, vec![booking]);

        let last = page.notifier.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.message, "Reserva realizada com sucesso!");

        assert_eq!(page.navigator.location(), None);
        sleep(Duration::from_millis(1501)).await;
        assert_eq!(page.navigator.location(), Some(Route::Bookings));

        // Coming back to checkout now finds an empty cart
        let mut again = Page::load(Route::Checkout, Arc::clone(&store), StorefrontConfig::default());
        assert_eq!(again.init_checkout(), CheckoutEntry::Redirected);
    }

    #[test]
    fn test_second_checkout_appends() {
        let store = store_with_cart(&[("X", 100)]);
        let mut page = checkout(&store);
        fill(&mut page, "Ana", "ana@example.com", "1");
        page.submit_checkout().unwrap();

        let mut results =
            Page::load(Route::Results, Arc::clone(&store), StorefrontConfig::default()).with_seed(9);
        results.add_to_cart(&Offer::new("HT-0", "Palácio Tangará 1", 2000, ItemKind::Hotel));

        let mut page = checkout(&store);
        fill(&mut page, "Bia", "bia@example.com", "2");
        page.submit_checkout().unwrap();

        let bookings: Vec<Booking> = read_json(store.as_ref(), STORAGE_BOOKINGS, Vec::new());
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].customer_name(), "Ana");
        assert_eq!(bookings[1].customer_name(), "Bia");
        assert_eq!(bookings[1].total(), 2000);
    }
}
