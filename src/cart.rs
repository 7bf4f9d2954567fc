// Cart manager: add/remove against the persisted cart and the sidebar rendering

use crate::dom::HIDDEN;
use crate::format::format_price;
use crate::ids;
use crate::models::{cart_total, CartItem, Offer};
use crate::page::Page;
use chrono::Utc;
use tracing::{debug, info};

// What the sidebar shows for a given cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items_html: String,
    pub total_text: String,
    pub empty: bool,
    pub checkout_enabled: bool,
}

impl CartView {
    pub fn build(cart: &[CartItem]) -> Self {
        if cart.is_empty() {
            return Self {
                items_html: String::new(),
                total_text: format_price(0),
                empty: true,
                checkout_enabled: false,
            };
        }

        Self {
            items_html: cart.iter().map(render_cart_item).collect(),
            total_text: format_price(cart_total(cart)),
            empty: false,
            checkout_enabled: true,
        }
    }
}

pub fn render_cart_item(item: &CartItem) -> String {
    format!(
        r#"<div class="cart-item"><div class="cart-line"><div class="cart-line-body"><strong>{}</strong><div class="small muted">{}</div></div><button class="btn small remove" data-remove="{}">✕</button></div></div>"#,
        item.title,
        format_price(item.price),
        item.cart_id
    )
}

impl Page {
    // Append with a fresh cart id that no other item in the cart carries
    pub fn add_to_cart(&mut self, offer: &Offer) -> CartItem {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let mut cart_id = ids::cart_id(&mut self.rng, now_ms);
        while self.state.cart().iter().any(|item| item.cart_id == cart_id) {
            cart_id = ids::cart_id(&mut self.rng, now_ms);
        }

        let item = CartItem::from_offer(offer, cart_id);
        info!(id = %item.id, cart_id = %item.cart_id, price = item.price, "added to cart");
        self.state.push_cart_item(item.clone());
        self.render_cart_sidebar();
        item
    }

    // Filters the id out and always reports the cancellation, even if nothing matched
    pub fn remove_from_cart(&mut self, cart_id: &str) -> usize {
        let removed = self.state.remove_cart_item(cart_id);
        info!(cart_id, removed, "removed from cart");
        self.render_cart_sidebar();
        self.notifier.error(self.t().booking_canceled);
        removed
    }

    pub fn render_cart_sidebar(&mut self) {
        if !self.document.contains("cartItems") {
            return;
        }

        let view = CartView::build(self.state.cart());
        debug!(items = self.state.cart().len(), total = %view.total_text, "rendering cart");

        if let Some(empty) = self.document.get_mut("cartEmpty") {
            if view.empty {
                empty.remove_class(HIDDEN);
            } else {
                empty.add_class(HIDDEN);
            }
        }
        if let Some(container) = self.document.get_mut("cartItems") {
            container.inner_html = view.items_html;
        }
        if let Some(total) = self.document.get_mut("cartTotal") {
            total.text = view.total_text;
        }
        if let Some(button) = self.document.get_mut("checkoutBtn") {
            button.disabled = !view.checkout_enabled;
        }
    }
}
