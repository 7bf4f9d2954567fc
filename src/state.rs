// Per-page-load state, hydrated once from storage and written through on every change

use crate::i18n::Language;
use crate::models::{cart_total, Booking, CartItem, SearchQuery};
use crate::storage::{
    read_json, read_text, write_json, write_text, KeyValueStore, STORAGE_BOOKINGS,
    STORAGE_CART, STORAGE_LANG, STORAGE_LASTSEARCH,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AppState {
    store: Arc<dyn KeyValueStore>,
    cart: Vec<CartItem>,
    bookings: Vec<Booking>,
    last_search: SearchQuery,
    language: Language,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cart", &self.cart)
            .field("bookings", &self.bookings)
            .field("last_search", &self.last_search)
            .field("language", &self.language)
            .finish()
    }
}

impl AppState {
    pub fn hydrate(store: Arc<dyn KeyValueStore>, default_language: Language) -> Self {
        let cart = read_json(store.as_ref(), STORAGE_CART, Vec::new());
        let bookings = read_json(store.as_ref(), STORAGE_BOOKINGS, Vec::new());
        let last_search = read_json(store.as_ref(), STORAGE_LASTSEARCH, SearchQuery::default());
        let language = Language::resolve(
            read_text(store.as_ref(), STORAGE_LANG).as_deref(),
            default_language,
        );

        debug!(
            cart = cart.len(),
            bookings = bookings.len(),
            %language,
            "hydrated state"
        );

        Self {
            store,
            cart,
            bookings,
            last_search,
            language,
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn cart_total(&self) -> u64 {
        cart_total(&self.cart)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn last_search(&self) -> &SearchQuery {
        &self.last_search
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn push_cart_item(&mut self, item: CartItem) {
        self.cart.push(item);
        self.persist(STORAGE_CART, &self.cart);
    }

    // Returns how many items were removed (0 when the id is unknown)
    pub fn remove_cart_item(&mut self, cart_id: &str) -> usize {
        let before = self.cart.len();
        self.cart.retain(|item| item.cart_id != cart_id);
        self.persist(STORAGE_CART, &self.cart);
        before - self.cart.len()
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist(STORAGE_CART, &self.cart);
    }

    pub fn append_booking(&mut self, booking: Booking) {
        self.bookings.push(booking);
        self.persist(STORAGE_BOOKINGS, &self.bookings);
    }

    pub fn set_last_search(&mut self, query: SearchQuery) {
        self.last_search = query;
        self.persist(STORAGE_LASTSEARCH, &self.last_search);
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Err(e) = write_text(self.store.as_ref(), STORAGE_LANG, language.code()) {
            warn!(error = %e, "failed to persist language");
        }
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = write_json(self.store.as_ref(), key, value) {
            warn!(key, error = %e, "storage write failed, state kept in memory only");
        }
    }
}
