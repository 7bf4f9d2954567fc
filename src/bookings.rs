// Bookings page: the stored booking history, in insertion order

use crate::format::{format_date, format_price};
use crate::models::Booking;
use crate::page::{Page, Route};
use tracing::debug;

pub const NO_BOOKINGS: &str = "Nenhuma reserva encontrada.";

pub fn render_booking(booking: &Booking) -> String {
    let items: String = booking
        .items
        .iter()
        .map(|item| format!(r#"<li class="small">✓ {}</li>"#, item.title))
        .collect();

    format!(
        r#"<article class="booking"><div class="booking-head"><h4>Reserva {}</h4><span class="small muted">{}</span></div><p class="small muted">Cliente: {}</p><ul class="booking-items">{}</ul><div class="booking-foot"><strong>{}</strong><span class="badge {}">{}</span></div></article>"#,
        booking.id,
        format_date(&booking.date),
        booking.customer_name(),
        items,
        format_price(booking.total()),
        booking.status,
        booking.status
    )
}

pub fn render_bookings_list(bookings: &[Booking]) -> String {
    if bookings.is_empty() {
        return format!(
            r#"<div class="text-center muted"><p>{}</p><a class="btn primary" href="{}">Buscar viagens</a></div>"#,
            NO_BOOKINGS,
            Route::Home.path()
        );
    }
    bookings.iter().map(render_booking).collect()
}

impl Page {
    pub fn render_bookings(&mut self) {
        let html = render_bookings_list(self.state.bookings());
        debug!(count = self.state.bookings().len(), "rendering bookings");
        if let Some(list) = self.document.get_mut("bookingsList") {
            list.inner_html = html;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::models::{BookingStatus, CartItem, ItemKind};
    use crate::storage::{write_json, KeyValueStore, MemoryStore, STORAGE_BOOKINGS};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use test_case::test_case;

    fn booking(id: &str, customer: Option<&str>) -> Booking {
        let mut details = BTreeMap::new();
        if let Some(name) = customer {
            details.insert("name".to_string(), name.to_string());
        }
        Booking {
            id: id.to_string(),
            items: vec![
                CartItem {
                    id: "FL-ABC123".to_string(),
                    title: "Fortaleza → Recife".to_string(),
                    price: 450,
                    kind: ItemKind::Flight,
                    cart_id: "c1".to_string(),
                },
                CartItem {
                    id: "PKG-DREAM".to_string(),
                    title: "Pacote".to_string(),
                    price: 35000,
                    kind: ItemKind::Package,
                    cart_id: "c2".to_string(),
                },
            ],
            customer: details,
            date: Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap(),
            status: BookingStatus::Confirmed,
        }
    }

    fn bookings_page(store: Arc<dyn KeyValueStore>) -> Page {
        let mut page = Page::load(Route::Bookings, store, StorefrontConfig::default());
        page.init();
        page
    }

    #[test]
    fn test_render_booking() {
        let html = render_booking(&booking("BK-LOYW3V28", Some("Ana Souza")));
        assert!(html.contains("Reserva BK-LOYW3V28"));
        assert!(html.contains("07/03/2026"));
        assert!(html.contains("Cliente: Ana Souza"));
        assert!(html.contains("✓ Fortaleza → Recife"));
        assert!(html.contains("✓ Pacote"));
        assert!(html.contains("R$ 35.450"));
        assert!(html.contains(r#"<span class="badge confirmed">confirmed</span>"#));
    }

    #[test]
    fn test_missing_customer_name() {
        let html = render_booking(&booking("BK-1", None));
        assert!(html.contains("Cliente: <"));
    }

    #[test]
    fn test_bookings_listed_in_order() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        write_json(
            store.as_ref(),
            STORAGE_BOOKINGS,
            &vec![booking("BK-1", Some("Ana")), booking("BK-2", Some("Bia"))],
        )
        .unwrap();

        let page = bookings_page(store);
        let html = &page.document.get("bookingsList").unwrap().inner_html;
        let first = html.find("Reserva BK-1").unwrap();
        let second = html.find("Reserva BK-2").unwrap();
        assert!(first < second);
        assert!(!html.contains(NO_BOOKINGS));
    }

    #[test_case(None; "#1 nothing stored")]
    #[test_case(Some("{not json"); "#2 malformed")]
    #[test_case(Some(r#"{"id":"BK-1"}"#); "#3 wrong shape")]
    #[test_case(Some("null"); "#4 null")]
    fn test_empty_state(raw: Option<&str>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        if let Some(raw) = raw {
            store.set_item(STORAGE_BOOKINGS, raw).unwrap();
        }

        let page = bookings_page(store);
        let html = &page.document.get("bookingsList").unwrap().inner_html;
        assert!(html.contains(NO_BOOKINGS));
        assert!(html.contains(r#"href="index.html""#));
        assert!(html.contains("Buscar viagens"));
    }
}
