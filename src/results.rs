// Results generator: mock inventory synthesized from the last search

use crate::format::{format_price, pax_label};
use crate::i18n::Translations;
use crate::ids;
use crate::models::{CartItem, ItemKind, Offer, SearchKind, SearchQuery};
use crate::page::Page;
use rand::Rng;
use tracing::{debug, warn};

pub const FLIGHT_COUNT: usize = 8;
pub const HOTEL_COUNT: usize = 6;
pub const CARRIERS: [&str; 1] = ["OlympusAero"];

pub const DEFAULT_ORIGIN: &str = "Fortaleza";
pub const DEFAULT_DESTINATION: &str = "Rio de Janeiro";

pub fn dream_package() -> Offer {
    Offer::new(
        "PKG-DREAM",
        "Viagem dos Sonhos — Pacote Completo",
        35000,
        ItemKind::Package,
    )
}

pub fn generate_results<R: Rng + ?Sized>(query: &SearchQuery, rng: &mut R) -> Vec<Offer> {
    generate_results_for(query.kind(), query, rng)
}

fn generate_results_for<R: Rng + ?Sized>(
    kind: SearchKind,
    query: &SearchQuery,
    rng: &mut R,
) -> Vec<Offer> {
    match kind {
        SearchKind::Flight => generate_flights(query, rng),
        SearchKind::Hotel => generate_hotels(rng),
        SearchKind::Package => vec![dream_package()],
    }
}

// Cheapest first
fn generate_flights<R: Rng + ?Sized>(query: &SearchQuery, rng: &mut R) -> Vec<Offer> {
    let origin = non_empty_or(&query.origin, DEFAULT_ORIGIN);
    let destination = non_empty_or(&query.destination, DEFAULT_DESTINATION);
    let depart = non_empty_or(&query.date_from, "---");

    let mut flights: Vec<Offer> = (0..FLIGHT_COUNT)
        .map(|i| {
            let price = (200.0 + rng.gen::<f64>() * 1500.0).round() as u64;
            let duration = format!("{}h {}m", rng.gen_range(3..15), rng.gen_range(0..60));
            Offer {
                airline: Some(CARRIERS[i % CARRIERS.len()].to_string()),
                depart: Some(depart.to_string()),
                duration: Some(duration),
                ..Offer::new(
                    ids::product_id(&mut *rng, "FL", 6),
                    format!("{} → {}", origin, destination),
                    price,
                    ItemKind::Flight,
                )
            }
        })
        .collect();

    flights.sort_by_key(|flight| flight.price);
    flights
}

fn generate_hotels<R: Rng + ?Sized>(rng: &mut R) -> Vec<Offer> {
    (0..HOTEL_COUNT)
        .map(|i| {
            Offer::new(
                format!("HT-{}", i),
                format!("Palácio Tangará {}", i + 1),
                rng.gen_range(1000..7000),
                ItemKind::Hotel,
            )
        })
        .collect()
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

// "Fortaleza → Recife • 2026-11-01 • 2 pessoas", only when both endpoints are known
pub fn search_summary(query: &SearchQuery) -> Option<String> {
    if query.origin.is_empty() || query.destination.is_empty() {
        return None;
    }
    Some(format!(
        "{} → {} • {} • {} {}",
        query.origin,
        query.destination,
        query.date_from,
        query.pax,
        pax_label(query.pax)
    ))
}

pub fn render_result_card(offer: &Offer, t: &Translations) -> String {
    let details = match (&offer.airline, &offer.duration) {
        (Some(airline), Some(duration)) => {
            format!(r#"<p class="small muted">{} • {}</p>"#, airline, duration)
        }
        _ => String::new(),
    };
    format!(
        r#"<article class="result-card"><h4>{}</h4>{}<div class="price">{}</div><button class="btn primary small" data-add="{}">{}</button></article>"#,
        offer.title,
        details,
        format_price(offer.price),
        offer.id,
        t.book_now
    )
}

pub fn render_results_list(results: &[Offer], t: &Translations) -> String {
    if results.is_empty() {
        return format!(r#"<div class="text-center muted">{}</div>"#, t.no_results);
    }
    results.iter().map(|offer| render_result_card(offer, t)).collect()
}

impl Page {
    pub fn render_results(&mut self) {
        if !self.document.contains("resultsList") {
            return;
        }

        let query = self.state.last_search().clone();
        if let Some(summary) = search_summary(&query) {
            if let Some(el) = self.document.get_mut("searchSummary") {
                el.text = summary;
            }
        }

        let kind = query.kind();
        self.results = generate_results_for(kind, &query, &mut self.rng);
        debug!(count = self.results.len(), ?kind, "generated results");

        let html = render_results_list(&self.results, self.t());
        if let Some(list) = self.document.get_mut("resultsList") {
            list.inner_html = html;
        }
    }

    pub fn results(&self) -> &[Offer] {
        &self.results
    }

    // The "book now" action on a result card
    pub fn add_result_to_cart(&mut self, id: &str) -> Option<CartItem> {
        let Some(offer) = self.results.iter().find(|offer| offer.id == id).cloned() else {
            warn!(id, "no rendered result with this id");
            return None;
        };
        let item = self.add_to_cart(&offer);
        self.notifier
            .success(format!("\"{}\" {}", offer.title, self.t().added));
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::i18n::Language;
    use crate::page::Route;
    use crate::storage::{write_json, KeyValueStore, MemoryStore, STORAGE_LASTSEARCH};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn query(search_type: Option<&str>) -> SearchQuery {
        SearchQuery {
            search_type: search_type.map(str::to_string),
            origin: "Fortaleza".to_string(),
            destination: "Recife".to_string(),
            date_from: "2026-11-01".to_string(),
            pax: 2,
            ..SearchQuery::default()
        }
    }

    #[test]
    fn test_flights_sorted_by_price() {
        let mut rng = StdRng::seed_from_u64(3);
        let flights = generate_results(&query(Some("flight")), &mut rng);

        assert_eq!(flights.len(), FLIGHT_COUNT);
        assert!(flights.windows(2).all(|w| w[0].price <= w[1].price));
        for flight in &flights {
            assert!((200..=1700).contains(&flight.price));
            assert_eq!(flight.title, "Fortaleza → Recife");
            assert_eq!(flight.airline.as_deref(), Some("OlympusAero"));
            assert_eq!(flight.depart.as_deref(), Some("2026-11-01"));
            assert!(flight.id.starts_with("FL-"));
        }
    }

    #[test]
    fn test_flight_defaults_without_endpoints() {
        let mut rng = StdRng::seed_from_u64(3);
        let flights = generate_results(&SearchQuery::default(), &mut rng);
        assert_eq!(flights.len(), FLIGHT_COUNT);
        assert_eq!(flights[0].title, "Fortaleza → Rio de Janeiro");
        assert_eq!(flights[0].depart.as_deref(), Some("---"));
    }

    #[test]
    fn test_hotels() {
        let mut rng = StdRng::seed_from_u64(5);
        let hotels = generate_results(&query(Some("hotel")), &mut rng);

        assert_eq!(hotels.len(), HOTEL_COUNT);
        assert_eq!(hotels[0].id, "HT-0");
        assert_eq!(hotels[5].title, "Palácio Tangará 6");
        assert!(hotels.iter().all(|h| (1000..7000).contains(&h.price)));
    }

    #[test]
    fn test_package() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(generate_results(&query(Some("package")), &mut rng), vec![dream_package()]);
    }

    #[test]
    fn test_unknown_type_is_treated_as_flight() {
        let mut rng = StdRng::seed_from_u64(5);
        let results = generate_results(&query(Some("cruise")), &mut rng);
        assert_eq!(results.len(), FLIGHT_COUNT);
        assert!(results.iter().all(|r| r.kind == ItemKind::Flight));
    }

    #[test]
    fn test_unknown_type_warns_once_per_render() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        write_json(store.as_ref(), STORAGE_LASTSEARCH, &query(Some("cruise"))).unwrap();
        let mut page =
            Page::load(Route::Results, Arc::clone(&store), StorefrontConfig::default()).with_seed(1);

        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || page.render_results());

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(page.results().len(), FLIGHT_COUNT);
    }

    #[test]
    fn test_summary_plural() {
        assert_eq!(
            search_summary(&query(None)).as_deref(),
            Some("Fortaleza → Recife • 2026-11-01 • 2 pessoas")
        );
        let single = SearchQuery { pax: 1, ..query(None) };
        assert!(search_summary(&single).unwrap().ends_with("1 pessoa"));
        assert!(search_summary(&SearchQuery::default()).is_none());
    }

    #[test]
    fn test_empty_list_message() {
        let html = render_results_list(&[], Language::En.translations());
        assert_eq!(html, r#"<div class="text-center muted">No results found</div>"#);
    }

    #[test]
    fn test_results_page_renders_and_adds_to_cart() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        write_json(store.as_ref(), STORAGE_LASTSEARCH, &query(Some("hotel"))).unwrap();

        let mut page =
            Page::load(Route::Results, Arc::clone(&store), StorefrontConfig::default()).with_seed(8);
        page.init();

        assert_eq!(
            page.document.get("searchSummary").unwrap().text,
            "Fortaleza → Recife • 2026-11-01 • 2 pessoas"
        );
        let html = &page.document.get("resultsList").unwrap().inner_html;
        assert_eq!(html.matches("result-card").count(), HOTEL_COUNT);
        assert!(html.contains(r#"data-add="HT-3""#));

        let item = page.add_result_to_cart("HT-3").unwrap();
        assert_eq!(item.title, "Palácio Tangará 4");
        assert_eq!(page.state.cart().len(), 1);
        assert_eq!(
            page.notifier.last().unwrap().message,
            "\"Palácio Tangará 4\" adicionado ao carrinho"
        );

        assert!(page.add_result_to_cart("HT-99").is_none());
        assert_eq!(page.state.cart().len(), 1);
    }
}
