// Home page offers grid, the package page action and the contact modal

use crate::dom::Element;
use crate::format::format_price;
use crate::i18n::Translations;
use crate::ids;
use crate::models::{CartItem, ItemKind, Offer};
use crate::page::Page;
use crate::results::dream_package;
use rand::Rng;
use tracing::{debug, warn};

pub const CONTACT_MODAL: &str = "contactModal";

struct Sample {
    title: &'static str,
    price: u64,
    image: &'static str,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        title: "São Paulo - 3 dias",
        price: 1299,
        image: "https://images.unsplash.com/photo-1505761671935-60b3a7427bad?auto=format&fit=crop&w=800&q=80",
    },
    Sample {
        title: "Rio de Janeiro - Fim de semana",
        price: 899,
        image: "https://images.unsplash.com/photo-1501630834273-4b5604d2ee31?auto=format&fit=crop&w=800&q=80",
    },
    Sample {
        title: "Minas Gerais - Roteiro gastronômico",
        price: 1099,
        image: "https://images.unsplash.com/photo-1526772662000-3f88f10405ff?auto=format&fit=crop&w=800&q=80",
    },
    Sample {
        title: "ES - Praias",
        price: 799,
        image: "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?auto=format&fit=crop&w=800&q=80",
    },
];

// Fresh ids on every render, like the grid has always done
pub fn featured_offers<R: Rng + ?Sized>(rng: &mut R) -> Vec<Offer> {
    SAMPLES
        .iter()
        .map(|sample| Offer {
            image: Some(sample.image.to_string()),
            ..Offer::new(
                ids::product_id(&mut *rng, "OF", 4),
                sample.title,
                sample.price,
                ItemKind::Offer,
            )
        })
        .collect()
}

pub fn render_offer_card(offer: &Offer, t: &Translations) -> String {
    format!(
        r#"<article class="card"><img src="{}" alt="{}" loading="lazy"><h3>{}</h3><p class="muted">A partir de <strong>{}</strong></p><div class="card-actions"><button class="btn outline small" data-buy="{}">{}</button></div></article>"#,
        offer.image.as_deref().unwrap_or_default(),
        offer.title,
        offer.title,
        format_price(offer.price),
        offer.id,
        t.book_now
    )
}

pub fn render_contact_modal() -> String {
    concat!(
        r#"<div class="modal"><div class="modal-body">"#,
        r#"<h3>Entre em Contato</h3>"#,
        r#"<p class="muted">Nossa equipe está pronta para ajudar você a planejar a viagem dos seus sonhos!</p>"#,
        r#"<div class="contact-list">"#,
        r#"<div><strong>📞 Telefone</strong><p class="muted">(11) 9999-9999</p></div>"#,
        r#"<div><strong>✉️ Email</strong><p class="muted">contato@olimpusair.com.br</p></div>"#,
        r#"<div><strong>📍 Endereço</strong><p class="muted">Av. Paulista, 1000 - São Paulo, SP</p></div>"#,
        r#"</div><button class="btn primary" data-close="modal">Fechar</button></div></div>"#,
    )
    .to_string()
}

impl Page {
    pub fn render_offers(&mut self) {
        if !self.document.contains("offersGrid") {
            return;
        }
        self.offers = featured_offers(&mut self.rng);
        let t = self.t();
        let html: String = self.offers.iter().map(|offer| render_offer_card(offer, t)).collect();
        if let Some(grid) = self.document.get_mut("offersGrid") {
            grid.inner_html = html;
        }
        debug!(count = self.offers.len(), "rendered offers");
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    // The "book now" action on an offer card
    pub fn book_offer(&mut self, id: &str) -> Option<CartItem> {
        let Some(offer) = self.offers.iter().find(|offer| offer.id == id).cloned() else {
            warn!(id, "no rendered offer with this id");
            return None;
        };
        let item = self.add_to_cart(&offer);
        self.notifier
            .success(format!("\"{}\" {}", offer.title, self.t().added));
        Some(item)
    }

    pub fn add_package_to_cart(&mut self) -> CartItem {
        let package = dream_package();
        let item = self.add_to_cart(&package);
        self.notifier
            .success(format!("\"{}\" {}", package.title, self.t().added));
        item
    }

    pub fn show_contact_modal(&mut self) {
        let mut modal = Element::new("div").with_class("modal");
        modal.inner_html = render_contact_modal();
        self.document.insert(CONTACT_MODAL, modal);
    }

    // Close button or a click on the backdrop
    pub fn close_contact_modal(&mut self) -> bool {
        self.document.remove(CONTACT_MODAL).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::page::Route;
    use crate::storage::{KeyValueStore, MemoryStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn page(route: Route) -> Page {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut page = Page::load(route, store, StorefrontConfig::default()).with_seed(21);
        page.init();
        page
    }

    #[test]
    fn test_featured_offers() {
        let mut rng = StdRng::seed_from_u64(4);
        let offers = featured_offers(&mut rng);
        assert_eq!(offers.len(), 4);
        assert_eq!(offers[0].title, "São Paulo - 3 dias");
        assert_eq!(offers[0].price, 1299);
        assert!(offers.iter().all(|o| o.id.starts_with("OF-") && o.id.len() == 7));
        assert!(offers.iter().all(|o| o.kind == ItemKind::Offer));
    }

    #[test]
    fn test_home_renders_grid_and_books_offer() {
        let mut page = page(Route::Home);
        let grid = page.document.get("offersGrid").unwrap().inner_html.clone();
        assert_eq!(grid.matches(r#"class="card""#).count(), 4);
        assert!(grid.contains("A partir de <strong>R$ 1.299</strong>"));

        let id = page.offers()[1].id.clone();
        let item = page.book_offer(&id).unwrap();
        assert_eq!(item.title, "Rio de Janeiro - Fim de semana");
        assert_eq!(page.document.get("cartTotal").unwrap().text, "R$ 899");
        assert_eq!(
            page.notifier.last().unwrap().message,
            "\"Rio de Janeiro - Fim de semana\" adicionado ao carrinho"
        );
    }

    #[test]
    fn test_package_page_adds_dream_package() {
        let mut page = page(Route::Package);
        let item = page.add_package_to_cart();
        assert_eq!(item.id, "PKG-DREAM");
        assert_eq!(item.price, 35000);
        assert_eq!(page.document.get("cartTotal").unwrap().text, "R$ 35.000");
    }

    #[test]
    fn test_contact_modal_open_close() {
        let mut page = page(Route::Bookings);
        page.show_contact_modal();
        assert!(page
            .document
            .get(CONTACT_MODAL)
            .unwrap()
            .inner_html
            .contains("contato@olimpusair.com.br"));

        assert!(page.close_contact_modal());
        assert!(!page.close_contact_modal());
    }
}
