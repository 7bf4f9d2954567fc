// Page bootstrap and routing.
// Every page is an explicit route with a declared set of elements; a page load hydrates
// state once, builds the route's document and runs the route's initializer.

use crate::config::StorefrontConfig;
use crate::dom::{Document, Element, HIDDEN};
use crate::i18n::{Language, Translations};
use crate::models::Offer;
use crate::notify::Notifier;
use crate::state::AppState;
use crate::storage::KeyValueStore;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub const LOADER: &str = "site-loader";
pub const LOADER_TEXT: &str = "loader-text";
pub const SITE: &str = "site";
pub const LANG_SELECT: &str = "lang-select";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Results,
    Package,
    Checkout,
    Bookings,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Results,
        Route::Package,
        Route::Checkout,
        Route::Bookings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "index.html",
            Route::Results => "results.html",
            Route::Package => "package.html",
            Route::Checkout => "checkout.html",
            Route::Bookings => "bookings.html",
        }
    }

    // Elements the route initializer can't run without
    pub fn required_elements(&self) -> &'static [&'static str] {
        match self {
            Route::Home => &["offersGrid", "searchForm"],
            Route::Results => &["resultsList"],
            Route::Package => &["addPackage"],
            Route::Checkout => &["checkoutForm"],
            Route::Bookings => &["bookingsList"],
        }
    }

    pub fn has_cart_sidebar(&self) -> bool {
        matches!(self, Route::Home | Route::Results | Route::Package)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/') {
            "" | "index.html" | "home" => Ok(Route::Home),
            "results.html" | "results" => Ok(Route::Results),
            "package.html" | "package" => Ok(Route::Package),
            "checkout.html" | "checkout" => Ok(Route::Checkout),
            "bookings.html" | "bookings" => Ok(Route::Bookings),
            other => Err(UnknownRoute(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNavigation {
    pub route: Route,
    pub delay: Duration,
}

#[derive(Debug, Default)]
struct NavigationState {
    location: Option<Route>,
    scheduled: Vec<ScheduledNavigation>,
}

// Full-page navigation requests. Pending timers are never cancelled; leaving the page drops them.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: Arc<Mutex<NavigationState>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&self, route: Route) {
        info!(%route, "navigating");
        self.state.lock().location = Some(route);
    }

    pub fn navigate_after(&self, route: Route, delay: Duration) {
        self.state.lock().scheduled.push(ScheduledNavigation { route, delay });

        match Handle::try_current() {
            Ok(handle) => {
                let navigator = self.clone();
                handle.spawn(async move {
                    sleep(delay).await;
                    navigator.navigate(route);
                });
            }
            Err(_) => {
                warn!(%route, "no timer runtime, navigating immediately");
                self.navigate(route);
            }
        }
    }

    // Where the browser has been sent, if anywhere
    pub fn location(&self) -> Option<Route> {
        self.state.lock().location
    }

    pub fn scheduled(&self) -> Vec<ScheduledNavigation> {
        self.state.lock().scheduled.clone()
    }

    // The route the page is heading to, whether or not its timer has fired yet
    pub fn destination(&self) -> Option<Route> {
        let state = self.state.lock();
        state
            .location
            .or_else(|| state.scheduled.last().map(|s| s.route))
    }
}

pub struct Page {
    pub route: Route,
    pub document: Document,
    pub state: AppState,
    pub notifier: Notifier,
    pub navigator: Navigator,
    pub(crate) config: StorefrontConfig,
    pub(crate) rng: StdRng,
    // Records behind the "book now" buttons currently rendered
    pub(crate) results: Vec<Offer>,
    pub(crate) offers: Vec<Offer>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("route", &self.route)
            .field("state", &self.state)
            .field("navigator", &self.navigator)
            .finish()
    }
}

impl Page {
    // A page load with the route's standard markup
    pub fn load(route: Route, store: Arc<dyn KeyValueStore>, config: StorefrontConfig) -> Self {
        let state = AppState::hydrate(store, config.default_language);
        let document = skeleton(route, state.language());
        Self::with_document(route, document, state, config)
    }

    // A page load over caller-provided markup, which may lack some elements
    pub fn load_with_document(
        route: Route,
        document: Document,
        store: Arc<dyn KeyValueStore>,
        config: StorefrontConfig,
    ) -> Self {
        let state = AppState::hydrate(store, config.default_language);
        Self::with_document(route, document, state, config)
    }

    fn with_document(
        route: Route,
        mut document: Document,
        state: AppState,
        config: StorefrontConfig,
    ) -> Self {
        if let Some(text) = document.get_mut(LOADER_TEXT) {
            text.text = state.language().translations().loading.to_string();
        }

        Self {
            route,
            document,
            state,
            notifier: Notifier::new(config.timings.clone()),
            navigator: Navigator::new(),
            config,
            rng: StdRng::from_entropy(),
            results: Vec::new(),
            offers: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn t(&self) -> &'static Translations {
        self.state.language().translations()
    }

    // The load event: keep the splash up for a moment, reveal the site, run the page
    pub async fn bootstrap(&mut self) {
        sleep(self.config.timings.loader_delay).await;

        if let Some(loader) = self.document.get_mut(LOADER) {
            loader.add_class("fade-out");
        }
        if let Some(site) = self.document.get_mut(SITE) {
            site.remove_class(HIDDEN);
        }
        self.init();

        sleep(self.config.timings.loader_fade).await;
        if let Some(loader) = self.document.get_mut(LOADER) {
            loader.add_class(HIDDEN);
        }
    }

    // Route dispatch, no timers involved
    pub fn init(&mut self) {
        self.init_language();

        let missing: Vec<&str> = self
            .route
            .required_elements()
            .iter()
            .copied()
            .filter(|id| !self.document.contains(id))
            .collect();

        if !missing.is_empty() {
            warn!(route = %self.route, ?missing, "page is missing elements, skipping initializer");
        } else {
            debug!(route = %self.route, "running page initializer");
            match self.route {
                Route::Home => {
                    self.render_offers();
                    self.init_search_form();
                }
                Route::Results => self.render_results(),
                Route::Package => {}
                Route::Checkout => {
                    self.init_checkout();
                }
                Route::Bookings => self.render_bookings(),
            }
        }

        if self.route.has_cart_sidebar() {
            self.render_cart_sidebar();
        }
    }

    pub fn init_language(&mut self) {
        let code = self.state.language().code();
        for (_, select) in self.document.with_class_mut(LANG_SELECT) {
            select.value = code.to_string();
        }
        self.document.lang = code.to_string();
    }

    // Language switch from the selector; unknown codes fall back to the default language
    pub fn set_language(&mut self, code: &str) -> Language {
        let language = Language::resolve(Some(code), self.config.default_language);
        self.state.set_language(language);
        self.document.lang = language.code().to_string();

        let t = language.translations();
        for (_, el) in self.document.iter_mut() {
            if let Some(text) = el.i18n_key.as_deref().and_then(|key| t.get(key)) {
                el.text = text.to_string();
            }
        }
        for id in ["origin", "destination"] {
            if let Some(placeholder) = self
                .document
                .get_mut(id)
                .and_then(|select| select.options.first_mut())
            {
                *placeholder = t.search_placeholder.to_string();
            }
        }
        if let Some(text) = self.document.get_mut(LOADER_TEXT) {
            text.text = t.loading.to_string();
        }
        for (_, select) in self.document.with_class_mut(LANG_SELECT) {
            select.value = language.code().to_string();
        }

        info!(%language, "language changed");
        self.notifier.success(format!(
            "Idioma alterado para {}",
            language.code().to_uppercase()
        ));
        language
    }
}

pub const ORIGINS: [&str; 6] = [
    "Fortaleza",
    "Rio de Janeiro",
    "São Paulo",
    "Salvador",
    "Recife",
    "Belo Horizonte",
];

// Standard markup for each route
pub fn skeleton(route: Route, language: Language) -> Document {
    let t = language.translations();
    let mut doc = Document::new(language.code());

    doc.insert(LOADER, Element::new("div"))
        .insert(LOADER_TEXT, Element::new("div").with_class("loader-text").with_text(t.loading))
        .insert(SITE, Element::new("div").with_class(HIDDEN))
        .insert(
            "langSelect",
            Element::select(&["pt", "en", "es"]).with_class(LANG_SELECT),
        )
        .insert("contactBtn", Element::new("a"));

    match route {
        Route::Home => {
            let mut places = vec![t.search_placeholder];
            places.extend(ORIGINS);

            doc.insert("offersGrid", Element::new("div"))
                .insert(
                    "searchForm",
                    Element::new("form").with_children(&[
                        "searchType",
                        "origin",
                        "destination",
                        "dateFrom",
                        "dateTo",
                        "pax",
                        "searchSubmit",
                    ]),
                )
                .insert(
                    "searchType",
                    Element::select(&["flight", "hotel", "package"]).with_value("flight"),
                )
                .insert("origin", Element::select(&places))
                .insert("destination", Element::select(&places))
                .insert("dateFrom", Element::input("dateFrom", "date", false))
                .insert("dateTo", Element::input("dateTo", "date", false))
                .insert("pax", Element::input("pax", "number", false).with_value("1"))
                .insert(
                    "searchSubmit",
                    Element::new("button")
                        .with_class("btn")
                        .with_class("primary")
                        .with_i18n("searchFlights")
                        .with_text(t.search_flights),
                );
        }
        Route::Results => {
            doc.insert("searchSummary", Element::new("p"))
                .insert("resultsList", Element::new("div"));
        }
        Route::Package => {
            doc.insert(
                "addPackage",
                Element::new("button").with_i18n("bookNow").with_text(t.book_now),
            );
        }
        Route::Checkout => {
            doc.insert(
                "checkoutForm",
                Element::new("form").with_children(&["name", "email", "phone"]),
            )
            .insert("name", Element::input("name", "text", true))
            .insert("email", Element::input("email", "email", true))
            .insert("phone", Element::input("phone", "tel", true))
            .insert("checkoutSummary", Element::new("div"));
        }
        Route::Bookings => {
            doc.insert("bookingsList", Element::new("div"));
        }
    }

    if route.has_cart_sidebar() {
        doc.insert("cartItems", Element::new("div"))
            .insert("cartTotal", Element::new("strong").with_text("R$ 0"))
            .insert(
                "cartEmpty",
                Element::new("div").with_i18n("cartEmpty").with_text(t.cart_empty),
            )
            .insert("checkoutBtn", Element::new("button"));
    }

    doc
}
