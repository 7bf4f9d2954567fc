// Command-line driver: each command is one page load over a file-backed store

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use olympus_storefront::format::{format_date, format_price};
use olympus_storefront::offers::CONTACT_MODAL;
use olympus_storefront::{
    FileStore, KeyValueStore, Language, Page, Route, StorefrontConfig, Timings,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Olympus Air travel storefront", long_about = None)]
struct Cli {
    /// JSON file holding the storefront's saved state
    #[arg(long, global = true, default_value = "storefront.json")]
    store: PathBuf,

    /// Language used when none has been chosen yet
    #[arg(long, global = true, default_value = "pt")]
    default_lang: Language,

    /// Skip the loader, toast and redirect delays
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the featured offers on the home page
    Offers {
        /// Book the offer at this position (1-based)
        #[arg(long)]
        book: Option<usize>,
    },
    /// Submit the search form
    Search {
        #[arg(long, default_value = "flight")]
        r#type: String,
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        date_from: String,
        #[arg(long, default_value = "")]
        date_to: String,
        #[arg(long, default_value_t = 1)]
        pax: u32,
    },
    /// Show results for the last search
    Results {
        /// Book the result at this position (1-based)
        #[arg(long)]
        add: Option<usize>,
    },
    /// Add a result from the last search by id (hotels and the package keep stable ids)
    Add { id: String },
    /// Add the dream package to the cart
    AddPackage,
    /// Remove a cart line by its cart id
    Remove { cart_id: String },
    /// Show the cart
    Cart,
    /// Confirm the cart as a booking
    Checkout {
        /// Form field as name=value, repeatable (name, email, phone)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// List past bookings
    Bookings,
    /// Switch the interface language
    Lang { code: String },
    /// Show the contact details
    Contact,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got `{}`", s))
}

fn config(cli: &Cli) -> StorefrontConfig {
    let timings = if cli.instant {
        Timings {
            loader_delay: Duration::ZERO,
            loader_fade: Duration::ZERO,
            toast_show_delay: Duration::ZERO,
            toast_visible: Duration::ZERO,
            toast_fade: Duration::ZERO,
            search_redirect: Duration::ZERO,
            checkout_redirect: Duration::ZERO,
        }
    } else {
        Timings::default()
    };

    StorefrontConfig {
        timings,
        default_language: cli.default_lang,
        store_path: cli.store.clone(),
    }
}

async fn open_page(route: Route, store: &Arc<dyn KeyValueStore>, config: &StorefrontConfig) -> Page {
    let mut page = Page::load(route, Arc::clone(store), config.clone());
    page.bootstrap().await;
    page
}

// Lets pending redirects fire before the process exits
async fn settle(page: &Page) {
    let Some(delay) = page.navigator.scheduled().iter().map(|s| s.delay).max() else {
        return;
    };
    sleep(delay + Duration::from_millis(10)).await;
    if let Some(route) = page.navigator.location() {
        println!("-> {}", route);
    }
}

fn print_notifications(page: &Page) {
    for notification in page.notifier.history() {
        println!("[{}] {}", notification.kind, notification.message);
    }
}

fn print_cart(page: &Page) {
    let t = page.t();
    let cart = page.state.cart();
    if cart.is_empty() {
        println!("{}", t.cart_empty);
        return;
    }
    for item in cart {
        println!("{:<14} {:<40} {:>10}", item.cart_id, item.title, format_price(item.price));
    }
    println!("Total: {}", format_price(page.state.cart_total()));
}

fn pick(len: usize, position: usize) -> Result<usize> {
    if position == 0 || position > len {
        bail!("position {} is out of range (1..={})", position, len);
    }
    Ok(position - 1)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("olympus_storefront=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config(&cli);
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.store_path)
            .with_context(|| format!("opening store {}", config.store_path.display()))?,
    );
    debug!(store = %config.store_path.display(), command = ?cli.command, "starting");

    match cli.command {
        Commands::Offers { book } => {
            let mut page = open_page(Route::Home, &store, &config).await;
            for (i, offer) in page.offers().iter().enumerate() {
                println!("{}. {:<8} {:<40} {:>10}", i + 1, offer.id, offer.title, format_price(offer.price));
            }
            if let Some(position) = book {
                let index = pick(page.offers().len(), position)?;
                let id = page.offers()[index].id.clone();
                page.book_offer(&id);
                print_cart(&page);
            }
            print_notifications(&page);
        }
        Commands::Search {
            r#type,
            origin,
            destination,
            date_from,
            date_to,
            pax,
        } => {
            let mut page = open_page(Route::Home, &store, &config).await;
            page.document.set_value("searchType", &r#type);
            page.on_search_type_change();
            for (id, value) in [
                ("origin", origin),
                ("destination", destination),
                ("dateFrom", date_from),
                ("dateTo", date_to),
                ("pax", pax.to_string()),
            ] {
                page.document.set_value(id, &value);
            }

            let outcome = page.submit_search();
            print_notifications(&page);
            match outcome {
                Ok(query) => {
                    info!(kind = ?query.kind(), "search saved");
                    settle(&page).await;
                }
                Err(rejection) => bail!(rejection),
            }
        }
        Commands::Results { add } => {
            let mut page = open_page(Route::Results, &store, &config).await;
            if let Some(summary) = page.document.get("searchSummary").filter(|el| !el.text.is_empty()) {
                println!("{}", summary.text);
            }
            if page.results().is_empty() {
                println!("{}", page.t().no_results);
            }
            for (i, offer) in page.results().iter().enumerate() {
                let details = match (&offer.airline, &offer.duration) {
                    (Some(airline), Some(duration)) => format!("{} • {}", airline, duration),
                    _ => String::new(),
                };
                println!(
                    "{}. {:<10} {:<36} {:<22} {:>10}",
                    i + 1,
                    offer.id,
                    offer.title,
                    details,
                    format_price(offer.price)
                );
            }
            if let Some(position) = add {
                let index = pick(page.results().len(), position)?;
                let id = page.results()[index].id.clone();
                page.add_result_to_cart(&id);
                print_cart(&page);
            }
            print_notifications(&page);
        }
        Commands::Add { id } => {
            let mut page = open_page(Route::Results, &store, &config).await;
            if page.add_result_to_cart(&id).is_none() {
                bail!("no result with id {} for the last search", id);
            }
            print_cart(&page);
            print_notifications(&page);
        }
        Commands::AddPackage => {
            let mut page = open_page(Route::Package, &store, &config).await;
            page.add_package_to_cart();
            print_cart(&page);
            print_notifications(&page);
        }
        Commands::Remove { cart_id } => {
            let mut page = open_page(Route::Results, &store, &config).await;
            let removed = page.remove_from_cart(&cart_id);
            debug!(removed, "remove finished");
            print_cart(&page);
            print_notifications(&page);
        }
        Commands::Cart => {
            let page = Page::load(Route::Package, Arc::clone(&store), config.clone());
            print_cart(&page);
        }
        Commands::Checkout { fields } => {
            let mut page = open_page(Route::Checkout, &store, &config).await;
            if page.navigator.location() == Some(Route::Home) {
                println!("{}", page.t().cart_empty);
                println!("-> {}", Route::Home);
                return Ok(());
            }
            for (name, value) in &fields {
                if !page.document.set_value(name, value) {
                    bail!("unknown checkout field {}", name);
                }
            }

            match page.submit_checkout() {
                Ok(booking) => {
                    println!("Reserva {} • {}", booking.id, format_price(booking.total()));
                    print_notifications(&page);
                    settle(&page).await;
                }
                Err(e) => {
                    for id in ["name", "email", "phone"] {
                        if let Some(message) = page.document.get(id).and_then(|el| el.field_error.as_deref()) {
                            println!("{}: {}", id, message);
                        }
                    }
                    print_notifications(&page);
                    return Err(e.into());
                }
            }
        }
        Commands::Bookings => {
            let page = open_page(Route::Bookings, &store, &config).await;
            let bookings = page.state.bookings();
            if bookings.is_empty() {
                println!("{}", olympus_storefront::bookings::NO_BOOKINGS);
            }
            for booking in bookings {
                println!(
                    "Reserva {}  {}  {}  {}  {}",
                    booking.id,
                    format_date(&booking.date),
                    booking.customer_name(),
                    format_price(booking.total()),
                    booking.status
                );
                for item in &booking.items {
                    println!("  ✓ {}", item.title);
                }
            }
        }
        Commands::Lang { code } => {
            let mut page = open_page(Route::Home, &store, &config).await;
            page.set_language(&code);
            print_notifications(&page);
        }
        Commands::Contact => {
            let mut page = Page::load(Route::Home, Arc::clone(&store), config.clone());
            page.show_contact_modal();
            match page.document.get(CONTACT_MODAL) {
                Some(modal) => println!("{}", modal.inner_html),
                None => bail!("contact details unavailable"),
            }
        }
    }

    Ok(())
}
