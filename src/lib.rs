// Main library file for the Olympus Air storefront

// Storage and domain model
pub mod format;
pub mod ids;
pub mod models;
pub mod storage;

// Page runtime
pub mod config;
pub mod dom;
pub mod i18n;
pub mod notify;
pub mod page;
pub mod state;

// Page flows
pub mod bookings;
pub mod cart;
pub mod checkout;
pub mod offers;
pub mod results;
pub mod search;

// Re-export key types for convenience
pub use checkout::{CheckoutEntry, CheckoutError, FieldError};
pub use config::{StorefrontConfig, Timings};
pub use i18n::{Language, Translations};
pub use models::{Booking, BookingStatus, CartItem, ItemKind, Offer, SearchKind, SearchQuery};
pub use notify::{Notification, NotificationKind, Notifier};
pub use page::{Navigator, Page, Route};
pub use search::SearchRejection;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
