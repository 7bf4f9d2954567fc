// Persisted entities: cart items, the last search and bookings.
// Field names on the wire follow the JSON the storefront has always written.

use crate::storage::Validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Flight,
    Hotel,
    Package,
    Offer,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::Flight => "flight",
            ItemKind::Hotel => "hotel",
            ItemKind::Package => "package",
            ItemKind::Offer => "offer",
        };
        f.write_str(label)
    }
}

// Something that can be put in the cart: a search result, a featured offer or the package
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Offer {
    pub id: String,
    pub title: String,
    pub price: u64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Offer {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: u64, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            kind,
            airline: None,
            depart: None,
            duration: None,
            image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    // Whole reais; unsigned so a negative price never deserializes
    pub price: u64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(rename = "cartId")]
    pub cart_id: String,
}

impl CartItem {
    pub fn from_offer(offer: &Offer, cart_id: String) -> Self {
        Self {
            id: offer.id.clone(),
            title: offer.title.clone(),
            price: offer.price,
            kind: offer.kind,
            cart_id,
        }
    }
}

impl Validate for Vec<CartItem> {
    fn is_valid(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.len());
        self.iter()
            .all(|item| !item.cart_id.is_empty() && seen.insert(item.cart_id.as_str()))
    }
}

pub fn cart_total(items: &[CartItem]) -> u64 {
    items.iter().map(|item| item.price).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Flight,
    Hotel,
    Package,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
    pub origin: String,
    pub destination: String,
    #[serde(rename = "dateFrom")]
    pub date_from: String,
    #[serde(rename = "dateTo")]
    pub date_to: String,
    pub pax: u32,
    // Epoch milliseconds at submit time
    pub ts: i64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            search_type: None,
            origin: String::new(),
            destination: String::new(),
            date_from: String::new(),
            date_to: String::new(),
            pax: 1,
            ts: 0,
        }
    }
}

impl SearchQuery {
    // No type and an unrecognized type both mean flights. Nothing documents the second
    // case, so it is logged when it happens.
    pub fn kind(&self) -> SearchKind {
        match self.search_type.as_deref() {
            None | Some("") | Some("flight") => SearchKind::Flight,
            Some("hotel") => SearchKind::Hotel,
            Some("package") => SearchKind::Package,
            Some(other) => {
                warn!(search_type = other, "unrecognized search type, showing flights");
                SearchKind::Flight
            }
        }
    }
}

impl Validate for SearchQuery {
    fn is_valid(&self) -> bool {
        self.pax >= 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => f.write_str("confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Booking {
    pub id: String,
    pub items: Vec<CartItem>,
    pub customer: BTreeMap<String, String>,
    pub date: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn total(&self) -> u64 {
        cart_total(&self.items)
    }

    pub fn customer_name(&self) -> &str {
        self.customer.get("name").map(String::as_str).unwrap_or_default()
    }
}

impl Validate for Vec<Booking> {
    fn is_valid(&self) -> bool {
        self.iter().all(|booking| !booking.id.is_empty())
    }
}
