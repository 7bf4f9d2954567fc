// Localization table: one fixed set of UI strings per language

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Pt, Language::En, Language::Es];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    // Unknown or missing codes resolve to the given default
    pub fn resolve(code: Option<&str>, default: Language) -> Language {
        code.and_then(|code| code.parse().ok()).unwrap_or(default)
    }

    pub fn translations(&self) -> &'static Translations {
        match self {
            Language::Pt => &PT,
            Language::En => &EN,
            Language::Es => &ES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct Translations {
    pub search_placeholder: &'static str,
    pub pax: &'static str,
    pub book_now: &'static str,
    pub added: &'static str,
    pub loading: &'static str,
    pub search_flights: &'static str,
    pub search_hotels: &'static str,
    pub search_packages: &'static str,
    pub no_results: &'static str,
    pub cart_empty: &'static str,
    pub booking_success: &'static str,
    pub booking_canceled: &'static str,
    pub required_field: &'static str,
    pub invalid_email: &'static str,
}

impl Translations {
    // Lookup by the key used in `data-i18n` attributes
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let text = match key {
            "searchPlaceholder" => self.search_placeholder,
            "pax" => self.pax,
            "bookNow" => self.book_now,
            "added" => self.added,
            "loading" => self.loading,
            "searchFlights" => self.search_flights,
            "searchHotels" => self.search_hotels,
            "searchPackages" => self.search_packages,
            "noResults" => self.no_results,
            "cartEmpty" => self.cart_empty,
            "bookingSuccess" => self.booking_success,
            "bookingCanceled" => self.booking_canceled,
            "requiredField" => self.required_field,
            "invalidEmail" => self.invalid_email,
            _ => return None,
        };
        Some(text)
    }
}

static PT: Translations = Translations {
    search_placeholder: "Selecione",
    pax: "Passageiros",
    book_now: "Reservar agora",
    added: "adicionado ao carrinho",
    loading: "Carregando...",
    search_flights: "Buscar voos",
    search_hotels: "Buscar hotéis",
    search_packages: "Buscar pacotes",
    no_results: "Nenhum resultado encontrado",
    cart_empty: "Carrinho vazio",
    booking_success: "Reserva realizada com sucesso!",
    booking_canceled: "Reserva cancelada",
    required_field: "Este campo é obrigatório",
    invalid_email: "Email inválido",
};

static EN: Translations = Translations {
    search_placeholder: "Select",
    pax: "Passengers",
    book_now: "Book now",
    added: "added to cart",
    loading: "Loading...",
    search_flights: "Search flights",
    search_hotels: "Search hotels",
    search_packages: "Search packages",
    no_results: "No results found",
    cart_empty: "Cart is empty",
    booking_success: "Booking successful!",
    booking_canceled: "Booking canceled",
    required_field: "This field is required",
    invalid_email: "Invalid email",
};

static ES: Translations = Translations {
    search_placeholder: "Seleccionar",
    pax: "Pasajeros",
    book_now: "Reservar",
    added: "añadido al carrito",
    loading: "Cargando...",
    search_flights: "Buscar vuelos",
    search_hotels: "Buscar hoteles",
    search_packages: "Buscar paquetes",
    no_results: "No se encontraron resultados",
    cart_empty: "Carrito vacío",
    booking_success: "¡Reserva realizada con éxito!",
    booking_canceled: "Reserva cancelada",
    required_field: "Este campo es obligatorio",
    invalid_email: "Email inválido",
};
