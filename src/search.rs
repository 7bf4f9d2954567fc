// Search flow: read the form, validate, persist the query and head to results

use crate::models::SearchQuery;
use crate::page::{Page, Route};
use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchRejection {
    #[error("Por favor, selecione origem e destino")]
    MissingEndpoints,

    #[error("Origem e destino não podem ser iguais")]
    SameEndpoints,

    #[error("Por favor, selecione uma data de ida")]
    MissingDeparture,
}

pub const SEARCHING_LABEL: &str = "Buscando...";

// Form values with defaults for controls that aren't on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub search_type: String,
    pub origin: String,
    pub destination: String,
    pub date_from: String,
    pub date_to: String,
    pub pax: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            search_type: "flight".to_string(),
            origin: String::new(),
            destination: String::new(),
            date_from: String::new(),
            date_to: String::new(),
            pax: 1,
        }
    }
}

impl SearchForm {
    // Checks run in order and stop at the first failure
    pub fn validate(&self) -> Result<(), SearchRejection> {
        if self.origin.is_empty() || self.destination.is_empty() {
            return Err(SearchRejection::MissingEndpoints);
        }
        if self.origin == self.destination {
            return Err(SearchRejection::SameEndpoints);
        }
        if self.date_from.is_empty() {
            return Err(SearchRejection::MissingDeparture);
        }
        Ok(())
    }

    pub fn into_query(self, ts: i64) -> SearchQuery {
        SearchQuery {
            search_type: Some(self.search_type),
            origin: self.origin,
            destination: self.destination,
            date_from: self.date_from,
            date_to: self.date_to,
            pax: self.pax,
            ts,
        }
    }
}

impl Page {
    pub fn read_search_form(&self) -> SearchForm {
        let defaults = SearchForm::default();
        let doc = &self.document;
        let text = |id: &str, default: String| doc.value_of(id).map(str::to_string).unwrap_or(default);

        SearchForm {
            search_type: text("searchType", defaults.search_type),
            origin: text("origin", defaults.origin),
            destination: text("destination", defaults.destination),
            date_from: text("dateFrom", defaults.date_from),
            date_to: text("dateTo", defaults.date_to),
            pax: doc
                .value_of("pax")
                .and_then(|v| v.trim().parse().ok())
                .filter(|pax| *pax >= 1)
                .unwrap_or(defaults.pax),
        }
    }

    // On rejection nothing is stored and the page stays put
    pub fn submit_search(&mut self) -> Result<SearchQuery, SearchRejection> {
        let form = self.read_search_form();
        if let Err(rejection) = form.validate() {
            info!(%rejection, "search rejected");
            self.notifier.error(rejection.to_string());
            return Err(rejection);
        }

        let query = form.into_query(Utc::now().timestamp_millis());
        info!(
            origin = %query.origin,
            destination = %query.destination,
            date_from = %query.date_from,
            pax = query.pax,
            "search submitted"
        );
        self.state.set_last_search(query.clone());

        if let Some(button) = self.document.get_mut("searchSubmit") {
            button.text = SEARCHING_LABEL.to_string();
            button.disabled = true;
        }
        self.navigator
            .navigate_after(Route::Results, self.config.timings.search_redirect);

        Ok(query)
    }

    pub fn init_search_form(&mut self) {
        self.set_date_bounds(Utc::now().date_naive());
        self.on_search_type_change();
    }

    // Both dates start at today at the earliest
    pub fn set_date_bounds(&mut self, today: NaiveDate) {
        let today = today.format("%Y-%m-%d").to_string();
        for id in ["dateFrom", "dateTo"] {
            if let Some(field) = self.document.get_mut(id) {
                field.min = Some(today.clone());
            }
        }
    }

    // Return can't precede departure
    pub fn on_date_from_change(&mut self) {
        let Some(date_from) = self.document.value_of("dateFrom").map(str::to_string) else {
            return;
        };
        if let Some(date_to) = self.document.get_mut("dateTo") {
            date_to.min = Some(date_from);
        }
    }

    // Submit label follows the selected search type
    pub fn on_search_type_change(&mut self) {
        let t = self.t();
        let label = match self.document.value_of("searchType") {
            Some("flight") => t.search_flights,
            Some("hotel") => t.search_hotels,
            Some("package") => t.search_packages,
            _ => return,
        };
        if let Some(button) = self.document.get_mut("searchSubmit") {
            button.text = label.to_string();
        }
    }
}
