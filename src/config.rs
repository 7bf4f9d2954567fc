// Storefront configuration: timer constants and defaults

use crate::i18n::Language;
use std::path::PathBuf;
use std::time::Duration;

// Delays used to sequence visual transitions and simulate network latency
#[derive(Debug, Clone)]
pub struct Timings {
    pub loader_delay: Duration,
    pub loader_fade: Duration,
    pub toast_show_delay: Duration,
    // Measured from insertion, not from when the toast became visible
    pub toast_visible: Duration,
    pub toast_fade: Duration,
    pub search_redirect: Duration,
    pub checkout_redirect: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            loader_delay: Duration::from_millis(800),
            loader_fade: Duration::from_millis(300),
            toast_show_delay: Duration::from_millis(100),
            toast_visible: Duration::from_millis(3000),
            toast_fade: Duration::from_millis(300),
            search_redirect: Duration::from_millis(1000),
            checkout_redirect: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub timings: Timings,
    pub default_language: Language,
    pub store_path: PathBuf,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            default_language: Language::Pt,
            store_path: PathBuf::from("storefront.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = Timings::default();
        assert_eq!(timings.loader_delay, Duration::from_millis(800));
        assert_eq!(timings.toast_visible + timings.toast_fade, Duration::from_millis(3300));
        assert_eq!(timings.search_redirect, Duration::from_millis(1000));
        assert_eq!(timings.checkout_redirect, Duration::from_millis(1500));
    }
}
