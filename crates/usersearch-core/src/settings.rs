use std::time::Duration;

use crate::directory::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::models::{CoreError, CoreResult, UserSortKey, search::MAX_PAGE_SIZE};
use crate::orchestration::{DEFAULT_PAGE_SIZE, DEFAULT_QUIET_PERIOD};

pub const API_BASE_URL_ENV: &str = "USERSEARCH_API_BASE_URL";
pub const DEBOUNCE_MS_ENV: &str = "USERSEARCH_DEBOUNCE_MS";
pub const PAGE_SIZE_ENV: &str = "USERSEARCH_PAGE_SIZE";
pub const SORT_ENV: &str = "USERSEARCH_SORT";
pub const TIMEOUT_SECS_ENV: &str = "USERSEARCH_TIMEOUT_SECS";

pub const DEFAULT_USER_AGENT: &str = concat!("usersearch/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchSettings {
    pub api_base_url: String,
    pub quiet_period: Duration,
    pub page_size: u8,
    pub sort: UserSortKey,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            quiet_period: DEFAULT_QUIET_PERIOD,
            page_size: DEFAULT_PAGE_SIZE,
            sort: UserSortKey::Followers,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SearchSettings {
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides on top of the defaults. Unset or empty values keep
    /// the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut settings = Self::default();

        if let Some(base_url) = value(API_BASE_URL_ENV) {
            settings.api_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(millis) = value(DEBOUNCE_MS_ENV) {
            settings.quiet_period = Duration::from_millis(parse_number(DEBOUNCE_MS_ENV, &millis)?);
        }
        if let Some(page_size) = value(PAGE_SIZE_ENV) {
            let page_size = parse_number(PAGE_SIZE_ENV, &page_size)?;
            settings.page_size = u8::try_from(page_size)
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .ok_or_else(|| {
                    CoreError::invalid_input(format!(
                        "{PAGE_SIZE_ENV} must be between 1 and {MAX_PAGE_SIZE}"
                    ))
                })?;
        }
        if let Some(sort) = value(SORT_ENV) {
            settings.sort = sort.parse()?;
        }
        if let Some(secs) = value(TIMEOUT_SECS_ENV) {
            settings.request_timeout = Duration::from_secs(parse_number(TIMEOUT_SECS_ENV, &secs)?);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(CoreError::invalid_input(format!(
                "api base url must be absolute http(s): '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(CoreError::invalid_input(
                "request timeout must be greater than zero",
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(CoreError::invalid_input(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> CoreResult<u64> {
    raw.parse::<u64>()
        .map_err(|e| CoreError::invalid_input(format!("{key} must be a whole number: {e}")))
}
