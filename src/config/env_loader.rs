use crate::config::model::{BackendConfig, Config};
use crate::events::api::DEFAULT_PAGE_SIZE;
use crate::events::model::SortDirection;
use crate::listing::criteria::{CriteriaError, DateRange, FilterCriteria, SortField};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

const DEFAULT_SITEMAP_PORT: u16 = 8080;
const DEFAULT_FAVORITES_PATH: &str = "favorites.json";

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| env::var(name).ok())
}

/// Same as [`load_config`], reading variables through `var`
pub fn load_config_from<F>(var: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let backend = BackendConfig {
        url: load_required_config(&var, "BACKEND_URL")?,
        api_key: load_required_config(&var, "BACKEND_API_KEY")?,
        page_size: load_parsed_config(&var, "BACKEND_PAGE_SIZE", "a positive number")?
            .unwrap_or(DEFAULT_PAGE_SIZE),
        max_retries: load_parsed_config(&var, "BACKEND_MAX_RETRIES", "a number")?.unwrap_or(0),
    };

    if backend.page_size == 0 {
        return Err(ConfigError::Invalid {
            name: "BACKEND_PAGE_SIZE".to_string(),
            expected: "a positive number",
        });
    }

    Ok(Config {
        backend,
        site_url: load_required_config(&var, "SITE_URL")?,
        sitemap_port: load_parsed_config(&var, "SITEMAP_PORT", "a port number")?
            .unwrap_or(DEFAULT_SITEMAP_PORT),
        favorites_path: var("FAVORITES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FAVORITES_PATH)),
        toggle_favorite: var("TOGGLE_FAVORITE")
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty()),
        criteria: load_criteria(&var)?,
    })
}

fn load_criteria<F>(var: &F) -> Result<FilterCriteria, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let from: Option<NaiveDate> = load_parsed_config(var, "LISTING_FROM", "a YYYY-MM-DD date")?;
    let to: Option<NaiveDate> = load_parsed_config(var, "LISTING_TO", "a YYYY-MM-DD date")?;

    let date_range = match (from, to) {
        (None, None) => None,
        (from, to) => Some(DateRange::new(from, to)?),
    };

    let venues: BTreeSet<String> = var("LISTING_VENUES")
        .map(|venues| {
            venues
                .split(',')
                .map(str::trim)
                .filter(|venue| !venue.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(FilterCriteria {
        search: var("LISTING_SEARCH").unwrap_or_default(),
        venues,
        date_range,
        sort_by: load_parsed_config::<_, SortField>(var, "LISTING_SORT", "date, title or venue")?
            .unwrap_or_default(),
        direction: load_parsed_config::<_, SortDirection>(var, "LISTING_DIRECTION", "asc or desc")?
            .unwrap_or_default(),
        favorites_only: load_bool_config(var, "LISTING_FAVORITES_ONLY", false)?,
    })
}

fn load_required_config<F>(var: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(name.to_string()))
}

fn load_bool_config<F>(var: &F, name: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(load_parsed_config(var, name, "either 'true' or 'false'")?.unwrap_or(default))
}

fn load_parsed_config<F, T>(var: &F, name: &str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match var(name) {
        Some(value) => value.trim().parse().map(Some).map_err(|e| {
            warn!("Invalid {name} value '{value}': {e}");

            ConfigError::Invalid {
                name: name.to_string(),
                expected,
            }
        }),
        None => Ok(None),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("Invalid config '{name}'. Expected {expected}")]
    Invalid { name: String, expected: &'static str },

    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        load_config_from(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("BACKEND_URL", "https://db.example.com"),
        ("BACKEND_API_KEY", "anon"),
        ("SITE_URL", "https://konserter.example.no"),
    ];

    #[test_log::test]
    fn should_use_defaults_when_only_required_values_are_set() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.backend.page_size, 1000);
        assert_eq!(config.backend.max_retries, 0);
        assert_eq!(config.sitemap_port, 8080);
        assert_eq!(config.favorites_path, PathBuf::from("favorites.json"));
        assert_eq!(config.toggle_favorite, None);
        assert_eq!(config.criteria, FilterCriteria::default());
    }

    #[test_log::test]
    fn should_load_the_favorite_to_toggle_trimmed() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TOGGLE_FAVORITE", "  Aurora "));

        assert_eq!(load(&vars).unwrap().toggle_favorite.as_deref(), Some("Aurora"));
    }

    #[test_log::test]
    fn when_favorite_to_toggle_is_blank_should_be_none() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TOGGLE_FAVORITE", "   "));

        assert_eq!(load(&vars).unwrap().toggle_favorite, None);
    }

    #[test_log::test]
    fn when_backend_url_is_missing_should_fail() {
        let result = load(&[("BACKEND_API_KEY", "anon"), ("SITE_URL", "https://x.no")]);

        assert_eq!(result.unwrap_err(), ConfigError::Missing("BACKEND_URL".to_string()));
    }

    #[test_log::test]
    fn should_load_listing_criteria() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("LISTING_SEARCH", "aurora"),
            ("LISTING_VENUES", "Grieghallen, USF Verftet,"),
            ("LISTING_FROM", "2025-05-01"),
            ("LISTING_SORT", "venue"),
            ("LISTING_DIRECTION", "desc"),
            ("LISTING_FAVORITES_ONLY", "true"),
        ]);

        let criteria = load(&vars).unwrap().criteria;

        assert_eq!(criteria.search, "aurora");
        assert_eq!(criteria.venues.len(), 2);
        assert!(criteria.venues.contains("USF Verftet"));
        assert_eq!(
            criteria.date_range.and_then(|range| range.from()),
            NaiveDate::from_ymd_opt(2025, 5, 1)
        );
        assert_eq!(criteria.sort_by, SortField::Venue);
        assert_eq!(criteria.direction, SortDirection::Desc);
        assert!(criteria.favorites_only);
    }

    #[test_log::test]
    fn when_listing_range_is_inverted_should_fail() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([("LISTING_FROM", "2025-05-02"), ("LISTING_TO", "2025-05-01")]);

        assert!(matches!(load(&vars), Err(ConfigError::Criteria(_))));
    }

    #[test_log::test]
    fn when_page_size_is_zero_should_fail() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("BACKEND_PAGE_SIZE", "0"));

        assert!(matches!(load(&vars), Err(ConfigError::Invalid { .. })));
    }

    #[test_log::test]
    fn when_bool_is_not_a_bool_should_fail() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("LISTING_FAVORITES_ONLY", "ja"));

        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid {
                name: "LISTING_FAVORITES_ONLY".to_string(),
                expected: "either 'true' or 'false'"
            }
        );
    }
}
