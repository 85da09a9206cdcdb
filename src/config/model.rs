use crate::listing::criteria::FilterCriteria;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Config {
    pub backend: BackendConfig,
    pub site_url: String,
    pub sitemap_port: u16,
    pub favorites_path: PathBuf,
    /// Title to flip in the favorites before listing
    pub toggle_favorite: Option<String>,
    pub criteria: FilterCriteria,
}

#[derive(Debug)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
    pub page_size: usize,
    pub max_retries: u32,
}
