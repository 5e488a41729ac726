use std::env;

use anyhow::Context;
use anyhow::Result;

const DEFAULT_AUTH_API_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_GEO_API_URL: &str = "https://api.dataforsyningen.dk";
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub auth_api_url: String,
  pub auth_api_key: String,
  pub geo_api_url: String,
  pub blob_store_url: String,
  pub search_page_size: i64,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let auth_api_key = env::var("AUTH_API_KEY").context("AUTH_API_KEY must be set")?;
    let blob_store_url = env::var("BLOB_STORE_URL").context("BLOB_STORE_URL must be set")?;
    let auth_api_url = env::var("AUTH_API_URL").unwrap_or_else(|_| DEFAULT_AUTH_API_URL.to_string());
    let geo_api_url = env::var("GEO_API_URL").unwrap_or_else(|_| DEFAULT_GEO_API_URL.to_string());
    let search_page_size = parse_page_size(&env::var("SEARCH_PAGE_SIZE").unwrap_or_default());
    Ok(Self {
      database_url,
      auth_api_url,
      auth_api_key,
      geo_api_url,
      blob_store_url,
      search_page_size,
    })
  }
}

fn parse_page_size(raw: &str) -> i64 {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return DEFAULT_PAGE_SIZE;
  }
  match trimmed.parse::<i64>() {
    Ok(value) if value > 0 => value,
    _ => {
      tracing::warn!(value = trimmed, "invalid SEARCH_PAGE_SIZE, using default");
      DEFAULT_PAGE_SIZE
    },
  }
}

#[cfg(test)]
mod tests {
  use super::DEFAULT_PAGE_SIZE;
  use super::parse_page_size;

  #[test]
  fn parses_a_valid_page_size() {
    assert_eq!(parse_page_size("25"), 25);
    assert_eq!(parse_page_size(" 5 "), 5);
  }

  #[test]
  fn empty_input_yields_the_default() {
    assert_eq!(parse_page_size(""), DEFAULT_PAGE_SIZE);
  }

  #[test]
  fn junk_and_non_positive_values_fall_back() {
    assert_eq!(parse_page_size("abc"), DEFAULT_PAGE_SIZE);
    assert_eq!(parse_page_size("0"), DEFAULT_PAGE_SIZE);
    assert_eq!(parse_page_size("-3"), DEFAULT_PAGE_SIZE);
  }
}
