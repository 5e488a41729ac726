use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::models::CityInfo;

static ZIP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));

#[derive(Debug, Error)]
pub enum GeoError {
  #[error("address service returned status {0}")]
  Status(u16),
  #[error("{0}")]
  Decode(String),
  #[error(transparent)]
  Transport(#[from] reqwest::Error),
}

/// One row from the address autocomplete endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressSuggestion {
  pub text: String,
  pub street: String,
  pub house_number: String,
  pub zip_code: String,
  pub city: String,
  pub latitude: f64,
  pub longitude: f64,
}

/// Client for the national address/postal-code HTTP service. Both
/// endpoints return untyped JSON which is shaped here and nowhere else.
#[derive(Debug, Clone)]
pub struct GeoClient {
  client: Client,
  base_url: String,
}

impl GeoClient {
  pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  /// Resolves a four-digit zip code into city name and coordinates.
  /// Returns `None` for input that is not a four-digit code, and for
  /// codes the service does not know.
  #[instrument(skip(self))]
  pub async fn lookup_zip_code(&self, zip_code: &str) -> Result<Option<CityInfo>, GeoError> {
    let trimmed = zip_code.trim();
    if !ZIP_PATTERN.is_match(trimmed) {
      return Ok(None);
    }

    let url = format!("{}/postnumre/{}", self.base_url, trimmed);
    let response = self.client.get(url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let status = response.status();
    if !status.is_success() {
      return Err(GeoError::Status(status.as_u16()));
    }

    let payload: Value = response.json().await?;
    parse_city_info(&payload).map(Some)
  }

  #[instrument(skip(self))]
  pub async fn autocomplete_address(&self, query: &str) -> Result<Vec<AddressSuggestion>, GeoError> {
    let url = format!("{}/adresser/autocomplete", self.base_url);
    let response = self
      .client
      .get(url)
      .query(&[("q", query), ("per_side", "100")])
      .send()
      .await?;
    let status = response.status();
    if !status.is_success() {
      return Err(GeoError::Status(status.as_u16()));
    }

    let payload: Value = response.json().await?;
    Ok(parse_suggestions(&payload))
  }
}

/// The service's `visueltcenter` is GeoJSON-ordered: longitude first.
fn parse_city_info(payload: &Value) -> Result<CityInfo, GeoError> {
  let zip_code = match &payload["nr"] {
    Value::String(raw) => raw.parse::<i32>().ok(),
    Value::Number(number) => number.as_i64().map(|value| value as i32),
    _ => None,
  }
  .ok_or_else(|| GeoError::Decode("postal lookup response missing 'nr'".to_string()))?;

  let city = payload["navn"]
    .as_str()
    .ok_or_else(|| GeoError::Decode("postal lookup response missing 'navn'".to_string()))?
    .to_string();

  let center = payload["visueltcenter"]
    .as_array()
    .ok_or_else(|| GeoError::Decode("postal lookup response missing 'visueltcenter'".to_string()))?;
  let longitude = center
    .first()
    .and_then(Value::as_f64)
    .ok_or_else(|| GeoError::Decode("'visueltcenter' missing longitude".to_string()))?;
  let latitude = center
    .get(1)
    .and_then(Value::as_f64)
    .ok_or_else(|| GeoError::Decode("'visueltcenter' missing latitude".to_string()))?;

  Ok(CityInfo {
    zip_code,
    city,
    latitude,
    longitude,
  })
}

fn parse_suggestions(payload: &Value) -> Vec<AddressSuggestion> {
  payload
    .as_array()
    .map(|items| items.iter().filter_map(suggestion_from_value).collect())
    .unwrap_or_default()
}

fn suggestion_from_value(item: &Value) -> Option<AddressSuggestion> {
  let address = &item["adresse"];
  Some(AddressSuggestion {
    text: item["tekst"].as_str()?.to_string(),
    street: address["vejnavn"].as_str()?.to_string(),
    house_number: address["husnr"].as_str()?.to_string(),
    zip_code: address["postnr"].as_str()?.to_string(),
    city: address["postnrnavn"].as_str()?.to_string(),
    // x/y arrive as strings or numbers depending on the endpoint.
    latitude: lenient_f64(&address["y"])?,
    longitude: lenient_f64(&address["x"])?,
  })
}

fn lenient_f64(value: &Value) -> Option<f64> {
  match value {
    Value::Number(number) => number.as_f64(),
    Value::String(raw) => raw.parse().ok(),
    _ => None,
  }
}
