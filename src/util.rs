use chrono::DateTime;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:[.,]\d{1,2})?$").expect("valid regex"));

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
  #[error("price must match 0,00 format")]
  InvalidFormat,
  #[error("price exceeds supported range")]
  OutOfRange,
}

/// Parses a seller-entered price into øre. Accepts both comma and dot as
/// the decimal separator.
pub fn parse_price_to_minor(input: &str) -> Result<i64, PriceError> {
  let trimmed = input.trim();
  if !PRICE_PATTERN.is_match(trimmed) {
    return Err(PriceError::InvalidFormat);
  }

  let mut parts = trimmed.splitn(2, [',', '.']);
  let kroner = parts
    .next()
    .and_then(|part| part.parse::<i64>().ok())
    .ok_or(PriceError::InvalidFormat)?;

  let ore = match parts.next() {
    None => 0,
    Some(minor) if minor.len() == 1 => minor.parse::<i64>().map_err(|_| PriceError::OutOfRange)? * 10,
    Some(minor) => minor.parse::<i64>().map_err(|_| PriceError::OutOfRange)?,
  };

  kroner
    .checked_mul(100)
    .and_then(|value| value.checked_add(ore))
    .ok_or(PriceError::OutOfRange)
}

/// Formats øre the Danish way: "1.234,50 kr.", whole amounts without decimals.
pub fn format_price(amount: i64) -> String {
  let kroner = amount / 100;
  let ore = (amount % 100).abs();
  let grouped = group_thousands(kroner);
  if ore == 0 {
    format!("{grouped} kr.")
  } else {
    format!("{grouped},{ore:02} kr.")
  }
}

fn group_thousands(value: i64) -> String {
  let digits = value.abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (index, digit) in digits.chars().enumerate() {
    if index > 0 && (digits.len() - index) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(digit);
  }
  if value < 0 { format!("-{grouped}") } else { grouped }
}

pub fn format_date(timestamp: DateTime<Utc>) -> String {
  timestamp.format("%d/%m/%Y").to_string()
}

/// Haversine great-circle distance in kilometres.
pub fn distance_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
  let d_lat = (lat_b - lat_a).to_radians();
  let d_lon = (lon_b - lon_a).to_radians();
  let a = (d_lat / 2.0).sin().powi(2)
    + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
  EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use chrono::Utc;

  use super::PriceError;
  use super::distance_km;
  use super::format_date;
  use super::format_price;
  use super::parse_price_to_minor;

  #[test]
  fn parses_valid_prices() {
    assert_eq!(parse_price_to_minor("10"), Ok(1000));
    assert_eq!(parse_price_to_minor("10,5"), Ok(1050));
    assert_eq!(parse_price_to_minor("10.55"), Ok(1055));
    assert_eq!(parse_price_to_minor(" 500 "), Ok(50000));
  }

  #[test]
  fn rejects_invalid_price_formats() {
    assert_eq!(parse_price_to_minor("abc"), Err(PriceError::InvalidFormat));
    assert_eq!(parse_price_to_minor("10,555"), Err(PriceError::InvalidFormat));
    assert_eq!(parse_price_to_minor("-5"), Err(PriceError::InvalidFormat));
  }

  #[test]
  fn formats_prices_with_danish_grouping() {
    assert_eq!(format_price(123_450), "1.234,50 kr.");
    assert_eq!(format_price(500_000), "5.000 kr.");
    assert_eq!(format_price(99), "0,99 kr.");
  }

  #[test]
  fn formats_dates_day_first() {
    let timestamp = Utc.with_ymd_and_hms(2024, 3, 7, 12, 30, 0).unwrap();
    assert_eq!(format_date(timestamp), "07/03/2024");
  }

  #[test]
  fn distance_between_copenhagen_and_aarhus() {
    let distance = distance_km(55.6761, 12.5683, 56.1629, 10.2039);
    assert!((150.0 .. 165.0).contains(&distance), "got {distance}");
  }

  #[test]
  fn distance_to_same_point_is_zero() {
    let distance = distance_km(55.6761, 12.5683, 55.6761, 12.5683);
    assert!(distance.abs() < 1e-9);
  }
}
