use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// An offer can hold at most this many images.
pub const MAX_OFFER_IMAGES: usize = 6;

/// Fixed category catalog offers are created against.
pub const CATEGORIES: &[&str] = &[
  "Books",
  "Clothing",
  "Electronics",
  "Furniture",
  "Garden",
  "Home Appliances",
  "Sports",
  "Toys",
  "Vehicles",
  "Other",
];

pub fn is_known_category(name: &str) -> bool {
  CATEGORIES.iter().any(|category| category.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
  Active,
  Inactive,
  Sold,
  Archived,
}

impl OfferStatus {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Inactive => "inactive",
      Self::Sold => "sold",
      Self::Archived => "archived",
    }
  }

  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "active" => Some(Self::Active),
      "inactive" => Some(Self::Inactive),
      "sold" => Some(Self::Sold),
      "archived" => Some(Self::Archived),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
  pub zip_code: i32,
  pub city: String,
  pub latitude: f64,
  pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRow {
  pub offer_id: Uuid,
  pub title: String,
  pub title_lower: String,
  pub description: String,
  pub description_lower: String,
  pub category: String,
  pub price: i64, // minor units (øre)
  pub shipping: bool,
  pub status: OfferStatus,
  pub city_info: CityInfo,
  pub images: Vec<String>,
  pub user_id: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the seller when creating a new offer. Identifier,
/// status and timestamps are filled in by the store.
#[derive(Debug, Clone)]
pub struct OfferDraft {
  pub title: String,
  pub description: String,
  pub category: String,
  pub price: i64,
  pub shipping: bool,
  pub city_info: CityInfo,
  pub images: Vec<String>,
}

/// Partial update applied to an existing offer. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct OfferPatch {
  pub title: Option<String>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub price: Option<i64>,
  pub shipping: Option<bool>,
  pub city_info: Option<CityInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
  pub user_id: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub phone_number: String,
  pub profile_url: Option<String>,
  pub saved_offers: Vec<Uuid>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRow {
  pub thread_id: Uuid,
  pub offer_id: Uuid,
  pub participants: Vec<String>,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::OfferStatus;
  use super::is_known_category;

  #[test]
  fn status_round_trips_through_text() {
    for status in [
      OfferStatus::Active,
      OfferStatus::Inactive,
      OfferStatus::Sold,
      OfferStatus::Archived,
    ] {
      assert_eq!(OfferStatus::parse(status.as_str()), Some(status));
    }
  }

  #[test]
  fn unknown_status_text_is_rejected() {
    assert_eq!(OfferStatus::parse("deleted"), None);
    assert_eq!(OfferStatus::parse("Active"), None);
  }

  #[test]
  fn category_lookup_ignores_case() {
    assert!(is_known_category("Electronics"));
    assert!(is_known_category("electronics"));
    assert!(!is_known_category("Weapons"));
  }
}
