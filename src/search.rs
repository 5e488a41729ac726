use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::models::OfferRow;
use crate::util::distance_km;

/// Opaque forward cursor: the title/id pair of the last row of the
/// previously fetched page. There is no random access to page N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
  pub title: String,
  pub offer_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct Pagination {
  pub limit: i64,
  pub start_after: Option<PageCursor>,
}

impl Pagination {
  pub fn first_page(limit: i64) -> Self {
    Self {
      limit,
      start_after: None,
    }
  }
}

/// Optional search filters. Price bounds and category membership are
/// evaluated by the database; the distance radius and the free-text query
/// are applied client-side over the fetched page.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
  pub low_price: Option<i64>,
  pub high_price: Option<i64>,
  pub location_latitude: Option<f64>,
  pub location_longitude: Option<f64>,
  /// Radius in kilometres around the requester's location.
  pub distance_from_zipcode: Option<f64>,
  /// Comma-separated category allow-list.
  pub selected_categories: Option<String>,
  pub shippable: bool,
}

impl SearchFilters {
  pub fn category_list(&self) -> Vec<String> {
    self
      .selected_categories
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|category| !category.is_empty())
      .map(str::to_string)
      .collect()
  }
}

#[derive(Debug, Clone)]
pub struct SearchPage {
  pub offers: Vec<OfferRow>,
  /// Cursor for the next page, present when the fetched page was full.
  /// Derived from the raw page, so it advances even when the client-side
  /// filters rejected every row.
  pub next: Option<PageCursor>,
}

/// Client-side pass over one fetched page: geo-distance and substring
/// filters, then newest-first ordering. This can only shrink the page, so
/// the effective page size may come out below the requested limit.
pub fn filter_page(offers: Vec<OfferRow>, search_text: &str, filters: Option<&SearchFilters>) -> Vec<OfferRow> {
  let needle = search_text.to_lowercase();
  let mut survivors: Vec<OfferRow> = offers
    .into_iter()
    .filter(|offer| {
      within_radius(offer, filters)
        && (offer.title_lower.contains(&needle) || offer.description_lower.contains(&needle))
    })
    .collect();
  survivors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  survivors
}

/// Only active when requester coordinates and a positive radius are all
/// present. An offer exactly on the radius is kept: rejection is strictly
/// greater-than.
fn within_radius(offer: &OfferRow, filters: Option<&SearchFilters>) -> bool {
  let Some(filters) = filters else {
    return true;
  };
  let (Some(latitude), Some(longitude)) = (filters.location_latitude, filters.location_longitude) else {
    return true;
  };
  let Some(radius) = filters.distance_from_zipcode else {
    return true;
  };
  if radius <= 0.0 {
    return true;
  }

  let distance = distance_km(offer.city_info.latitude, offer.city_info.longitude, latitude, longitude);
  distance <= radius
}
