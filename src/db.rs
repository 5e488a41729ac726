use chrono::Utc;
use sqlx::Pool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Row;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::postgres::PgRow;
use thiserror::Error;
use tracing::info;
use tracing::instrument;
use tracing::warn;
use uuid::Uuid;

use crate::blobs::BlobStore;
use crate::models::CityInfo;
use crate::models::MAX_OFFER_IMAGES;
use crate::models::OfferDraft;
use crate::models::OfferPatch;
use crate::models::OfferRow;
use crate::models::OfferStatus;
use crate::models::UserRow;
use crate::models::is_known_category;
use crate::search::PageCursor;
use crate::search::Pagination;
use crate::search::SearchFilters;
use crate::search::SearchPage;
use crate::search::filter_page;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const OFFER_COLUMNS: &str = "offer_id, title, title_lower, description, description_lower, category, price, \
                             shipping, status, zip_code, city, latitude, longitude, images, user_id, created_at, \
                             updated_at";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("offer not found")]
  NotFound,
  #[error("you do not have permission to modify this offer")]
  NotOwner,
  #[error("{0}")]
  Validation(String),
  #[error(transparent)]
  Storage(#[from] sqlx::Error),
  #[error(transparent)]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
  pub fn user_message(&self) -> String {
    match self {
      Self::NotFound => "Offer does not exist.".to_string(),
      Self::NotOwner => "You do not have permission to modify this offer.".to_string(),
      Self::Validation(message) => message.clone(),
      Self::Storage(_) | Self::Migrate(_) => "Something went wrong. Please try again.".to_string(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
  Saved,
  Removed,
}

impl SaveOutcome {
  pub fn user_message(&self) -> &'static str {
    match self {
      Self::Saved => "Offer saved",
      Self::Removed => "Offer removed",
    }
  }
}

#[derive(Clone)]
pub struct Db {
  pool: Pool<Postgres>,
}

impl Db {
  pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    MIGRATOR.run(&pool).await?;
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &Pool<Postgres> {
    &self.pool
  }

  #[instrument(skip(self, user))]
  pub async fn create_user_profile(&self, user: &UserRow) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO users (user_id, first_name, last_name, email, phone_number, profile_url, saved_offers, created_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
      ON CONFLICT (user_id) DO UPDATE SET
        first_name = EXCLUDED.first_name,
        last_name = EXCLUDED.last_name,
        email = EXCLUDED.email,
        phone_number = EXCLUDED.phone_number,
        profile_url = EXCLUDED.profile_url
      "#,
    )
    .bind(&user.user_id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.phone_number)
    .bind(&user.profile_url)
    .bind(&user.saved_offers)
    .bind(user.created_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  #[instrument(skip(self))]
  pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRow>, StoreError> {
    let row = sqlx::query(
      r#"
      SELECT user_id, first_name, last_name, email, phone_number, profile_url, saved_offers, created_at
      FROM users
      WHERE user_id = $1
      "#,
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    row.as_ref().map(user_from_row).transpose()
  }

  #[instrument(skip(self, draft))]
  pub async fn create_offer(&self, user_id: &str, draft: OfferDraft) -> Result<OfferRow, StoreError> {
    validate_draft(&draft)?;

    let now = Utc::now();
    let offer = OfferRow {
      offer_id: Uuid::new_v4(),
      title_lower: draft.title.to_lowercase(),
      description_lower: draft.description.to_lowercase(),
      title: draft.title,
      description: draft.description,
      category: draft.category,
      price: draft.price,
      shipping: draft.shipping,
      status: OfferStatus::Active,
      city_info: draft.city_info,
      images: draft.images,
      user_id: user_id.to_string(),
      created_at: now,
      updated_at: now,
    };

    sqlx::query(
      r#"
      INSERT INTO saleoffers (offer_id, title, title_lower, description, description_lower, category, price,
                              shipping, status, zip_code, city, latitude, longitude, images, user_id, created_at,
                              updated_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
      "#,
    )
    .bind(offer.offer_id)
    .bind(&offer.title)
    .bind(&offer.title_lower)
    .bind(&offer.description)
    .bind(&offer.description_lower)
    .bind(&offer.category)
    .bind(offer.price)
    .bind(offer.shipping)
    .bind(offer.status.as_str())
    .bind(offer.city_info.zip_code)
    .bind(&offer.city_info.city)
    .bind(offer.city_info.latitude)
    .bind(offer.city_info.longitude)
    .bind(&offer.images)
    .bind(&offer.user_id)
    .bind(offer.created_at)
    .bind(offer.updated_at)
    .execute(&self.pool)
    .await?;

    info!(offer_id = %offer.offer_id, user_id, "created sale offer");
    Ok(offer)
  }

  #[instrument(skip(self))]
  pub async fn get_offer(&self, offer_id: Uuid) -> Result<Option<OfferRow>, StoreError> {
    let row = sqlx::query(&format!("SELECT {OFFER_COLUMNS} FROM saleoffers WHERE offer_id = $1"))
      .bind(offer_id)
      .fetch_optional(&self.pool)
      .await?;
    row.as_ref().map(offer_from_row).transpose()
  }

  #[instrument(skip(self))]
  pub async fn list_user_offers(&self, user_id: &str, status: OfferStatus) -> Result<Vec<OfferRow>, StoreError> {
    let rows = sqlx::query(&format!(
      "SELECT {OFFER_COLUMNS} FROM saleoffers WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .bind(status.as_str())
    .fetch_all(&self.pool)
    .await?;
    rows.iter().map(offer_from_row).collect()
  }

  /// One page of Active offers: server-side predicates (price range,
  /// categories, shipping) narrow the fetch, then the client-side pass
  /// drops rows the database cannot filter. Results only ever come from
  /// this single fetched page.
  #[instrument(skip(self, filters))]
  pub async fn search_offers(
    &self,
    search_text: &str,
    pagination: &Pagination,
    filters: Option<&SearchFilters>,
  ) -> Result<SearchPage, StoreError> {
    let mut query = search_query(pagination, filters);
    let rows = query.build().fetch_all(&self.pool).await?;
    let fetched = rows.iter().map(offer_from_row).collect::<Result<Vec<_>, _>>()?;

    let next = if fetched.len() as i64 == pagination.limit {
      fetched.last().map(|offer| PageCursor {
        title: offer.title.clone(),
        offer_id: offer.offer_id,
      })
    } else {
      None
    };

    let offers = filter_page(fetched, search_text, filters);
    Ok(SearchPage { offers, next })
  }

  #[instrument(skip(self, patch))]
  pub async fn update_offer(&self, offer_id: Uuid, patch: OfferPatch, user_id: &str) -> Result<(), StoreError> {
    validate_patch(&patch)?;
    let offer = self.get_offer(offer_id).await?.ok_or(StoreError::NotFound)?;
    ensure_owner(&offer, user_id)?;

    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE saleoffers SET updated_at = ");
    query.push_bind(Utc::now());
    if let Some(title) = &patch.title {
      query.push(", title = ").push_bind(title.clone());
      query.push(", title_lower = ").push_bind(title.to_lowercase());
    }
    if let Some(description) = &patch.description {
      query.push(", description = ").push_bind(description.clone());
      query.push(", description_lower = ").push_bind(description.to_lowercase());
    }
    if let Some(category) = &patch.category {
      query.push(", category = ").push_bind(category.clone());
    }
    if let Some(price) = patch.price {
      query.push(", price = ").push_bind(price);
    }
    if let Some(shipping) = patch.shipping {
      query.push(", shipping = ").push_bind(shipping);
    }
    if let Some(city_info) = &patch.city_info {
      query.push(", zip_code = ").push_bind(city_info.zip_code);
      query.push(", city = ").push_bind(city_info.city.clone());
      query.push(", latitude = ").push_bind(city_info.latitude);
      query.push(", longitude = ").push_bind(city_info.longitude);
    }
    query.push(" WHERE offer_id = ").push_bind(offer_id);
    query.build().execute(&self.pool).await?;
    Ok(())
  }

  #[instrument(skip(self))]
  pub async fn update_offer_status(
    &self,
    offer_id: Uuid,
    status: OfferStatus,
    user_id: &str,
  ) -> Result<(), StoreError> {
    let offer = self.get_offer(offer_id).await?.ok_or(StoreError::NotFound)?;
    ensure_owner(&offer, user_id)?;

    sqlx::query("UPDATE saleoffers SET status = $1, updated_at = $2 WHERE offer_id = $3")
      .bind(status.as_str())
      .bind(Utc::now())
      .bind(offer_id)
      .execute(&self.pool)
      .await?;
    info!(%offer_id, status = status.as_str(), "changed offer status");
    Ok(())
  }

  #[instrument(skip(self, images))]
  pub async fn update_offer_images(
    &self,
    offer_id: Uuid,
    images: Vec<String>,
    user_id: &str,
  ) -> Result<(), StoreError> {
    if images.len() > MAX_OFFER_IMAGES {
      return Err(StoreError::Validation(format!(
        "An offer can hold at most {MAX_OFFER_IMAGES} images"
      )));
    }
    let offer = self.get_offer(offer_id).await?.ok_or(StoreError::NotFound)?;
    ensure_owner(&offer, user_id)?;

    sqlx::query("UPDATE saleoffers SET images = $1, updated_at = $2 WHERE offer_id = $3")
      .bind(&images)
      .bind(Utc::now())
      .bind(offer_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  /// Deletes an offer after the ownership check. Image blobs are removed
  /// best-effort first: failures are logged and swallowed, so a partial
  /// failure can leave orphaned blobs behind.
  #[instrument(skip(self, blobs))]
  pub async fn delete_offer(&self, offer_id: Uuid, user_id: &str, blobs: &dyn BlobStore) -> Result<(), StoreError> {
    let offer = self.get_offer(offer_id).await?.ok_or(StoreError::NotFound)?;
    ensure_owner(&offer, user_id)?;

    let deletions = offer.images.iter().map(|url| async move {
      if let Err(error) = blobs.delete_object(url).await {
        warn!(%url, %error, "failed to delete offer image blob");
      }
    });
    futures::future::join_all(deletions).await;

    sqlx::query("DELETE FROM saleoffers WHERE offer_id = $1")
      .bind(offer_id)
      .execute(&self.pool)
      .await?;
    info!(%offer_id, "deleted sale offer");
    Ok(())
  }

  /// Toggles membership of `offer_id` in the user's saved list and writes
  /// the whole list back. Last write wins across concurrent sessions.
  #[instrument(skip(self, saved_offers))]
  pub async fn toggle_saved_offer(
    &self,
    offer_id: Uuid,
    saved_offers: &[Uuid],
    user_id: &str,
  ) -> Result<SaveOutcome, StoreError> {
    let (updated, outcome) = toggle_saved(saved_offers, offer_id);
    sqlx::query("UPDATE users SET saved_offers = $1 WHERE user_id = $2")
      .bind(&updated)
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(outcome)
  }

  /// Resolves a saved list into offer rows, keeping the list's order.
  #[instrument(skip(self, saved_offers))]
  pub async fn get_saved_offers(&self, saved_offers: &[Uuid]) -> Result<Vec<OfferRow>, StoreError> {
    if saved_offers.is_empty() {
      return Ok(Vec::new());
    }
    let rows = sqlx::query(&format!("SELECT {OFFER_COLUMNS} FROM saleoffers WHERE offer_id = ANY($1)"))
      .bind(saved_offers)
      .fetch_all(&self.pool)
      .await?;
    let mut offers = rows.iter().map(offer_from_row).collect::<Result<Vec<_>, _>>()?;
    offers.sort_by_key(|offer| saved_offers.iter().position(|id| *id == offer.offer_id));
    Ok(offers)
  }

  /// Offers the user has messaged about, derived from thread membership.
  /// The user's own offers are excluded.
  #[instrument(skip(self))]
  pub async fn offers_interacted_with(&self, user_id: &str) -> Result<Vec<OfferRow>, StoreError> {
    let rows = sqlx::query(
      r#"
      SELECT DISTINCT ON (o.offer_id)
        o.offer_id, o.title, o.title_lower, o.description, o.description_lower, o.category, o.price,
        o.shipping, o.status, o.zip_code, o.city, o.latitude, o.longitude, o.images, o.user_id, o.created_at,
        o.updated_at
      FROM threads t
      INNER JOIN saleoffers o ON o.offer_id = t.offer_id
      WHERE $1 = ANY(t.participants) AND o.user_id <> $1
      ORDER BY o.offer_id
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    rows.iter().map(offer_from_row).collect()
  }

  #[instrument(skip(self, participants))]
  pub async fn create_thread(&self, offer_id: Uuid, participants: &[String]) -> Result<Uuid, StoreError> {
    let thread_id = Uuid::new_v4();
    sqlx::query("INSERT INTO threads (thread_id, offer_id, participants) VALUES ($1, $2, $3)")
      .bind(thread_id)
      .bind(offer_id)
      .bind(participants)
      .execute(&self.pool)
      .await?;
    Ok(thread_id)
  }
}

/// Builds the server-side half of the search: Active offers ordered by
/// title with keyset pagination, plus the predicates the database can
/// evaluate directly.
fn search_query(pagination: &Pagination, filters: Option<&SearchFilters>) -> QueryBuilder<'static, Postgres> {
  let mut query: QueryBuilder<Postgres> =
    QueryBuilder::new(format!("SELECT {OFFER_COLUMNS} FROM saleoffers WHERE status = "));
  query.push_bind(OfferStatus::Active.as_str());

  if let Some(filters) = filters {
    if let Some(low) = filters.low_price {
      query.push(" AND price >= ").push_bind(low);
    }
    if let Some(high) = filters.high_price {
      query.push(" AND price <= ").push_bind(high);
    }
    let categories = filters.category_list();
    if !categories.is_empty() {
      query.push(" AND category = ANY(").push_bind(categories);
      query.push(")");
    }
    if filters.shippable {
      query.push(" AND shipping = TRUE");
    }
  }

  if let Some(cursor) = &pagination.start_after {
    query.push(" AND (title, offer_id) > (").push_bind(cursor.title.clone());
    query.push(", ").push_bind(cursor.offer_id);
    query.push(")");
  }

  query.push(" ORDER BY title, offer_id LIMIT ").push_bind(pagination.limit);
  query
}

fn ensure_owner(offer: &OfferRow, user_id: &str) -> Result<(), StoreError> {
  if offer.user_id == user_id {
    Ok(())
  } else {
    Err(StoreError::NotOwner)
  }
}

pub fn toggle_saved(saved_offers: &[Uuid], offer_id: Uuid) -> (Vec<Uuid>, SaveOutcome) {
  let mut updated = saved_offers.to_vec();
  if let Some(index) = updated.iter().position(|id| *id == offer_id) {
    updated.remove(index);
    (updated, SaveOutcome::Removed)
  } else {
    updated.push(offer_id);
    (updated, SaveOutcome::Saved)
  }
}

fn validate_draft(draft: &OfferDraft) -> Result<(), StoreError> {
  if draft.title.trim().is_empty() {
    return Err(StoreError::Validation("Title must not be empty".to_string()));
  }
  if draft.description.trim().is_empty() {
    return Err(StoreError::Validation("Description must not be empty".to_string()));
  }
  if !is_known_category(&draft.category) {
    return Err(StoreError::Validation(format!("Unknown category '{}'", draft.category)));
  }
  if draft.price < 0 {
    return Err(StoreError::Validation("Price must not be negative".to_string()));
  }
  validate_city_info(&draft.city_info)?;
  if draft.images.len() > MAX_OFFER_IMAGES {
    return Err(StoreError::Validation(format!(
      "An offer can hold at most {MAX_OFFER_IMAGES} images"
    )));
  }
  Ok(())
}

fn validate_patch(patch: &OfferPatch) -> Result<(), StoreError> {
  if let Some(title) = &patch.title {
    if title.trim().is_empty() {
      return Err(StoreError::Validation("Title must not be empty".to_string()));
    }
  }
  if let Some(description) = &patch.description {
    if description.trim().is_empty() {
      return Err(StoreError::Validation("Description must not be empty".to_string()));
    }
  }
  if let Some(category) = &patch.category {
    if !is_known_category(category) {
      return Err(StoreError::Validation(format!("Unknown category '{category}'")));
    }
  }
  if let Some(price) = patch.price {
    if price < 0 {
      return Err(StoreError::Validation("Price must not be negative".to_string()));
    }
  }
  if let Some(city_info) = &patch.city_info {
    validate_city_info(city_info)?;
  }
  Ok(())
}

fn validate_city_info(city_info: &CityInfo) -> Result<(), StoreError> {
  if !(1000 ..= 9999).contains(&city_info.zip_code) {
    return Err(StoreError::Validation("Zip code must be four digits".to_string()));
  }
  Ok(())
}

fn offer_from_row(row: &PgRow) -> Result<OfferRow, StoreError> {
  let status_raw: String = row.try_get("status")?;
  let status = OfferStatus::parse(&status_raw)
    .ok_or_else(|| StoreError::Validation(format!("unknown offer status '{status_raw}'")))?;
  Ok(OfferRow {
    offer_id: row.try_get("offer_id")?,
    title: row.try_get("title")?,
    title_lower: row.try_get("title_lower")?,
    description: row.try_get("description")?,
    description_lower: row.try_get("description_lower")?,
    category: row.try_get("category")?,
    price: row.try_get("price")?,
    shipping: row.try_get("shipping")?,
    status,
    city_info: CityInfo {
      zip_code: row.try_get("zip_code")?,
      city: row.try_get("city")?,
      latitude: row.try_get("latitude")?,
      longitude: row.try_get("longitude")?,
    },
    images: row.try_get("images")?,
    user_id: row.try_get("user_id")?,
    created_at: row.try_get("created_at")?,
    updated_at: row.try_get("updated_at")?,
  })
}

fn user_from_row(row: &PgRow) -> Result<UserRow, StoreError> {
  Ok(UserRow {
    user_id: row.try_get("user_id")?,
    first_name: row.try_get("first_name")?,
    last_name: row.try_get("last_name")?,
    email: row.try_get("email")?,
    phone_number: row.try_get("phone_number")?,
    profile_url: row.try_get("profile_url")?,
    saved_offers: row.try_get("saved_offers")?,
    created_at: row.try_get("created_at")?,
  })
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::SaveOutcome;
  use super::StoreError;
  use super::ensure_owner;
  use super::search_query;
  use super::toggle_saved;
  use super::validate_draft;
  use super::validate_patch;
  use crate::models::CityInfo;
  use crate::models::OfferDraft;
  use crate::models::OfferPatch;
  use crate::models::OfferRow;
  use crate::models::OfferStatus;
  use crate::search::PageCursor;
  use crate::search::Pagination;
  use crate::search::SearchFilters;

  fn city() -> CityInfo {
    CityInfo {
      zip_code: 8000,
      city: "Aarhus C".to_string(),
      latitude: 56.1629,
      longitude: 10.2039,
    }
  }

  fn draft() -> OfferDraft {
    OfferDraft {
      title: "Road bike".to_string(),
      description: "Shimano groupset, recently serviced".to_string(),
      category: "Sports".to_string(),
      price: 250_000,
      shipping: false,
      city_info: city(),
      images: Vec::new(),
    }
  }

  fn owned_offer(user_id: &str) -> OfferRow {
    let now = Utc::now();
    OfferRow {
      offer_id: Uuid::new_v4(),
      title: "Road bike".to_string(),
      title_lower: "road bike".to_string(),
      description: "desc".to_string(),
      description_lower: "desc".to_string(),
      category: "Sports".to_string(),
      price: 250_000,
      shipping: false,
      status: OfferStatus::Active,
      city_info: city(),
      images: Vec::new(),
      user_id: user_id.to_string(),
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn toggling_twice_restores_the_saved_list() {
    let existing = vec![Uuid::new_v4(), Uuid::new_v4()];
    let offer_id = Uuid::new_v4();

    let (once, outcome) = toggle_saved(&existing, offer_id);
    assert_eq!(outcome, SaveOutcome::Saved);
    assert!(once.contains(&offer_id));

    let (twice, outcome) = toggle_saved(&once, offer_id);
    assert_eq!(outcome, SaveOutcome::Removed);
    assert_eq!(twice, existing);
  }

  #[test]
  fn toggle_removes_from_the_middle_of_the_list() {
    let target = Uuid::new_v4();
    let existing = vec![Uuid::new_v4(), target, Uuid::new_v4()];

    let (updated, outcome) = toggle_saved(&existing, target);
    assert_eq!(outcome, SaveOutcome::Removed);
    assert_eq!(updated.len(), 2);
    assert!(!updated.contains(&target));
  }

  #[test]
  fn ownership_check_rejects_other_users() {
    let offer = owned_offer("owner");
    assert!(ensure_owner(&offer, "owner").is_ok());
    assert!(matches!(ensure_owner(&offer, "intruder"), Err(StoreError::NotOwner)));
  }

  #[test]
  fn draft_validation_reports_the_first_violation() {
    let mut bad = draft();
    bad.title = "  ".to_string();
    bad.category = "Weapons".to_string();
    match validate_draft(&bad) {
      Err(StoreError::Validation(message)) => assert_eq!(message, "Title must not be empty"),
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn draft_validation_rejects_unknown_category_and_image_overflow() {
    let mut bad = draft();
    bad.category = "Weapons".to_string();
    assert!(matches!(validate_draft(&bad), Err(StoreError::Validation(_))));

    let mut overloaded = draft();
    overloaded.images = (0 .. 7).map(|i| format!("https://blobs.test/u1-{i}")).collect();
    match validate_draft(&overloaded) {
      Err(StoreError::Validation(message)) => assert!(message.contains("at most 6")),
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn patch_validation_checks_only_supplied_fields() {
    assert!(validate_patch(&OfferPatch::default()).is_ok());

    let bad_price = OfferPatch {
      price: Some(-1),
      ..OfferPatch::default()
    };
    assert!(matches!(validate_patch(&bad_price), Err(StoreError::Validation(_))));

    let bad_zip = OfferPatch {
      city_info: Some(CityInfo {
        zip_code: 123,
        city: "Nowhere".to_string(),
        latitude: 0.0,
        longitude: 0.0,
      }),
      ..OfferPatch::default()
    };
    assert!(matches!(validate_patch(&bad_zip), Err(StoreError::Validation(_))));
  }

  #[test]
  fn search_query_without_filters_only_restricts_status() {
    let sql = search_query(&Pagination::first_page(10), None).into_sql();
    assert!(sql.contains("WHERE status ="));
    assert!(sql.contains("ORDER BY title, offer_id LIMIT"));
    assert!(!sql.contains("price"));
    assert!(!sql.contains("category = ANY"));
  }

  #[test]
  fn search_query_adds_server_side_predicates() {
    let filters = SearchFilters {
      low_price: Some(10_000),
      high_price: Some(100_000),
      selected_categories: Some("Electronics".to_string()),
      shippable: true,
      ..SearchFilters::default()
    };
    let sql = search_query(&Pagination::first_page(10), Some(&filters)).into_sql();
    assert!(sql.contains("price >="));
    assert!(sql.contains("price <="));
    assert!(sql.contains("category = ANY"));
    assert!(sql.contains("shipping = TRUE"));
  }

  #[test]
  fn search_query_applies_the_forward_cursor() {
    let pagination = Pagination {
      limit: 10,
      start_after: Some(PageCursor {
        title: "Lamp".to_string(),
        offer_id: Uuid::new_v4(),
      }),
    };
    let sql = search_query(&pagination, None).into_sql();
    assert!(sql.contains("(title, offer_id) > ("));
  }

  #[test]
  fn geo_and_text_filters_stay_out_of_the_sql() {
    let filters = SearchFilters {
      location_latitude: Some(55.6761),
      location_longitude: Some(12.5683),
      distance_from_zipcode: Some(25.0),
      ..SearchFilters::default()
    };
    let sql = search_query(&Pagination::first_page(10), Some(&filters)).into_sql();
    assert!(!sql.contains("latitude"));
    assert!(!sql.contains("longitude"));
  }
}
