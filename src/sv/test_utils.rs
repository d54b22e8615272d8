//! Shared test utilities for database setup

#[cfg(test)]
pub mod test_db {
  use sea_orm::{Database, DatabaseConnection};

  use crate::prelude::*;

  /// Creates an in-memory SQLite database carrying the migrated schema
  pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
  }
}

#[cfg(test)]
pub mod factory {
  use chrono::NaiveDate;

  use crate::{entity::PromotionKind, prelude::*, record::PromotionPayload};

  pub fn date(y: i32, m: u32, d: u32) -> DateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
  }

  /// Payload spanning 2022-11-10..=2022-11-20, inactive.
  pub fn payload(
    name: &str,
    product_id: i32,
    kind: PromotionKind,
    value: i32,
  ) -> PromotionPayload {
    PromotionPayload {
      name: name.into(),
      product_id,
      kind,
      value: if kind.has_value() { value } else { 0 },
      active: false,
      start: Some(date(2022, 11, 10)),
      end: Some(date(2022, 11, 20)),
    }
  }

  pub fn window(
    mut payload: PromotionPayload,
    start: DateTime,
    end: DateTime,
  ) -> PromotionPayload {
    payload.start = Some(start);
    payload.end = Some(end);
    payload
  }
}
