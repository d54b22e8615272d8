//! Wire representation of a promotion and the validation guarding writes.
//!
//! Clients exchange flat JSON objects:
//! `{id, name, product_id, type, value, active, start, end}`. Outgoing records
//! are plain serde structs. Incoming ones are checked field by field so that a
//! rejection names exactly what was wrong with the body.

use json::{Map, Value};
use sea_orm::ActiveValue::NotSet;
use serde::Serialize;

use crate::{
  entity::{PromotionKind, promotion},
  prelude::*,
  utils,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct PromotionRecord {
  pub id: Option<i32>,
  pub name: String,
  pub product_id: i32,
  #[serde(rename = "type")]
  pub kind: PromotionKind,
  pub value: i32,
  pub active: bool,
  pub start: DateTime,
  pub end: DateTime,
}

impl From<promotion::Model> for PromotionRecord {
  fn from(model: promotion::Model) -> Self {
    Self {
      id: Some(model.id),
      name: model.name,
      product_id: model.product_id,
      kind: model.kind,
      value: model.value,
      active: model.active,
      start: model.start_date,
      end: model.expiration_date,
    }
  }
}

/// A validated write request.
///
/// Dates stay optional here: creation demands both, an update keeps whichever
/// stored date the body leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionPayload {
  pub name: String,
  pub product_id: i32,
  pub kind: PromotionKind,
  pub value: i32,
  pub active: bool,
  pub start: Option<DateTime>,
  pub end: Option<DateTime>,
}

/// Width of the `name` column.
pub const NAME_MAX_LEN: usize = 63;

const START_KEYS: [&str; 2] = ["start", "start_date"];
const END_KEYS: [&str; 2] = ["end", "expiration_date"];

impl PromotionPayload {
  pub fn from_json(body: &Value) -> Result<Self, Validation> {
    let map = body.as_object().ok_or(Validation::MalformedPayload)?;

    let product_id = int_field(map, "product_id")?;

    let name = required(map, "name")?
      .as_str()
      .ok_or(Validation::InvalidType { field: "name", expected: "a string" })?
      .to_owned();
    if name.chars().count() > NAME_MAX_LEN {
      return Err(Validation::InvalidValue {
        field: "name",
        reason: format!("is longer than {NAME_MAX_LEN} characters"),
      });
    }

    let kind = required(map, "type")?
      .as_str()
      .and_then(|name| name.parse::<PromotionKind>().ok())
      .ok_or(Validation::InvalidType {
        field: "type",
        expected: "one of BOGO, PERCENTAGE, FIXED",
      })?;

    // BOGO has no magnitude: the key must be there, its content is dropped.
    let value = if kind.has_value() {
      let value = int_field(map, "value")?;
      if value <= 0 {
        return Err(Validation::InvalidValue {
          field: "value",
          reason: format!("must be positive for {kind}"),
        });
      }
      value
    } else {
      required(map, "value")?;
      0
    };

    let active = required(map, "active")?.as_bool().ok_or(
      Validation::InvalidType { field: "active", expected: "a boolean" },
    )?;

    let start = date_field(map, "start", &START_KEYS)?;
    let end = date_field(map, "end", &END_KEYS)?;

    if let (Some(start), Some(end)) = (start, end) {
      check_window(start, end)?;
    }

    Ok(Self { name, product_id, kind, value, active, start, end })
  }

  /// Builds a fresh row. The id is left for the store to assign.
  pub fn into_new(self) -> Result<promotion::ActiveModel, Validation> {
    let start = self.start.ok_or(Validation::MissingField("start"))?;
    let end = self.end.ok_or(Validation::MissingField("end"))?;
    check_window(start, end)?;

    Ok(promotion::ActiveModel {
      id: NotSet,
      name: Set(self.name),
      product_id: Set(self.product_id),
      kind: Set(self.kind),
      value: Set(self.value),
      active: Set(self.active),
      start_date: Set(start),
      expiration_date: Set(end),
    })
  }

  /// Overwrites `current` with this payload, keeping its id.
  pub fn apply(
    self,
    current: promotion::Model,
  ) -> Result<promotion::ActiveModel, Validation> {
    let start = self.start.unwrap_or(current.start_date);
    let end = self.end.unwrap_or(current.expiration_date);
    check_window(start, end)?;

    Ok(promotion::ActiveModel {
      name: Set(self.name),
      product_id: Set(self.product_id),
      kind: Set(self.kind),
      value: Set(self.value),
      active: Set(self.active),
      start_date: Set(start),
      expiration_date: Set(end),
      ..current.into()
    })
  }
}

pub fn check_window(start: DateTime, end: DateTime) -> Result<(), Validation> {
  if start > end {
    return Err(Validation::InvalidValue {
      field: "start",
      reason: format!("{start} is after end {end}"),
    });
  }
  Ok(())
}

fn required<'a>(
  map: &'a Map<String, Value>,
  key: &'static str,
) -> Result<&'a Value, Validation> {
  map.get(key).ok_or(Validation::MissingField(key))
}

fn int_field(
  map: &Map<String, Value>,
  key: &'static str,
) -> Result<i32, Validation> {
  required(map, key)?
    .as_i64()
    .and_then(|value| i32::try_from(value).ok())
    .ok_or(Validation::InvalidType { field: key, expected: "an integer" })
}

fn date_field(
  map: &Map<String, Value>,
  field: &'static str,
  keys: &[&str],
) -> Result<Option<DateTime>, Validation> {
  let Some(raw) = keys.iter().find_map(|key| map.get(*key)) else {
    return Ok(None);
  };

  match raw {
    Value::Null => Ok(None),
    Value::String(text) => utils::parse_date(text)
      .map(Some)
      .ok_or(Validation::InvalidType { field, expected: "a date" }),
    _ => Err(Validation::InvalidType { field, expected: "a date string" }),
  }
}
