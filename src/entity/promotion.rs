use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a promotion's `value` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PromotionKind {
  /// Buy one get one; carries no magnitude.
  #[sea_orm(string_value = "BOGO")]
  #[serde(rename = "BOGO")]
  Bogo,
  #[sea_orm(string_value = "PERCENTAGE")]
  #[serde(rename = "PERCENTAGE")]
  Percentage,
  #[sea_orm(string_value = "FIXED")]
  #[serde(rename = "FIXED")]
  Fixed,
}

impl PromotionKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Bogo => "BOGO",
      Self::Percentage => "PERCENTAGE",
      Self::Fixed => "FIXED",
    }
  }

  pub fn has_value(&self) -> bool {
    !matches!(self, Self::Bogo)
  }
}

impl fmt::Display for PromotionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for PromotionKind {
  type Err = UnknownKind;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "BOGO" => Ok(Self::Bogo),
      "PERCENTAGE" => Ok(Self::Percentage),
      "FIXED" => Ok(Self::Fixed),
      other => Err(UnknownKind(other.to_owned())),
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
  pub product_id: i32,
  #[sea_orm(column_name = "type")]
  pub kind: PromotionKind,
  pub value: i32,
  pub active: bool,
  pub start_date: DateTime,
  pub expiration_date: DateTime,
}

impl Model {
  /// Whether `at` falls inside the inclusive `[start_date, expiration_date]`
  /// window. Independent of `active`.
  pub fn is_available_at(&self, at: DateTime) -> bool {
    self.start_date <= at && at <= self.expiration_date
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
