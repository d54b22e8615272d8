//! List criteria and how they become a store condition.

use std::str::FromStr;

use sea_orm::sea_query::SimpleExpr;

use crate::{
  entity::{PromotionKind, promotion},
  prelude::*,
};

/// How several supplied criteria combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
  /// Only the highest-precedence criterion applies; the rest are ignored.
  #[default]
  First,
  /// Every supplied criterion must hold.
  All,
}

impl FromStr for FilterMode {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "first" => Ok(Self::First),
      "all" => Ok(Self::All),
      other => Err(format!("unknown filter mode `{other}`, use first|all")),
    }
  }
}

/// Optional list filters, declared in precedence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
  pub name: Option<String>,
  pub product_id: Option<i32>,
  pub kind: Option<PromotionKind>,
  pub value: Option<i32>,
  pub active: Option<bool>,
  pub start_date: Option<DateTime>,
  pub expiration_date: Option<DateTime>,
  pub available: Option<bool>,
}

impl Criteria {
  pub fn is_empty(&self) -> bool {
    self == &Self::default()
  }

  /// The availability flag, when it is the only criterion supplied.
  pub fn availability_only(&self) -> Option<bool> {
    let only = Self { available: self.available, ..Default::default() };
    if self == &only { self.available } else { None }
  }

  /// Supplied criteria as `(label, condition)` pairs, highest precedence
  /// first. `now` is only read by the availability criterion.
  pub fn predicates(&self, now: DateTime) -> Vec<(&'static str, Condition)> {
    use promotion::Column;

    let single = |expr: SimpleExpr| Condition::all().add(expr);
    let mut out = Vec::new();

    if let Some(name) = &self.name {
      out.push(("name", single(Column::Name.eq(name.clone()))));
    }
    if let Some(product_id) = self.product_id {
      out.push(("product_id", single(Column::ProductId.eq(product_id))));
    }
    if let Some(kind) = self.kind {
      out.push(("type", single(Column::Kind.eq(kind))));
    }
    if let Some(value) = self.value {
      out.push(("value", single(Column::Value.eq(value))));
    }
    if let Some(active) = self.active {
      out.push(("active", single(Column::Active.eq(active))));
    }
    if let Some(start) = self.start_date {
      out.push(("start_date", single(Column::StartDate.eq(start))));
    }
    if let Some(end) = self.expiration_date {
      out.push(("expiration_date", single(Column::ExpirationDate.eq(end))));
    }
    if let Some(available) = self.available {
      out.push(("available", availability(available, now)));
    }

    out
  }

  /// The condition to run, or `None` when every row matches.
  pub fn condition(&self, mode: FilterMode, now: DateTime) -> Option<Condition> {
    let mut predicates = self.predicates(now).into_iter();

    match mode {
      FilterMode::First => predicates.next().map(|(label, cond)| {
        debug!("Filtering promotions by {label}");
        cond
      }),
      FilterMode::All => {
        let (_, first) = predicates.next()?;
        let all = Condition::all().add(first);
        Some(predicates.fold(all, |acc, (_, cond)| acc.add(cond)))
      }
    }
  }
}

/// Rows whose inclusive `[start_date, expiration_date]` window contains
/// `now`, or the complement when `is_available` is false.
pub fn availability(is_available: bool, now: DateTime) -> Condition {
  use promotion::Column;

  if is_available {
    Condition::all()
      .add(Column::StartDate.lte(now))
      .add(Column::ExpirationDate.gte(now))
  } else {
    Condition::any()
      .add(Column::StartDate.gt(now))
      .add(Column::ExpirationDate.lt(now))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_filter_mode_from_str() {
    assert_eq!("first".parse::<FilterMode>(), Ok(FilterMode::First));
    assert_eq!(" ALL ".parse::<FilterMode>(), Ok(FilterMode::All));
    assert!("any".parse::<FilterMode>().is_err());
    assert_eq!(FilterMode::default(), FilterMode::First);
  }

  #[test]
  fn test_predicates_follow_precedence() {
    let criteria = Criteria {
      available: Some(true),
      value: Some(10),
      name: Some("Promo1".into()),
      kind: Some(PromotionKind::Fixed),
      ..Default::default()
    };

    let labels: Vec<_> = criteria
      .predicates(Utc::now().naive_utc())
      .into_iter()
      .map(|(label, _)| label)
      .collect();

    assert_eq!(labels, ["name", "type", "value", "available"]);
  }

  #[test]
  fn test_empty_criteria_has_no_condition() {
    let criteria = Criteria::default();
    let now = Utc::now().naive_utc();

    assert!(criteria.is_empty());
    assert!(criteria.condition(FilterMode::First, now).is_none());
    assert!(criteria.condition(FilterMode::All, now).is_none());
    assert_eq!(criteria.availability_only(), None);
  }

  #[test]
  fn test_availability_only() {
    let only = Criteria { available: Some(false), ..Default::default() };
    assert_eq!(only.availability_only(), Some(false));

    let mixed = Criteria { value: Some(5), ..only };
    assert_eq!(mixed.availability_only(), None);
  }
}
