use sea_orm::ConnectionTrait;

use crate::{
  entity::promotion,
  filter::{self, Criteria, FilterMode},
  prelude::*,
  record::PromotionPayload,
};

/// Write and query rules that vary per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
  /// Reject a name already held by another promotion.
  pub unique_names: bool,
  pub filter_mode: FilterMode,
}

pub struct Promotion<'a> {
  db: &'a DatabaseConnection,
  policy: Policy,
}

impl<'a> Promotion<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db, policy: Policy::default() }
  }

  pub fn with_policy(self, policy: Policy) -> Self {
    Self { policy, ..self }
  }

  pub async fn all(&self) -> Result<Vec<promotion::Model>> {
    info!("Processing all Promotions");
    let promotions = promotion::Entity::find()
      .order_by_asc(promotion::Column::Id)
      .all(self.db)
      .await?;
    Ok(promotions)
  }

  pub async fn list(&self, criteria: &Criteria) -> Result<Vec<promotion::Model>> {
    self.list_at(criteria, Utc::now().naive_utc()).await
  }

  /// Like [`Self::list`] with availability judged at `now`.
  pub async fn list_at(
    &self,
    criteria: &Criteria,
    now: DateTime,
  ) -> Result<Vec<promotion::Model>> {
    let Some(condition) = criteria.condition(self.policy.filter_mode, now)
    else {
      return self.all().await;
    };

    info!("Processing filtered query ({:?} mode)", self.policy.filter_mode);
    let promotions = promotion::Entity::find()
      .filter(condition)
      .order_by_asc(promotion::Column::Id)
      .all(self.db)
      .await?;
    Ok(promotions)
  }

  pub async fn find_available(
    &self,
    is_available: bool,
  ) -> Result<Vec<promotion::Model>> {
    self.find_available_at(is_available, Utc::now().naive_utc()).await
  }

  pub async fn find_available_at(
    &self,
    is_available: bool,
    now: DateTime,
  ) -> Result<Vec<promotion::Model>> {
    info!("Processing availability query ({is_available}) at {now}");
    let promotions = promotion::Entity::find()
      .filter(filter::availability(is_available, now))
      .order_by_asc(promotion::Column::Id)
      .all(self.db)
      .await?;
    Ok(promotions)
  }

  pub async fn by_id(&self, id: i32) -> Result<Option<promotion::Model>> {
    debug!("Processing lookup for id {id}");
    Ok(promotion::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn get(&self, id: i32) -> Result<promotion::Model> {
    self.by_id(id).await?.ok_or(Error::NotFound(id.into()))
  }

  pub async fn create(
    &self,
    payload: PromotionPayload,
  ) -> Result<promotion::Model> {
    info!("Creating {}", payload.name);

    let name = payload.name.clone();
    let new = payload.into_new()?;

    let txn = self.db.begin().await?;

    if self.policy.unique_names {
      ensure_name_free(&txn, &name, None).await?;
    }

    let promotion = new.insert(&txn).await?;

    txn.commit().await?;
    Ok(promotion)
  }

  pub async fn update(
    &self,
    id: i32,
    payload: PromotionPayload,
  ) -> Result<promotion::Model> {
    info!("Saving {} (id {id})", payload.name);

    let txn = self.db.begin().await?;

    let current = promotion::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound(id.into()))?;

    if self.policy.unique_names && current.name != payload.name {
      ensure_name_free(&txn, &payload.name, Some(id)).await?;
    }

    let updated = payload.apply(current)?.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
  }

  /// Missing ids are not an error.
  pub async fn delete(&self, id: i32) -> Result<()> {
    let res = promotion::Entity::delete_by_id(id).exec(self.db).await?;

    if res.rows_affected == 0 {
      debug!("Nothing to delete for id {id}");
    } else {
      info!("Deleted promotion {id}");
    }
    Ok(())
  }

  pub async fn activate(&self, id: i32) -> Result<promotion::Model> {
    self.set_active(id, true).await
  }

  pub async fn deactivate(&self, id: i32) -> Result<promotion::Model> {
    self.set_active(id, false).await
  }

  async fn set_active(
    &self,
    id: i32,
    active: bool,
  ) -> Result<promotion::Model> {
    let txn = self.db.begin().await?;

    let promotion = promotion::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound(id.into()))?;

    info!("Setting active={active} on promotion {id}");
    if active && !promotion.is_available_at(Utc::now().naive_utc()) {
      warn!("Promotion {id} is activated outside its date window");
    }

    let updated =
      promotion::ActiveModel { active: Set(active), ..promotion.into() }
        .update(&txn)
        .await?;

    txn.commit().await?;
    Ok(updated)
  }
}

async fn ensure_name_free<C: ConnectionTrait>(
  conn: &C,
  name: &str,
  except: Option<i32>,
) -> Result<()> {
  let mut query =
    promotion::Entity::find().filter(promotion::Column::Name.eq(name));

  if let Some(id) = except {
    query = query.filter(promotion::Column::Id.ne(id));
  }

  if query.one(conn).await?.is_some() {
    warn!("Rejecting duplicate promotion name {name}");
    return Err(Error::Conflict(name.to_owned()));
  }
  Ok(())
}
