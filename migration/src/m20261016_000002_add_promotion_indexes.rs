use sea_orm_migration::prelude::*;

use super::m20261016_000001_create_promotions::Promotions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // Lookups by product and by name are the common list filters.
    manager
      .create_index(
        Index::create()
          .name("idx_promotions_product_id")
          .table(Promotions::Table)
          .col(Promotions::ProductId)
          .to_owned(),
      )
      .await?;

    // Not unique: name uniqueness is a runtime policy, not a schema rule.
    manager
      .create_index(
        Index::create()
          .name("idx_promotions_name")
          .table(Promotions::Table)
          .col(Promotions::Name)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_index(
        Index::drop()
          .name("idx_promotions_name")
          .table(Promotions::Table)
          .to_owned(),
      )
      .await?;

    manager
      .drop_index(
        Index::drop()
          .name("idx_promotions_product_id")
          .table(Promotions::Table)
          .to_owned(),
      )
      .await
  }
}
