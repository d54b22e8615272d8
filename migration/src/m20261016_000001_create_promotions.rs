use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Promotions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Promotions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Promotions::Name).string_len(63).not_null())
          .col(ColumnDef::new(Promotions::ProductId).integer().not_null())
          .col(ColumnDef::new(Promotions::Type).string_len(63).not_null())
          .col(
            ColumnDef::new(Promotions::Value).integer().not_null().default(0),
          )
          .col(
            ColumnDef::new(Promotions::Active)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Promotions::StartDate).date_time().not_null())
          .col(
            ColumnDef::new(Promotions::ExpirationDate).date_time().not_null(),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Promotions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Promotions {
  Table,
  Id,
  Name,
  ProductId,
  Type,
  Value,
  Active,
  StartDate,
  ExpirationDate,
}
