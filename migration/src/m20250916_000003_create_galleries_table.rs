use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Galleries::Table)
                .if_not_exists()
                .col(ColumnDef::new(Galleries::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Galleries::TitleId).string().not_null())
                .col(ColumnDef::new(Galleries::TitleEn).string().null())
                .col(ColumnDef::new(Galleries::TitleAr).string().null())
                .col(ColumnDef::new(Galleries::DescriptionId).text().null())
                .col(ColumnDef::new(Galleries::DescriptionEn).text().null())
                .col(ColumnDef::new(Galleries::DescriptionAr).text().null())
                // Path relatif di storage lokal ("gallery/xxx.jpg") atau URL absolut
                .col(ColumnDef::new(Galleries::ImagePath).string().not_null())
                .col(ColumnDef::new(Galleries::LinkUrl).string().null())
                .col(ColumnDef::new(Galleries::SortOrder).integer().not_null().default(0))
                .col(ColumnDef::new(Galleries::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .col(ColumnDef::new(Galleries::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .to_owned(),
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_galleries_sort_order")
                .table(Galleries::Table)
                .col(Galleries::SortOrder)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Galleries::Table).if_exists().to_owned()).await
    }
}

#[derive(Iden)]
enum Galleries {
    Table,
    Id,
    TitleId,
    TitleEn,
    TitleAr,
    DescriptionId,
    DescriptionEn,
    DescriptionAr,
    ImagePath,
    LinkUrl,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
