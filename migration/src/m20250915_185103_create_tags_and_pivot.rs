use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Tabel Tags
        manager.create_table(
            Table::create()
                .table(Tags::Table)
                .if_not_exists()
                .col(ColumnDef::new(Tags::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Tags::Name).string().not_null())
                .col(ColumnDef::new(Tags::Slug).string().not_null().unique_key())
                .col(ColumnDef::new(Tags::UseCount).integer().not_null().default(0))
                .col(ColumnDef::new(Tags::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .col(ColumnDef::new(Tags::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                .to_owned(),
        ).await?;

        // Cache popularitas, dipakai untuk urutan "tag populer"
        manager.create_index(
            Index::create()
                .name("idx_tags_use_count")
                .table(Tags::Table)
                .col(Tags::UseCount)
                .to_owned(),
        ).await?;

        // 2. Tabel Pivot ArticleTag (Many-to-Many)
        manager.create_table(
            Table::create()
                .table(ArticleTag::Table)
                .if_not_exists()
                .col(ColumnDef::new(ArticleTag::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(ArticleTag::ArticleId).big_integer().not_null())
                .col(ColumnDef::new(ArticleTag::TagId).big_integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_article_tag_article_id")
                        .from(ArticleTag::Table, ArticleTag::ArticleId)
                        .to(Articles::Table, Articles::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_article_tag_tag_id")
                        .from(ArticleTag::Table, ArticleTag::TagId)
                        .to(Tags::Table, Tags::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        manager.create_index(
            Index::create()
                .name("uq_article_tag_article_id_tag_id")
                .table(ArticleTag::Table)
                .col(ArticleTag::ArticleId)
                .col(ArticleTag::TagId)
                .unique()
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Pivot dulu, karena merujuk ke tags
        manager.drop_table(Table::drop().table(ArticleTag::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Tags::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    Slug,
    UseCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ArticleTag {
    Table,
    Id,
    ArticleId,
    TagId,
}

#[derive(Iden)]
enum Articles {
    Table,
    Id,
}
