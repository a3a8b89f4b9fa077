pub use sea_orm_migration::prelude::*;

mod m20250915_000001_create_articles_table;
mod m20250915_185103_create_tags_and_pivot;
mod m20250916_000003_create_galleries_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250915_000001_create_articles_table::Migration),
            Box::new(m20250915_185103_create_tags_and_pivot::Migration),
            Box::new(m20250916_000003_create_galleries_table::Migration),
        ]
    }
}
