pub mod tag_seeder;

use sea_orm::DatabaseConnection;

pub async fn run_seeders(db: &DatabaseConnection) -> Result<(), String> {
    tag_seeder::seed_tags(db).await?;

    Ok(())
}
