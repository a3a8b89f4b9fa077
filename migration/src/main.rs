use sea_orm_migration::prelude::*;

// Jalankan dengan DATABASE_URL dari environment, mis. `cargo run -p migration -- up`
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
