use race_persistence_sea_orm::{create_db_pool, create_tables};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let pool = create_db_pool().await;

    create_tables(&pool)
        .await
        .expect("Failed to create races table");

    println!("Created database tables successfully");
}
