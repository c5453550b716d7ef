use async_lock::OnceCell;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

pub mod entity;
pub mod races;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn create_db_pool() -> DatabaseConnection {
    DB_POOL
        .get_or_init(|| async move {
            let db_url = std::env::var("RACE_DATABASE_URL").expect("RACE_DATABASE_URL must be set");
            let max_connections = std::env::var("RACE_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS);

            connect(&db_url, max_connections)
                .await
                .expect("Failed to connect to database")
        })
        .await
        .clone()
}

pub async fn connect(db_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(max_connections);
    Database::connect(opt).await
}

/// Creates the races table unless it already exists.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());
    let mut race_table = schema.create_table_from_entity(entity::race::Entity);
    race_table.if_not_exists();

    db.execute(&race_table).await?;
    Ok(())
}
