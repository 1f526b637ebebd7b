// config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_host = env::var("DB_HOST").expect("DB_HOST must be set");
        let db_port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
        let db_user = env::var("DB_USER").expect("DB_USER must be set");
        let db_password = env::var("DB_PASSWORD").expect("DB_PASSWORD must be set");
        let db_name = env::var("DB_NAME").expect("DB_NAME must be set");

        let redis_addr = env::var("REDIS_ADDR").expect("REDIS_ADDR must be set");
        let redis_password = env::var("REDIS_PASSWORD").unwrap_or_default();
        let redis_db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let database_url = format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            db_user, db_password, db_host, db_port, db_name
        );
        let redis_url = if redis_password.is_empty() {
            format!("redis://{}/{}", redis_addr, redis_db)
        } else {
            format!("redis://:{}@{}/{}", redis_password, redis_addr, redis_db)
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        AppConfig {
            database_url,
            redis_url,
            port,
        }
    }
}
