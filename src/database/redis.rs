use redis::aio::ConnectionManager;

use crate::errors::Result;
use crate::services::live_log::LiveLog;

pub async fn connect(redis_url: &str) -> Result<LiveLog> {
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    let live = LiveLog::new(manager);
    live.ping().await?;
    tracing::info!("Redis connected");
    Ok(live)
}
