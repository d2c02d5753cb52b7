//! Redis-backed backlog for deployments with multiple API replicas.

use std::marker::PhantomData;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::QueueResult;
use crate::queue::TaskQueue;

/// FIFO queue on a Redis list: `RPUSH` at the tail, `LPOP` from the head,
/// jobs stored as JSON.
pub struct RedisQueue<J> {
    client: redis::Client,
    key: String,
    _marker: PhantomData<fn() -> J>,
}

impl<J> RedisQueue<J> {
    /// Connect to the given Redis URL, using `key` as the list name.
    pub fn new(redis_url: &str, key: impl Into<String>) -> QueueResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            key: key.into(),
            _marker: PhantomData,
        })
    }
}

#[async_trait]
impl<J> TaskQueue<J> for RedisQueue<J>
where
    J: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn enqueue(&self, job: J) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(&job)?;
        let len: u64 = conn.rpush(&self.key, payload).await?;
        debug!(key = %self.key, backlog = len, "Enqueued job");
        Ok(())
    }

    async fn try_dequeue(&self) -> QueueResult<Option<J>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.lpop(&self.key, None).await?;
        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn len(&self) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.llen(&self.key).await?)
    }
}
