// Redis-backed recency store
//
// Redis keys:
// - {prefix}:{category} - list of template ids, newest first

use super::{RecencyError, RecencyStore, RECENCY_CAPACITY};
use crate::models::Category;
use redis::Commands;
use tracing::{debug, warn};

pub struct RedisRecencyStore {
    redis: redis::Client,
    key_prefix: String,
    /// Optional expiry for each category list (seconds)
    ttl_secs: Option<u64>,
}

impl RedisRecencyStore {
    pub const DEFAULT_KEY_PREFIX: &'static str = "lunch:recent";

    pub fn new(redis: redis::Client) -> Self {
        Self {
            redis,
            key_prefix: Self::DEFAULT_KEY_PREFIX.to_string(),
            ttl_secs: None,
        }
    }

    pub fn open(url: &str) -> Result<Self, RecencyError> {
        Ok(Self::new(redis::Client::open(url)?))
    }

    /// Create with custom key prefix
    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    pub fn with_ttl(mut self, ttl_secs: Option<u64>) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    fn key(&self, category: Category) -> String {
        format!("{}:{}", self.key_prefix, category.as_str())
    }

    fn connection(&self) -> Result<redis::Connection, RecencyError> {
        Ok(self.redis.get_connection()?)
    }

    pub fn try_get(&self, category: Category) -> Result<Vec<u64>, RecencyError> {
        let mut conn = self.connection()?;
        let raw: Vec<String> = conn.lrange(self.key(category), 0, RECENCY_CAPACITY as isize - 1)?;

        // 跳過無法解析的舊資料
        let mut ids: Vec<u64> = Vec::with_capacity(raw.len());
        for value in raw {
            match value.parse::<u64>() {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => debug!(category = %category, value = %value, "Skipping invalid recency entry"),
            }
        }
        Ok(ids)
    }

    pub fn try_add(&self, category: Category, id: u64) -> Result<(), RecencyError> {
        let mut conn = self.connection()?;
        let key = self.key(category);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .lrem(&key, 0, id)
            .ignore()
            .lpush(&key, id)
            .ignore()
            .ltrim(&key, 0, RECENCY_CAPACITY as isize - 1)
            .ignore();
        if let Some(ttl) = self.ttl_secs {
            pipe.expire(&key, ttl as i64).ignore();
        }
        pipe.query::<()>(&mut conn)?;

        debug!(category = %category, template_id = id, "Recorded recent template");
        Ok(())
    }

    pub fn try_clear(&self, category: Category) -> Result<(), RecencyError> {
        let mut conn = self.connection()?;
        let _: () = conn.del(self.key(category))?;
        Ok(())
    }
}

impl RecencyStore for RedisRecencyStore {
    fn get(&self, category: Category) -> Vec<u64> {
        self.try_get(category).unwrap_or_else(|e| {
            warn!(category = %category, error = %e, "Recency lookup failed, treating as empty");
            Vec::new()
        })
    }

    fn add(&self, category: Category, id: u64) {
        if let Err(e) = self.try_add(category, id) {
            warn!(category = %category, template_id = id, error = %e, "Recency update dropped");
        }
    }

    fn clear(&self, category: Category) {
        if let Err(e) = self.try_clear(category) {
            warn!(category = %category, error = %e, "Recency clear failed");
        }
    }
}
