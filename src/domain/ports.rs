use crate::domain::model::{Coordinates, ReportSection};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 地名 → 座標。查無結果、逾時、服務不可用都回傳 `None`
pub trait PlaceResolver: Send + Sync {
    fn resolve(&self, place: &str) -> impl std::future::Future<Output = Option<Coordinates>> + Send;
}

#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Receives report sections as soon as each one is computed.
pub trait ReportSink {
    fn emit(&mut self, section: &ReportSection) -> Result<()>;
}
