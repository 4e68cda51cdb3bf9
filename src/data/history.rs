use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

use crate::data::identity::IdentityResolver;
use crate::data::types::{MessageHistoryEntry, User};

/// Supplies the message history shown next to a change.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn entries(
        &self,
        proposer: &User,
        identities: &dyn IdentityResolver,
    ) -> Result<Vec<MessageHistoryEntry>>;
}

/// The fixed review conversation used until the contract records messages.
pub struct PlaceholderHistory;

fn at(year: i32, month: u32, day: u32, hour: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| eyre!("Invalid date {year}-{month}-{day} {hour}:00"))
}

#[async_trait]
impl HistorySource for PlaceholderHistory {
    async fn entries(
        &self,
        proposer: &User,
        identities: &dyn IdentityResolver,
    ) -> Result<Vec<MessageHistoryEntry>> {
        let reviewer = identities.build("x", "MaximilianV").await?;
        let maintainer = identities.build("x", "bptlab").await?;

        Ok(vec![
            MessageHistoryEntry {
                user: proposer.clone(),
                message: "proposed a change to the \"Card Design\" diagram".to_string(),
                timestamp: at(2018, 11, 30, 9)?,
            },
            MessageHistoryEntry {
                user: reviewer,
                message: "approved this change".to_string(),
                timestamp: at(2018, 11, 30, 11)?,
            },
            MessageHistoryEntry {
                user: maintainer,
                message: "approved this change".to_string(),
                timestamp: at(2018, 12, 1, 12)?,
            },
        ])
    }
}

/// One line of a history file.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub name: String,
    pub message: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Attribute this entry to the change's proposer instead of `name`.
    #[serde(default)]
    pub proposer: bool,
}

/// History loaded from a JSON array of [`HistoryRecord`]s.
pub struct JsonHistory {
    path: PathBuf,
}

impl JsonHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(data: &str) -> Result<Vec<HistoryRecord>> {
        let records: Vec<HistoryRecord> =
            serde_json::from_str(data).wrap_err("Invalid history JSON")?;
        Ok(records)
    }
}

/// Resolve the users of `records`, keeping file order.
pub async fn resolve_records(
    records: Vec<HistoryRecord>,
    proposer: &User,
    identities: &dyn IdentityResolver,
) -> Result<Vec<MessageHistoryEntry>> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let user = if record.proposer {
            proposer.clone()
        } else {
            identities.build(&record.public_key, &record.name).await?
        };
        let timestamp = DateTime::from_timestamp(record.timestamp, 0)
            .ok_or_else(|| eyre!("History timestamp {} is out of range", record.timestamp))?;
        entries.push(MessageHistoryEntry {
            user,
            message: record.message,
            timestamp,
        });
    }
    Ok(entries)
}

#[async_trait]
impl HistorySource for JsonHistory {
    async fn entries(
        &self,
        proposer: &User,
        identities: &dyn IdentityResolver,
    ) -> Result<Vec<MessageHistoryEntry>> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .wrap_err_with(|| format!("Failed to read history {}", self.path.display()))?;
        let records = Self::parse(&data)?;
        tracing::debug!(count = records.len(), path = %self.path.display(), "history loaded");
        resolve_records(records, proposer, identities).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::identity::LocalIdentities;
    use chrono::{Datelike, Timelike};

    #[tokio::test]
    async fn test_placeholder_history_order() {
        let proposer = User::new("0x1234", "friedow");
        let entries = PlaceholderHistory
            .entries(&proposer, &LocalIdentities)
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].user, proposer);
        assert_eq!(
            entries[0].message,
            "proposed a change to the \"Card Design\" diagram"
        );
        assert_eq!(entries[1].user, User::new("x", "MaximilianV"));
        assert_eq!(entries[1].message, "approved this change");
        assert_eq!(entries[2].user, User::new("x", "bptlab"));
        assert_eq!(entries[2].message, "approved this change");
    }

    #[tokio::test]
    async fn test_placeholder_history_timestamps() {
        let entries = PlaceholderHistory
            .entries(&User::empty(), &LocalIdentities)
            .await
            .unwrap();

        let first = entries[0].timestamp;
        assert_eq!((first.month(), first.day(), first.hour()), (11, 30, 9));
        let last = entries[2].timestamp;
        assert_eq!((last.month(), last.day(), last.hour()), (12, 1, 12));
        assert!(entries.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[tokio::test]
    async fn test_json_records_resolve_proposer() {
        let json = r#"[
            {"proposer": true, "message": "proposed a change", "timestamp": 1543568400},
            {"public_key": "0xbeef", "name": "MaximilianV", "message": "looks good", "timestamp": 1543575600}
        ]"#;
        let records = JsonHistory::parse(json).unwrap();
        let proposer = User::new("0x1234", "friedow");
        let entries = resolve_records(records, &proposer, &LocalIdentities)
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user, proposer);
        assert_eq!(entries[1].user, User::new("0xbeef", "MaximilianV"));
        assert_eq!(entries[1].timestamp.timestamp(), 1543575600);
    }

    #[test]
    fn test_json_history_requires_message() {
        let json = r#"[{"name": "bptlab", "timestamp": 0}]"#;
        assert!(JsonHistory::parse(json).is_err());
    }

    #[tokio::test]
    async fn test_json_history_missing_file() {
        let source = JsonHistory::new("/nonexistent/history.json");
        let result = source.entries(&User::empty(), &LocalIdentities).await;
        assert!(result.is_err());
    }
}
