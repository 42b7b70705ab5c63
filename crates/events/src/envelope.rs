use chrono::{Local, NaiveDateTime};
use core_types::RiskScore;
use serde::{Deserialize, Serialize};

/// Wall-clock format used for every envelope timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The scored candidates of a completed run, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub data: Vec<RiskScore>,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub count: usize,
}

/// A run that failed as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

/// The sole observable outcome of a screening run.
///
/// Serialized untagged, so the JSON object carries either `data` and `count`
/// or `error`, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultEnvelope {
    Success(SuccessEnvelope),
    Error(ErrorEnvelope),
}

impl ResultEnvelope {
    pub fn success(data: Vec<RiskScore>, timestamp: NaiveDateTime) -> Self {
        let count = data.len();
        ResultEnvelope::Success(SuccessEnvelope {
            data,
            timestamp,
            count,
        })
    }

    pub fn error(message: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        ResultEnvelope::Error(ErrorEnvelope {
            error: message.into(),
            timestamp,
        })
    }

    /// An error envelope stamped with the current local time.
    pub fn error_now(message: impl Into<String>) -> Self {
        Self::error(message, local_now())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success(_))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            ResultEnvelope::Success(s) => s.timestamp,
            ResultEnvelope::Error(e) => e.timestamp,
        }
    }
}

/// Current local wall-clock time, truncated to whole seconds by the wire format.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use rust_decimal_macros::dec;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_milli_opt(15, 4, 5, 789)
            .unwrap()
    }

    fn score() -> RiskScore {
        RiskScore {
            symbol: "512880".to_string(),
            name: "证券ETF".to_string(),
            last_price: dec!(0.987),
            change_percent: dec!(4.5),
            turnover_amount: dec!(320000),
            sharpe: dec!(1.2345),
        }
    }

    #[test]
    fn success_carries_data_count_and_timestamp_only() {
        let json = serde_json::to_value(ResultEnvelope::success(vec![score()], at())).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(json["count"], 1);
        assert_eq!(json["timestamp"], "2024-06-03 15:04:05");
        assert_eq!(json["data"][0]["symbol"], "512880");
        assert!(object.get("error").is_none());
    }

    #[test]
    fn error_carries_message_and_timestamp_only() {
        let json = serde_json::to_value(ResultEnvelope::error("boom", at())).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["timestamp"], "2024-06-03 15:04:05");
        assert!(object.get("data").is_none());
        assert!(object.get("count").is_none());
    }

    #[test]
    fn envelope_reads_back_into_the_right_form() {
        let text = r#"{"error":"ETF universe snapshot is empty","timestamp":"2024-06-03 15:04:05"}"#;
        let envelope: ResultEnvelope = serde_json::from_str(text).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.timestamp(), at().with_nanosecond(0).unwrap());

        let text = serde_json::to_string(&ResultEnvelope::success(vec![score()], at())).unwrap();
        let envelope: ResultEnvelope = serde_json::from_str(&text).unwrap();
        assert!(envelope.is_success());
    }
}
