//! Video resource types sent to and received from `videos.insert`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::YoutubeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    Private,
    Unlisted,
    Public,
}

impl std::fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyStatus::Private => write!(f, "private"),
            PrivacyStatus::Unlisted => write!(f, "unlisted"),
            PrivacyStatus::Public => write!(f, "public"),
        }
    }
}

impl std::str::FromStr for PrivacyStatus {
    type Err = YoutubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(PrivacyStatus::Private),
            "unlisted" => Ok(PrivacyStatus::Unlisted),
            "public" => Ok(PrivacyStatus::Public),
            _ => Err(YoutubeError::InvalidInput(format!(
                "Invalid privacy status: {}",
                s
            ))),
        }
    }
}

/// Request body for `videos.insert` with `part=snippet,status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInsert {
    pub snippet: Snippet,
    pub status: VideoStatus,
}

impl VideoInsert {
    /// The `part` query parameter matching the populated resource parts.
    pub fn parts(&self) -> &'static str {
        "snippet,status"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    /// Extra snippet fields; same-named keys override the typed ones.
    pub extra: Map<String, Value>,
}

impl Snippet {
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert("description".into(), Value::String(self.description.clone()));
        map.insert(
            "tags".into(),
            Value::Array(self.tags.iter().cloned().map(Value::String).collect()),
        );
        map.insert("categoryId".into(), Value::String(self.category_id.clone()));
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

impl Serialize for Snippet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    pub privacy_status: PrivacyStatus,
    pub self_declared_made_for_kids: bool,
    /// Scheduled publish time. The API only honours it on private videos.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_publish_at"
    )]
    pub publish_at: Option<DateTime<Utc>>,
}

/// RFC 3339 with whole seconds and a `Z` suffix
fn serialize_publish_at<S: Serializer>(
    publish_at: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match publish_at {
        Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_none(),
    }
}

/// Video resource returned by a completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: String,
    /// Full response document
    pub raw: Value,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
