use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Metadata for a single video as reported by tikwm.
///
/// The lookup endpoint names the identifier `id` and the profile listing names
/// it `video_id`; both deserialize into the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(alias = "video_id")]
    pub id: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub create_time: i64,
    #[serde(rename = "play", default)]
    pub source_url: String,
    #[serde(rename = "hdplay", default)]
    pub hd_source_url: String
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "unique_id", default)]
    pub username: String
}

impl VideoRecord {
    pub fn username(&self) -> &str {
        &self.author.username
    }

    pub fn hd_source(&self) -> Option<&str> {
        non_empty(&self.hd_source_url)
    }

    pub fn sd_source(&self) -> Option<&str> {
        non_empty(&self.source_url)
    }

    /// Canonical page URL for this video, accepted by the lookup endpoint.
    pub fn page_url(&self) -> String {
        video_page_url(self.username(), &self.id)
    }
}

pub fn video_page_url(username: &str, id: &str) -> String {
    format!("https://www.tiktok.com/@{username}/video/{id}")
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

/// One page of a user's feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub cursor: String,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool
}

/// tikwm has returned the cursor both as a string and as a bare number.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("unexpected cursor: {other}")))
    }
}

/// Response wrapper shared by every tikwm endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: serde_json::Value
}

impl Envelope {
    pub fn parse(url: &str, body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|source| Error::InvalidResponse {
            url: url.to_string(),
            source
        })
    }

    /// Checks the application-level status code before decoding the payload,
    /// since failed responses carry no usable `data`.
    pub fn into_data<T: serde::de::DeserializeOwned>(self, url: &str) -> Result<T> {
        if self.code != 0 {
            return Err(Error::Upstream {
                code: self.code,
                message: self.msg
            });
        }

        serde_json::from_value(self.data).map_err(|source| Error::InvalidResponse {
            url: url.to_string(),
            source
        })
    }
}
