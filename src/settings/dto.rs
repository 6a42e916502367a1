use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use super::repo_types::Settings;
use crate::error::ApiError;

type Patch = Map<String, Value>;

/// Each present section is merged key by key into the stored one.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub home_page_content: Option<Patch>,
    pub social_links: Option<Patch>,
    pub community_stats: Option<Patch>,
    pub announcement_banner: Option<Patch>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.home_page_content.is_none()
            && self.social_links.is_none()
            && self.community_stats.is_none()
            && self.announcement_banner.is_none()
    }

    pub fn apply(&self, settings: &mut Settings) -> Result<(), ApiError> {
        if let Some(patch) = &self.home_page_content {
            settings.home_page_content =
                merge_section(&settings.home_page_content, patch, "homePageContent")?;
        }
        if let Some(patch) = &self.social_links {
            settings.social_links = merge_section(&settings.social_links, patch, "socialLinks")?;
        }
        if let Some(patch) = &self.community_stats {
            settings.community_stats =
                merge_section(&settings.community_stats, patch, "communityStats")?;
        }
        if let Some(patch) = &self.announcement_banner {
            settings.announcement_banner =
                merge_section(&settings.announcement_banner, patch, "announcementBanner")?;
        }
        Ok(())
    }
}

/// Overlays the keys of `patch` on `current`; keys the section does not know are dropped.
fn merge_section<T>(current: &T, patch: &Patch, section: &str) -> Result<T, ApiError>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(current).map_err(anyhow::Error::from)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| ApiError::bad_request(format!("Invalid {section}: {e}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinksRequest {
    pub social_links: Option<Patch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest {
    pub community_stats: Option<Patch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementRequest {
    pub announcement_banner: Option<Patch>,
}

#[derive(Debug, Serialize)]
pub struct ServerTime {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub iso: String,
    pub timezone: &'static str,
}

impl ServerTime {
    pub fn at(now: OffsetDateTime) -> Result<Self, ApiError> {
        let iso = now
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(anyhow::Error::from)?;
        Ok(Self {
            timestamp: (now.unix_timestamp_nanos() / 1_000_000) as i64,
            iso,
            timezone: "Asia/Kolkata",
        })
    }
}
