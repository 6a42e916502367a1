use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

pub const GLOBAL_KEY: &str = "global";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_mission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_vision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityStats {
    #[serde(default)]
    pub members: i64,
    #[serde(default)]
    pub events: i64,
    #[serde(default)]
    pub workshops: i64,
    #[serde(default)]
    pub projects: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementBanner {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_button_link: Option<String>,
}

fn default_background() -> String {
    "#10B981".into()
}

fn default_text_color() -> String {
    "#FFFFFF".into()
}

impl Default for AnnouncementBanner {
    fn default() -> Self {
        Self {
            is_active: false,
            text: None,
            background_color: default_background(),
            text_color: default_text_color(),
            action_button_text: None,
            action_button_link: None,
        }
    }
}

/// The single site-wide settings record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub key: String,
    pub home_page_content: HomePageContent,
    pub social_links: SocialLinks,
    pub community_stats: CommunityStats,
    pub announcement_banner: AnnouncementBanner,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Settings {
    /// Content written the first time the settings are read.
    pub fn initial(now: OffsetDateTime) -> Self {
        Self {
            key: GLOBAL_KEY.into(),
            home_page_content: HomePageContent {
                hero_tagline: Some("Build. Learn. Connect.".into()),
                hero_subtitle: Some(
                    "Join the premier coding community at Jamia Millia Islamia".into(),
                ),
                ..Default::default()
            },
            social_links: SocialLinks {
                linkedin: Some("https://www.linkedin.com/company/coding-council/".into()),
                instagram: Some("https://www.instagram.com/codingcounciljmi".into()),
                github: Some("https://github.com/codingcounciljmi/".into()),
                email: Some("coding.council.jmi@gmail.com".into()),
                whatsapp: Some("https://chat.whatsapp.com/IKPUGagDzlQ5SRLbWGbVyY".into()),
                ..Default::default()
            },
            community_stats: CommunityStats {
                members: 500,
                events: 25,
                workshops: 40,
                projects: 75,
            },
            announcement_banner: AnnouncementBanner::default(),
            updated_at: now,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SettingsRow {
    pub key: String,
    pub home_page_content: Json<HomePageContent>,
    pub social_links: Json<SocialLinks>,
    pub community_stats: Json<CommunityStats>,
    pub announcement_banner: Json<AnnouncementBanner>,
    pub updated_at: OffsetDateTime,
}

impl From<SettingsRow> for Settings {
    fn from(r: SettingsRow) -> Self {
        Self {
            key: r.key,
            home_page_content: r.home_page_content.0,
            social_links: r.social_links.0,
            community_stats: r.community_stats.0,
            announcement_banner: r.announcement_banner.0,
            updated_at: r.updated_at,
        }
    }
}
