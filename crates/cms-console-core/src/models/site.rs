use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::content::Media;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    #[serde(default)]
    pub document_id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub vk: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// Single-type site settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: i64,
    pub site_name: String,
    #[serde(default)]
    pub site_description: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub logo: Option<Media>,
    #[serde(default)]
    pub favicon: Option<Media>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub seo_settings: SeoSettings,
}

/// Totals shown on the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_videos: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_comments: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewsPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl ViewsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewsPeriod::Day => "day",
            ViewsPeriod::Week => "week",
            ViewsPeriod::Month => "month",
            ViewsPeriod::Year => "year",
        }
    }
}

impl fmt::Display for ViewsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(ViewsPeriod::Day),
            "week" => Ok(ViewsPeriod::Week),
            "month" => Ok(ViewsPeriod::Month),
            "year" => Ok(ViewsPeriod::Year),
            other => Err(format!("unknown period: {} (expected day, week, month or year)", other)),
        }
    }
}
