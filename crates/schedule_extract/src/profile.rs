//! Per-team extraction settings.
//!
//! A profile is plain data handed to the extractors at construction time, so
//! tests and `--profile` files can swap venue and marker sets freely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::months::YearMonth;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub id: String,
    pub name: String,
    /// Month page URL with `{year}` and `{month}` placeholders.
    pub schedule_url: String,
    /// Substrings identifying the team's own arenas.
    pub home_venues: Vec<String>,
    /// Arena names looked up verbatim when no venue label is found.
    #[serde(default)]
    pub known_venues: Vec<String>,
    /// Team-name or locale fragments that make a text block worth scanning.
    #[serde(default)]
    pub candidate_markers: Vec<String>,
}

impl TeamProfile {
    pub fn builtin(id: &str) -> Option<TeamProfile> {
        builtin_profiles().into_iter().find(|p| p.id == id)
    }

    pub fn from_json_file(path: &Path) -> Result<TeamProfile> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ScheduleError::InvalidProfile(format!("cannot read {}: {e}", path.display()))
        })?;
        let profile: TeamProfile = serde_json::from_str(&raw)
            .map_err(|e| ScheduleError::InvalidProfile(format!("{}: {e}", path.display())))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ScheduleError::InvalidProfile("empty team id".into()));
        }
        for placeholder in ["{year}", "{month}"] {
            if !self.schedule_url.contains(placeholder) {
                return Err(ScheduleError::InvalidProfile(format!(
                    "schedule_url of {} lacks {placeholder}",
                    self.id
                )));
            }
        }
        Ok(())
    }

    pub fn month_url(&self, ym: YearMonth) -> String {
        self.schedule_url
            .replace("{year}", &ym.year.to_string())
            .replace("{month}", &ym.month.to_string())
    }

    pub fn is_home_venue(&self, venue: &str) -> bool {
        self.home_venues.iter().any(|h| venue.contains(h.as_str()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn builtin_profiles() -> Vec<TeamProfile> {
    vec![
        TeamProfile {
            id: "alvark".into(),
            name: "アルバルク東京".into(),
            schedule_url: "https://www.alvark-tokyo.jp/schedule/?scheduleYear={year}&scheduleMonth={month}".into(),
            home_venues: strings(&["TOYOTA ARENA TOKYO"]),
            known_venues: strings(&[
                "TOYOTA ARENA TOKYO",
                "おおきにアリーナ舞洲",
                "CNAアリーナ",
                "ゼビオアリーナ",
                "IGアリーナ",
            ]),
            candidate_markers: strings(&["アルバルク東京", "東京"]),
        },
        TeamProfile {
            id: "sunrockers".into(),
            name: "サンロッカーズ渋谷".into(),
            schedule_url: "https://www.sunrockers.jp/schedule/?scheduleYear={year}&scheduleMonth={month}".into(),
            home_venues: strings(&["青山学院記念館", "ひがしんアリーナ"]),
            known_venues: strings(&[
                "青山学院記念館",
                "ひがしんアリーナ",
                "国立代々木競技場 第二体育館",
                "横浜BUNTAI",
                "IGアリーナ",
            ]),
            candidate_markers: strings(&["サンロッカーズ"]),
        },
    ]
}
