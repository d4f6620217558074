//! Business-rule parameters: cutoffs, overtime thresholds, bonus settings.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::ConfigRecord;
use crate::utils::date::parse_weekday;
use crate::utils::time::{parse_hhmm, parse_utc_offset};
use chrono::{FixedOffset, NaiveTime, Offset, Utc, Weekday};

#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub utc_offset: FixedOffset,
    /// Cutoff on regular days unless `_config.checkin_limit` overrides it.
    pub default_checkin_limit: NaiveTime,
    /// The mid-week short day has its own fixed cutoff and overtime start.
    pub short_day: Weekday,
    pub short_day_checkin_limit: NaiveTime,
    pub overtime_start: NaiveTime,
    pub short_day_overtime_start: NaiveTime,
    /// How many of the earliest arrivals earn the early-bird point.
    pub early_bird_winners: usize,
    /// Team bonus deadline; `None` disables the team bonus.
    pub team_bonus_deadline: Option<NaiveTime>,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(3 * 3600 + 30 * 60).unwrap_or_else(|| Utc.fix()),
            default_checkin_limit: hm(8, 31),
            short_day: Weekday::Thu,
            short_day_checkin_limit: hm(9, 30),
            overtime_start: hm(18, 0),
            short_day_overtime_start: hm(14, 30),
            early_bird_winners: 4,
            team_bonus_deadline: None,
        }
    }
}

impl Policy {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        if cfg.early_bird_winners == 0 {
            return Err(AppError::Config(
                "early_bird_winners must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            utc_offset: parse_utc_offset(&cfg.utc_offset)?,
            default_checkin_limit: parse_hhmm(&cfg.checkin_limit)?,
            short_day: parse_weekday(&cfg.short_day)?,
            short_day_checkin_limit: parse_hhmm(&cfg.short_day_checkin_limit)?,
            overtime_start: parse_hhmm(&cfg.overtime_start)?,
            short_day_overtime_start: parse_hhmm(&cfg.short_day_overtime_start)?,
            early_bird_winners: cfg.early_bird_winners,
            team_bonus_deadline: if cfg.team_bonus {
                Some(parse_hhmm(&cfg.team_bonus_deadline)?)
            } else {
                None
            },
        })
    }

    /// Regular-day cutoff after applying the runtime override.
    pub fn effective_limit(&self, record: &ConfigRecord) -> NaiveTime {
        record.checkin_limit.unwrap_or(self.default_checkin_limit)
    }

    /// Lateness cutoff for a given weekday.
    pub fn cutoff_for(&self, weekday: Weekday, record: &ConfigRecord) -> NaiveTime {
        if weekday == self.short_day {
            self.short_day_checkin_limit
        } else {
            self.effective_limit(record)
        }
    }

    pub fn overtime_start_for(&self, weekday: Weekday) -> NaiveTime {
        if weekday == self.short_day {
            self.short_day_overtime_start
        } else {
            self.overtime_start
        }
    }
}
