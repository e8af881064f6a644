use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::card::CardFormat;
use crate::dispatcher::Destination;
use crate::error::AppError;
use crate::telegram::ChatId;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub football_api_key: String,
    pub thai_channel_id: ChatId,
    pub lao_group_id: ChatId,
    pub database_url: String,
    pub port: u16,
    pub football_api_base_url: String,
    pub telegram_api_base_url: String,
    pub football_rate_limit_per_minute: NonZeroU32,
    pub card_format: CardFormat,
    pub broadcast_timezone: Tz,
    pub today_broadcast_at: NaiveTime,
    pub results_broadcast_at: NaiveTime,
    pub font_dir: Option<PathBuf>,
    pub update_poll_timeout_secs: u64,
}

const DEFAULT_DATABASE_URL: &str = "sqlite:bigmatch.db";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FOOTBALL_RATE_LIMIT_PER_MINUTE: u32 = 10;
const DEFAULT_TODAY_BROADCAST_AT: &str = "16:00";
const DEFAULT_RESULTS_BROADCAST_AT: &str = "08:00";
const DEFAULT_UPDATE_POLL_TIMEOUT_SECS: u64 = 30;

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| get(key).ok_or_else(|| AppError::Config(format!("{key} must be set")));

        let bot_token = required("BOT_TOKEN")?;
        let football_api_key = required("FOOTBALL_API_KEY")?;
        let thai_channel_id = ChatId::from(required("THAI_CHANNEL_ID")?);
        let lao_group_id = ChatId::from(required("LAO_GROUP_ID")?);

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let port = get("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let football_api_base_url = get("FOOTBALL_API_BASE_URL")
            .unwrap_or_else(|| crate::football::client::DEFAULT_BASE_URL.into());

        let telegram_api_base_url = get("TELEGRAM_API_BASE_URL")
            .unwrap_or_else(|| crate::telegram::client::DEFAULT_BASE_URL.into());

        let football_rate_limit_per_minute = get("FOOTBALL_RATE_LIMIT_PER_MINUTE")
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_FOOTBALL_RATE_LIMIT_PER_MINUTE).unwrap_or(NonZeroU32::MIN)
            });

        let card_format = match get("CARD_FORMAT") {
            Some(v) => v.parse()?,
            None => CardFormat::default(),
        };

        let broadcast_timezone = match get("BROADCAST_TIMEZONE") {
            Some(v) => v
                .parse::<Tz>()
                .map_err(|_| AppError::Config(format!("unknown BROADCAST_TIMEZONE '{v}'")))?,
            None => chrono_tz::Asia::Bangkok,
        };

        let today_broadcast_at = parse_time(
            "TODAY_BROADCAST_AT",
            &get("TODAY_BROADCAST_AT").unwrap_or_else(|| DEFAULT_TODAY_BROADCAST_AT.into()),
        )?;
        let results_broadcast_at = parse_time(
            "RESULTS_BROADCAST_AT",
            &get("RESULTS_BROADCAST_AT").unwrap_or_else(|| DEFAULT_RESULTS_BROADCAST_AT.into()),
        )?;

        let font_dir = get("FONT_DIR").map(PathBuf::from);

        let update_poll_timeout_secs = get("UPDATE_POLL_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_UPDATE_POLL_TIMEOUT_SECS);

        Ok(Self {
            bot_token,
            football_api_key,
            thai_channel_id,
            lao_group_id,
            database_url,
            port,
            football_api_base_url,
            telegram_api_base_url,
            football_rate_limit_per_minute,
            card_format,
            broadcast_timezone,
            today_broadcast_at,
            results_broadcast_at,
            font_dir,
            update_poll_timeout_secs,
        })
    }

    /// The Thai channel first, then the Lao group.
    pub fn destinations(&self) -> Vec<Destination> {
        vec![
            Destination::new(self.thai_channel_id.clone(), &self.lao_group_id),
            Destination::new(self.lao_group_id.clone(), &self.lao_group_id),
        ]
    }
}

fn parse_time(key: &str, value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Config(format!("{key} must be HH:MM, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::locale::Locale;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("BOT_TOKEN", "123:abc"),
        ("FOOTBALL_API_KEY", "key"),
        ("THAI_CHANNEL_ID", "@thai_channel"),
        ("LAO_GROUP_ID", "-100200"),
    ];

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.database_url, "sqlite:bigmatch.db");
        assert_eq!(config.port, 3000);
        assert_eq!(config.football_api_base_url, "https://v3.football.api-sports.io");
        assert_eq!(config.telegram_api_base_url, "https://api.telegram.org");
        assert_eq!(config.football_rate_limit_per_minute.get(), 10);
        assert_eq!(config.card_format, CardFormat::Text);
        assert_eq!(config.broadcast_timezone, chrono_tz::Asia::Bangkok);
        assert_eq!(config.today_broadcast_at, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(config.results_broadcast_at, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(config.font_dir, None);
        assert_eq!(config.update_poll_timeout_secs, 30);
    }

    #[test]
    fn missing_or_blank_required_key_is_an_error() {
        let res = Config::from_lookup(lookup(&REQUIRED[..3]));
        assert!(matches!(res, Err(AppError::Config(ref m)) if m.contains("LAO_GROUP_ID")));

        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("BOT_TOKEN", "   ");
        let res = Config::from_lookup(lookup(&pairs));
        assert!(matches!(res, Err(AppError::Config(ref m)) if m.contains("BOT_TOKEN")));
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        pairs.push(("FOOTBALL_RATE_LIMIT_PER_MINUTE", "0"));

        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.football_rate_limit_per_minute.get(), 10);
    }

    #[test]
    fn invalid_schedule_settings_are_errors() {
        for (key, value) in [
            ("BROADCAST_TIMEZONE", "Mars/Olympus"),
            ("TODAY_BROADCAST_AT", "4pm"),
            ("CARD_FORMAT", "gif"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, value));

            let res = Config::from_lookup(lookup(&pairs));

            assert!(matches!(res, Err(AppError::Config(_))), "{key} accepted");
        }
    }

    #[test]
    fn overrides_are_honoured() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("CARD_FORMAT", "image"),
            ("BROADCAST_TIMEZONE", "Asia/Vientiane"),
            ("RESULTS_BROADCAST_AT", "07:30"),
            ("FONT_DIR", "/usr/share/fonts/noto"),
        ]);

        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.card_format, CardFormat::Image);
        assert_eq!(config.broadcast_timezone, chrono_tz::Asia::Vientiane);
        assert_eq!(config.results_broadcast_at, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(config.font_dir, Some(PathBuf::from("/usr/share/fonts/noto")));
    }

    #[test]
    fn destinations_are_thai_channel_then_lao_group() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        let destinations = config.destinations();

        assert_eq!(destinations.len(), 2);
        assert_eq!(destinations[0].chat_id.as_str(), "@thai_channel");
        assert_eq!(destinations[0].locale, Locale::Thai);
        assert_eq!(destinations[1].chat_id.as_str(), "-100200");
        assert_eq!(destinations[1].locale, Locale::Lao);
    }
}
