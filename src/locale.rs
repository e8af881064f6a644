//! Every locale-dependent string, button and time zone, keyed by [`Locale`].

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::dispatcher::RequestKind;
use crate::telegram::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Thai,
    Lao,
}

#[derive(Debug)]
pub struct UrlButton {
    pub text: &'static str,
    pub url: &'static str,
}

#[derive(Debug)]
pub struct LocaleStrings {
    pub code: &'static str,
    pub brand: &'static str,
    pub promo_footer: &'static str,
    pub title_today: &'static str,
    pub title_yesterday: &'static str,
    pub no_big_match: &'static str,
    pub fetch_failed: &'static str,
    /// Zone used to print kickoff times.
    pub time_zone: Tz,
    /// Added to the Gregorian year when printing dates (Thai solar calendar).
    pub year_offset: i32,
    pub keyboard: &'static [&'static [UrlButton]],
}

const THAI: LocaleStrings = LocaleStrings {
    code: "th",
    brand: "✨ Mvphero777 ✨",
    promo_footer: "🟢 Mvphero777 ค่าน้ำดีที่สุด มีครบ จบทุกลีก 🏧 ฝาก-ถอน รวดเร็วทันใจ",
    title_today: "🔥 โปรแกรม Big Match วันนี้ 🔥",
    title_yesterday: "✅ ผลบอล Big Match เมื่อคืน ✅",
    no_big_match: "❌ วันนี้ไม่มี Big Match ครับ",
    fetch_failed: "❌ ไม่สามารถดึงข้อมูลได้",
    time_zone: chrono_tz::Asia::Bangkok,
    year_offset: 543,
    keyboard: &[
        &[
            UrlButton {
                text: "🟢 สมัครเลย",
                url: "https://bit.ly/4h50mQV",
            },
            UrlButton {
                text: "📞 ติดต่อแอดมิน",
                url: "https://bit.ly/40Wq98w",
            },
        ],
        &[UrlButton {
            text: "📲 ทางเข้าเว็บ",
            url: "https://bit.ly/4fQ8Dac",
        }],
    ],
};

const LAO: LocaleStrings = LocaleStrings {
    code: "lo",
    brand: "✨ Winlaos168 ✨",
    promo_footer: "🟢 Winlaos168  ✔️ໂປຣລູກຄ້າໃໝ່ 🏧  ຮ້ານເຮົາມີຄົບທຸກຢ່າງທີ່ຕ້ອງການ 📲",
    title_today: "🔥 ໂປຣແກຣມ Big Match ມື້ນີ້ 🔥",
    title_yesterday: "✅ ຜົນ Big Match ມື້ວານ ✅",
    no_big_match: "❌ ມື້ນີ້ບໍ່ມີ Big Match",
    fetch_failed: "❌ ບໍ່ສາມາດດຶງຂໍ້ມູນໄດ້",
    time_zone: chrono_tz::Asia::Vientiane,
    year_offset: 0,
    keyboard: &[
        &[
            UrlButton {
                text: "💬 Fb Messenger",
                url: "https://m.me/262413013632590",
            },
            UrlButton {
                text: "💚 Line",
                url: "https://line.me/ti/p/@winlaos168",
            },
        ],
        &[UrlButton {
            text: "📱 ສະໝັກ",
            url: "https://wa.me/8562076355496",
        }],
    ],
};

impl Locale {
    /// The Lao group is the only Lao-speaking chat; everything else is Thai.
    pub fn for_chat(chat_id: &ChatId, lao_group_id: &ChatId) -> Self {
        if chat_id == lao_group_id {
            Self::Lao
        } else {
            Self::Thai
        }
    }

    pub fn strings(self) -> &'static LocaleStrings {
        match self {
            Self::Thai => &THAI,
            Self::Lao => &LAO,
        }
    }

    pub fn title(self, kind: RequestKind) -> &'static str {
        let strings = self.strings();
        match kind {
            RequestKind::TodayFixtures => strings.title_today,
            RequestKind::YesterdayResults => strings.title_yesterday,
        }
    }

    pub fn format_kickoff(self, kickoff: DateTime<Utc>) -> String {
        kickoff
            .with_timezone(&self.strings().time_zone)
            .format("%H:%M")
            .to_string()
    }

    pub fn format_date(self, date: NaiveDate) -> String {
        format!(
            "{}/{}/{}",
            date.day(),
            date.month(),
            date.year() + self.strings().year_offset
        )
    }

    pub fn keyboard(self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: self
                .strings()
                .keyboard
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton::url(button.text, button.url))
                        .collect()
                })
                .collect(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strings().code)
    }
}
