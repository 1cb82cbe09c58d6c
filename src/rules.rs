//! Static rule tables: keyword lists per category and the TLD → country
//! fallback used when WHOIS does not report a country.
//!
//! These are compiled in on purpose; keyword lists are not configurable at
//! runtime.

use crate::classify::Category;

/// Gambling / casino terms.
pub const GAMBLING_KEYWORDS: &[&str] = &[
    "casino",
    "slot",
    "baccarat",
    "poker",
    "blackjack",
    "bet",
    "keonhacai",
    "odds",
    "cá cược",
    "cờ bạc",
    "bầu cua",
    "tài xỉu",
];

/// Betting-specific football terms. Plain "bóng đá" is news vocabulary and
/// is not listed.
pub const SPORTS_BETTING_KEYWORDS: &[&str] = &["soi kèo", "keo nha cai", "tỷ lệ kèo", "livescore"];

/// Illegal lottery, cracking and adult terms.
pub const PROHIBITED_KEYWORDS: &[&str] = &[
    "lô đề", "xổ số", "crack", "hack", "xxx", "sex", "chịch", "dâm", "lồn",
];

/// Category → keyword list, in tie-break priority order.
pub const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (Category::Gambling, GAMBLING_KEYWORDS),
    (Category::SportsBetting, SPORTS_BETTING_KEYWORDS),
    (Category::Prohibited, PROHIBITED_KEYWORDS),
];

/// Top-level label → country name.
pub const TLD_COUNTRY_TABLE: &[(&str, &str)] = &[
    ("vn", "Vietnam"),
    ("kh", "Cambodia"),
    ("com", "Global"),
    ("org", "Global"),
];

/// Keyword list for one category.
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    KEYWORD_TABLE
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, kws)| *kws)
        .unwrap_or(&[])
}

/// Country for a top-level label (case-insensitive), if the table knows it.
pub fn country_for_tld(tld: &str) -> Option<&'static str> {
    TLD_COUNTRY_TABLE
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(tld))
        .map(|(_, country)| *country)
}
