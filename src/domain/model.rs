use crate::utils::error::{FortuneError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_BIRTH_YEAR: i32 = 1900;

/// 表單送出的原始欄位，尚未驗證日期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthSubmission {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time: NaiveTime,
    pub place: String,
}

/// Validated birth data. Only exists when the date is a real calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthInput {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub place: String,
}

impl BirthInput {
    pub fn new(year: i32, month: u32, day: u32, time: NaiveTime, place: impl Into<String>) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            FortuneError::validation(
                "birth_date",
                format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
            )
        })?;

        Ok(Self {
            date,
            time,
            place: place.into(),
        })
    }

    /// The birth moment. The time of day is taken as UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }
}

impl TryFrom<&BirthSubmission> for BirthInput {
    type Error = FortuneError;

    fn try_from(submission: &BirthSubmission) -> Result<Self> {
        Self::new(
            submission.year,
            submission.month,
            submission.day,
            submission.time,
            submission.place.clone(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// 首爾市政廳
pub const FALLBACK_COORDINATES: Coordinates = Coordinates::new(37.5665, 126.9780);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceResolution {
    Resolved(Coordinates),
    Fallback(Coordinates),
}

impl PlaceResolution {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Self::Resolved(c) | Self::Fallback(c) => *c,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl FromStr for Locale {
    type Err = FortuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "ko" | "korean" => Ok(Self::Ko),
            other => Err(FortuneError::InvalidConfigValueError {
                field: "locale".to_string(),
                value: other.to_string(),
                reason: "Supported locales: en, ko".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZodiacSign {
    Capricorn,
    Aquarius,
    Pisces,
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Unknown,
}

impl ZodiacSign {
    pub fn name(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Self::Capricorn => "Capricorn",
                Self::Aquarius => "Aquarius",
                Self::Pisces => "Pisces",
                Self::Aries => "Aries",
                Self::Taurus => "Taurus",
                Self::Gemini => "Gemini",
                Self::Cancer => "Cancer",
                Self::Leo => "Leo",
                Self::Virgo => "Virgo",
                Self::Libra => "Libra",
                Self::Scorpio => "Scorpio",
                Self::Sagittarius => "Sagittarius",
                Self::Unknown => "Unknown",
            },
            Locale::Ko => match self {
                Self::Capricorn => "염소자리",
                Self::Aquarius => "물병자리",
                Self::Pisces => "물고기자리",
                Self::Aries => "양자리",
                Self::Taurus => "황소자리",
                Self::Gemini => "쌍둥이자리",
                Self::Cancer => "게자리",
                Self::Leo => "사자자리",
                Self::Virgo => "처녀자리",
                Self::Libra => "천칭자리",
                Self::Scorpio => "전갈자리",
                Self::Sagittarius => "사수자리",
                Self::Unknown => "알 수 없음",
            },
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Locale::En))
    }
}

/// The seven bodies reported for every instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

impl Body {
    pub const ALL: [Body; 7] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
        }
    }

    /// NAIF target code looked up in the SPK kernel.
    /// Jupiter and Saturn use their system barycenters.
    pub const fn naif_target(self) -> i32 {
        match self {
            Self::Sun => 10,
            Self::Moon => 301,
            Self::Mercury => 199,
            Self::Venus => 299,
            Self::Mars => 499,
            Self::Jupiter => 5,
            Self::Saturn => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentPosition {
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

impl fmt::Display for ApparentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA: {:.2}h, Dec: {:.2}°", self.ra_hours, self.dec_degrees)
    }
}

/// Positions of the seven bodies at one instant, in [`Body::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetPositionSet {
    entries: Vec<(Body, ApparentPosition)>,
}

impl PlanetPositionSet {
    pub fn new(entries: Vec<(Body, ApparentPosition)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, body: Body) -> Option<&ApparentPosition> {
        self.entries.iter().find(|(b, _)| *b == body).map(|(_, p)| p)
    }

    /// `RA: 5.58h, Dec: 23.33°` style display string for one body.
    pub fn formatted(&self, body: Body) -> Option<String> {
        self.get(body).map(|p| p.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Body, ApparentPosition)> {
        self.entries.iter()
    }

    pub fn formatted_entries(&self) -> Vec<(&'static str, String)> {
        self.entries
            .iter()
            .map(|(body, position)| (body.key(), position.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FortuneCategory {
    Finance,
    Love,
    Health,
    Career,
}

impl FortuneCategory {
    pub const ALL: [FortuneCategory; 4] = [
        FortuneCategory::Finance,
        FortuneCategory::Love,
        FortuneCategory::Health,
        FortuneCategory::Career,
    ];

    /// Bodies a category's prompt is allowed to mention.
    pub fn bodies(self) -> &'static [Body] {
        match self {
            Self::Finance => &[Body::Jupiter, Body::Venus],
            Self::Love => &[Body::Mars, Body::Venus],
            Self::Health => &[Body::Moon],
            Self::Career => &[Body::Mercury, Body::Jupiter],
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Finance) => "Finance",
            (Locale::En, Self::Love) => "Love",
            (Locale::En, Self::Health) => "Health",
            (Locale::En, Self::Career) => "Career",
            (Locale::Ko, Self::Finance) => "재정 운",
            (Locale::Ko, Self::Love) => "애정 운",
            (Locale::Ko, Self::Health) => "건강 운",
            (Locale::Ko, Self::Career) => "직업 운",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FortuneSet {
    entries: Vec<(FortuneCategory, String)>,
}

impl FortuneSet {
    pub fn new(entries: Vec<(FortuneCategory, String)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, category: FortuneCategory) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, text)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FortuneCategory, String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One rendered block of the report, emitted in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSection {
    Zodiac(ZodiacSign),
    Coordinates(Coordinates),
    FallbackNotice { name: String, coordinates: Coordinates },
    BirthPositions { positions: PlanetPositionSet, fallback: bool },
    CurrentPositions { positions: PlanetPositionSet, fallback: bool },
    BirthFortune { fortune: FortuneSet, fallback: bool },
    CurrentFortune { fortune: FortuneSet, fallback: bool },
    Disclaimer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub zodiac: ZodiacSign,
    pub place: PlaceResolution,
    pub birth_positions: PlanetPositionSet,
    pub current_positions: PlanetPositionSet,
    pub birth_fortune: Option<FortuneSet>,
    pub current_fortune: FortuneSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_birth_input_rejects_impossible_date() {
        let err = BirthInput::new(1990, 2, 30, noon(), "Seoul").unwrap_err();
        assert!(matches!(err, FortuneError::ValidationError { .. }));

        assert!(BirthInput::new(2023, 2, 29, noon(), "Seoul").is_err());
        assert!(BirthInput::new(2024, 2, 29, noon(), "Seoul").is_ok());
    }

    #[test]
    fn test_birth_instant_is_utc() {
        let input = BirthInput::new(1990, 6, 15, noon(), "Seoul").unwrap();
        assert_eq!(input.instant().to_rfc3339(), "1990-06-15T12:00:00+00:00");
    }

    #[test]
    fn test_position_formatting() {
        let position = ApparentPosition {
            ra_hours: 5.5849,
            dec_degrees: -23.3333,
        };
        assert_eq!(position.to_string(), "RA: 5.58h, Dec: -23.33°");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("ko".parse::<Locale>().unwrap(), Locale::Ko);
        assert_eq!("English".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_category_bodies() {
        assert_eq!(FortuneCategory::Finance.bodies(), &[Body::Jupiter, Body::Venus]);
        assert_eq!(FortuneCategory::Health.bodies(), &[Body::Moon]);
        assert_eq!(ZodiacSign::Gemini.name(Locale::Ko), "쌍둥이자리");
    }
}
