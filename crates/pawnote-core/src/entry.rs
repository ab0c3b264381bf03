//! Diary entry model.

use crate::frame::Frame;
use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Date format used for entry keys and listings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mood rating from 1 (hardest day) to 5 (best day), shown as paw prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Clamp any number into a rating. NaN maps to the best day.
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MAX);
        }
        Self(value.round().clamp(f64::from(Self::MIN), f64::from(Self::MAX)) as u8)
    }

    /// Map a legacy emotion name to a rating.
    pub fn from_legacy(name: &str) -> Self {
        match name {
            "happy" => Self(5),
            "sad" | "scared" => Self(2),
            "angry" => Self(1),
            "calm" | "neutral" => Self(3),
            _ => Self(Self::MAX),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Paw prints, one per rating point.
    pub fn paws(self) -> String {
        "🐾".repeat(usize::from(self.0))
    }

    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "A very hard day",
            2 => "A little sad",
            3 => "Okay",
            4 => "A good day",
            _ => "The best day",
        }
    }

    /// Paws followed by the description, e.g. `🐾🐾🐾 Okay`.
    pub fn label(self) -> String {
        format!("{} {}", self.paws(), self.description())
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Mood::from_number(n),
            Raw::Text(s) => Mood::from_legacy(&s),
            Raw::Other(_) => Mood::default(),
        })
    }
}

/// Weather tag of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

impl Weather {
    pub const ALL: [Weather; 5] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rainy,
        Weather::Snowy,
        Weather::Stormy,
    ];

    /// Parse a stored value. Unknown values fall back to sunny.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "cloudy" => Weather::Cloudy,
            "rainy" => Weather::Rainy,
            "snowy" => Weather::Snowy,
            "stormy" => Weather::Stormy,
            _ => Weather::Sunny,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rainy => "rainy",
            Weather::Snowy => "snowy",
            Weather::Stormy => "stormy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Sunny => "☀️ Sunny",
            Weather::Cloudy => "⛅ Cloudy",
            Weather::Rainy => "🌧️ Rainy",
            Weather::Snowy => "❄️ Snowy",
            Weather::Stormy => "⛈️ Stormy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Weather {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Weather::parse).unwrap_or_default())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One diary entry. The date is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(rename = "emotion", default)]
    pub mood: Mood,
    #[serde(default)]
    pub weather: Weather,
    /// Flattened drawing, `None` when nothing was drawn.
    #[serde(rename = "imageData", default)]
    pub frame: Option<Frame>,
}

impl DiaryEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            content: String::new(),
            mood: Mood::default(),
            weather: Weather::default(),
            frame: None,
        }
    }

    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// The first 20 characters of the content, or a placeholder.
    pub fn preview(&self) -> String {
        let preview: String = self.content.chars().take(20).collect();
        if preview.is_empty() {
            "(no content)".to_string()
        } else {
            preview
        }
    }

    /// Case-insensitive keyword match over content, date, mood and weather labels.
    ///
    /// An empty keyword matches everything.
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }
        let text = format!(
            "{} {} {} {}",
            self.content,
            self.date_text(),
            self.mood.label(),
            self.weather.label()
        );
        text.to_lowercase().contains(&keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_mood_from_numbers() {
        assert_eq!(Mood::from_number(3.4).value(), 3);
        assert_eq!(Mood::from_number(0.0).value(), 1);
        assert_eq!(Mood::from_number(9.0).value(), 5);
        assert_eq!(Mood::from_number(f64::NAN).value(), 5);
    }

    #[test]
    fn test_mood_from_legacy_strings() {
        let cases = [
            ("happy", 5),
            ("sad", 2),
            ("angry", 1),
            ("scared", 2),
            ("calm", 3),
            ("neutral", 3),
            ("sleepy", 5),
        ];
        for (name, expected) in cases {
            assert_eq!(Mood::from_legacy(name).value(), expected, "{name}");
        }
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{"date":"2024-03-05","content":null,"emotion":"sad","weather":"foggy","imageData":null}"#;
        let entry: DiaryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, date("2024-03-05"));
        assert_eq!(entry.content, "");
        assert_eq!(entry.mood.value(), 2);
        assert_eq!(entry.weather, Weather::Sunny);
        assert!(entry.frame.is_none());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let entry: DiaryEntry = serde_json::from_str(r#"{"date":"2024-01-01"}"#).unwrap();
        assert_eq!(entry.mood, Mood::default());
        assert_eq!(entry.weather, Weather::Sunny);
    }

    #[test]
    fn test_serialize_field_names() {
        let mut entry = DiaryEntry::new(date("2024-07-01"));
        entry.mood = Mood::from_number(4.0);
        entry.weather = Weather::Rainy;
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["date"], "2024-07-01");
        assert_eq!(value["emotion"], 4);
        assert_eq!(value["weather"], "rainy");
        assert!(value["imageData"].is_null());
    }

    #[test]
    fn test_matches_keyword() {
        let mut entry = DiaryEntry::new(date("2024-07-01"));
        entry.content = "Went to the Park".to_string();
        entry.weather = Weather::Snowy;
        assert!(entry.matches("park"));
        assert!(entry.matches("2024-07"));
        assert!(entry.matches("snowy"));
        assert!(entry.matches("best day"));
        assert!(entry.matches("  "));
        assert!(!entry.matches("beach"));
    }

    #[test]
    fn test_preview() {
        let mut entry = DiaryEntry::new(date("2024-07-01"));
        assert_eq!(entry.preview(), "(no content)");
        entry.content = "abcdefghijklmnopqrstuvwxyz".to_string();
        assert_eq!(entry.preview(), "abcdefghijklmnopqrst");
    }
}
