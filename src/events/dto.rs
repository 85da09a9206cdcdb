use super::model::{parse_event_date, Event};
use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

// Note: optional links come back as null or "" depending on who entered the row
#[derive(Debug, Deserialize)]
pub struct EventResponse {
    #[serde(deserialize_with = "deserialize_str")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_str")]
    pub venue: String,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub venue_link: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_str")]
    pub link: Option<String>,
}

impl EventResponse {
    pub fn into_model(self) -> Event {
        Event {
            title: self.title.trim().to_string(),
            date: self.date,
            venue: self.venue.trim().to_string(),
            venue_link: self.venue_link,
            location: self.location,
            image: self.image,
            link: self.link,
        }
    }
}

fn deserialize_str<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn deserialize_optional_str<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn deserialize_date<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::String(s) => Ok(parse_event_date(&s).unwrap_or_else(|| {
            warn!("Failed to parse date '{s}'");
            NaiveDateTime::MIN
        })),
        Value::Null => {
            warn!("Event without date");
            Ok(NaiveDateTime::MIN)
        }
        unknown => Err(de::Error::custom(format!(
            "Found an unknown data type for date: {unknown}"
        ))),
    }
}
