use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marker the server sends in place of a weather reading it could not fetch.
pub const UNKNOWN: &str = "unknown";

/// Which `/recommend` contract a form speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Prompt only; answered with product cards.
    Products,
    /// Prompt, destination and optional date; answered with trip advice and weather.
    Trip,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Products => "products",
            Variant::Trip => "trip",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, untrimmed form values as read from the view.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub prompt: String,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

impl FormInput {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn trip(prompt: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            location: Some(location.into()),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// JSON body of `POST /recommend`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendRequest {
    Products {
        user_prompt: String,
    },
    Trip {
        user_prompt: String,
        location: String,
        date: Option<NaiveDate>,
    },
}

impl RecommendRequest {
    pub fn variant(&self) -> Variant {
        match self {
            RecommendRequest::Products { .. } => Variant::Products,
            RecommendRequest::Trip { .. } => Variant::Trip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductRecommendation {
    #[serde(default)]
    pub text_recommendations: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A weather reading: a number, or free text such as a condition or the `"unknown"` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
}

impl Measurement {
    pub fn unknown() -> Self {
        Measurement::Text(UNKNOWN.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Measurement::Text(s) if s == UNKNOWN)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measurement::Number(n) => Some(*n),
            Measurement::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: Measurement,
    pub feels_like: Measurement,
    pub conditions: Measurement,
    pub humidity: Measurement,
    pub wind_speed: Measurement,
    pub precipitation: Measurement,
    #[serde(default)]
    pub uv_index: Option<Measurement>,
    #[serde(default)]
    pub is_day: Option<bool>,
}

impl Weather {
    /// All-unknown record, as the server builds it when its weather lookup fails.
    pub fn unknown() -> Self {
        Self {
            temperature: Measurement::unknown(),
            feels_like: Measurement::unknown(),
            conditions: Measurement::unknown(),
            humidity: Measurement::unknown(),
            wind_speed: Measurement::unknown(),
            precipitation: Measurement::unknown(),
            uv_index: Some(Measurement::unknown()),
            is_day: Some(true),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.temperature.is_unknown()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecommendation {
    #[serde(default)]
    pub recommendations: Option<String>,
    pub location: String,
    pub season: String,
    pub weather: Weather,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Products(ProductRecommendation),
    Trip(TripRecommendation),
}

/// Body of a non-success `/recommend` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
