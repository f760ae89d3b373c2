// EntCareerForecast - job outlook record with derived demand and trend scores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::DocumentId;
use crate::ent_framework::Entity;
use crate::schemas::CareerForecastSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Demand {
    VeryLow,
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
    #[serde(other)]
    Unrecognized,
}

impl Demand {
    pub fn score(&self) -> u8 {
        match self {
            Demand::VeryLow => 1,
            Demand::Low => 2,
            Demand::Medium => 3,
            Demand::High => 4,
            Demand::VeryHigh => 5,
            Demand::Unrecognized => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trend {
    Declining,
    #[default]
    Stable,
    Growing,
    RapidlyGrowing,
    #[serde(other)]
    Unrecognized,
}

impl Trend {
    pub fn score(&self) -> u8 {
        match self {
            Trend::Declining => 1,
            Trend::Stable => 2,
            Trend::Growing => 3,
            Trend::RapidlyGrowing => 4,
            Trend::Unrecognized => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1-year")]
    OneYear,
    #[serde(rename = "3-year")]
    ThreeYear,
    #[serde(rename = "5-year")]
    FiveYear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationLevel {
    HighSchool,
    Diploma,
    #[default]
    Bachelor,
    Master,
    Phd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Percent growth over the timeframe
    pub growth: f64,
    pub confidence: f64,
    #[serde(default)]
    pub demand: Demand,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default)]
    pub timeframe: Timeframe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerForecast {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub job_title: String,
    pub industry: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub education_level: EducationLevel,
    #[serde(default)]
    pub salary_range: SalaryRange,
    pub forecast: Forecast,
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_location() -> String {
    "Global".to_string()
}

fn default_data_source() -> String {
    "internal".to_string()
}

fn default_active() -> bool {
    true
}

impl Entity for CareerForecast {
    type Schema = CareerForecastSchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}

impl CareerForecast {
    /// very-low 1 through very-high 5; 0 for anything unrecognized
    pub fn demand_score(&self) -> u8 {
        self.forecast.demand.score()
    }

    pub fn trend_score(&self) -> u8 {
        self.forecast.trend.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forecast(demand: &str, trend: &str) -> CareerForecast {
        serde_json::from_value(json!({
            "jobTitle": "Data Engineer",
            "industry": "Technology",
            "forecast": {"growth": 12.5, "confidence": 80, "demand": demand, "trend": trend}
        }))
        .unwrap()
    }

    #[test]
    fn test_scores() {
        assert_eq!(forecast("very-low", "declining").demand_score(), 1);
        assert_eq!(forecast("very-high", "rapidly-growing").demand_score(), 5);
        assert_eq!(forecast("very-high", "rapidly-growing").trend_score(), 4);
        assert_eq!(forecast("medium", "stable").trend_score(), 2);
    }

    #[test]
    fn test_unrecognized_values_score_zero() {
        let f = forecast("extreme", "sideways");
        assert_eq!(f.forecast.demand, Demand::Unrecognized);
        assert_eq!(f.demand_score(), 0);
        assert_eq!(f.trend_score(), 0);
    }

    #[test]
    fn test_defaults() {
        let f = forecast("high", "growing");
        assert_eq!(f.location, "Global");
        assert_eq!(f.salary_range.currency, "USD");
        assert_eq!(f.education_level, EducationLevel::Bachelor);
        assert_eq!(f.forecast.timeframe, Timeframe::OneYear);
        assert!(f.is_active);
    }
}
