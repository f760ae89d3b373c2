// Career Forecast Schema - job market outlook per role and industry

use crate::ent_framework::ent_schema::{
    EntSchema, FieldDefault, FieldDefinition, FieldType, FieldValidator, IndexDefinition,
    TextIndexDefinition,
};

pub const DEMAND_LEVELS: &[&str] = &["very-low", "low", "medium", "high", "very-high"];
pub const TRENDS: &[&str] = &["declining", "stable", "growing", "rapidly-growing"];

pub struct CareerForecastSchema;

impl EntSchema for CareerForecastSchema {
    fn collection() -> &'static str {
        "career_forecasts"
    }

    fn fields() -> Vec<FieldDefinition> {
        let mut fields = vec![
            FieldDefinition::new("jobTitle", FieldType::String)
                .validate(FieldValidator::MaxLength(200)),
            FieldDefinition::new("industry", FieldType::String),
            FieldDefinition::new("location", FieldType::String)
                .default_value(FieldDefault::string("Global")),
            FieldDefinition::new("description", FieldType::String)
                .optional()
                .validate(FieldValidator::MaxLength(2000)),
            FieldDefinition::new("requiredSkills", FieldType::StringList)
                .default_value(FieldDefault::EmptyList),
            FieldDefinition::new(
                "educationLevel",
                FieldType::enumeration(&["high-school", "diploma", "bachelor", "master", "phd"]),
            )
            .default_value(FieldDefault::string("bachelor")),
            FieldDefinition::new("salaryRange.min", FieldType::Float)
                .optional()
                .validate(FieldValidator::Range(0.0, f64::MAX)),
            FieldDefinition::new("salaryRange.max", FieldType::Float)
                .optional()
                .validate(FieldValidator::Range(0.0, f64::MAX)),
            FieldDefinition::new("salaryRange.currency", FieldType::String)
                .default_value(FieldDefault::string("USD")),
            // Forecast
            FieldDefinition::new("forecast.growth", FieldType::Float)
                .validate(FieldValidator::Range(-100.0, 1000.0)),
            FieldDefinition::new("forecast.confidence", FieldType::Float)
                .validate(FieldValidator::Range(0.0, 100.0)),
            FieldDefinition::new("forecast.demand", FieldType::enumeration(DEMAND_LEVELS))
                .default_value(FieldDefault::string("medium")),
            FieldDefinition::new("forecast.trend", FieldType::enumeration(TRENDS))
                .default_value(FieldDefault::string("stable")),
            FieldDefinition::new(
                "forecast.timeframe",
                FieldType::enumeration(&["1-year", "3-year", "5-year"]),
            )
            .default_value(FieldDefault::string("1-year")),
            FieldDefinition::new("dataSource", FieldType::String)
                .default_value(FieldDefault::string("internal")),
            FieldDefinition::new("isActive", FieldType::Bool)
                .default_value(FieldDefault::Bool(true)),
        ];
        fields.extend(super::timestamp_fields());
        fields
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![
            IndexDefinition::new("active_growth", vec!["isActive", "forecast.growth"]),
            IndexDefinition::new("demand", vec!["forecast.demand"]),
            IndexDefinition::new("confidence", vec!["forecast.confidence"]),
        ]
    }

    fn text_index() -> Option<TextIndexDefinition> {
        Some(TextIndexDefinition::new(&[
            ("jobTitle", 10),
            ("industry", 5),
            ("requiredSkills", 3),
            ("description", 1),
        ]))
    }
}
