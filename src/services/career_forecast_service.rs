// CareerForecastService - ranked and searched views over job forecasts

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    ent_framework::{EntRepository, HookRegistry},
    entities::CareerForecast,
    error::{AppError, AppResult},
    infrastructure::database::{DocQuery, DocumentStore, FieldFilter, SortKey},
};

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Clone)]
pub struct CareerForecastService {
    forecasts: EntRepository<CareerForecast>,
}

impl CareerForecastService {
    pub fn new(store: Arc<dyn DocumentStore>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            forecasts: EntRepository::new(store, hooks),
        }
    }

    pub async fn create(&self, data: Value) -> AppResult<CareerForecast> {
        self.forecasts.gen_create(data).await
    }

    fn active() -> DocQuery {
        DocQuery::new().filter(FieldFilter::eq("isActive", true))
    }

    /// Fastest growing active jobs; ties broken by confidence
    pub async fn get_trending_jobs(&self, limit: Option<usize>) -> AppResult<Vec<CareerForecast>> {
        let query = Self::active()
            .sort(SortKey::desc("forecast.growth"))
            .sort(SortKey::desc("forecast.confidence"))
            .limit(limit.unwrap_or(DEFAULT_LIMIT));
        self.query(&query).await
    }

    pub async fn get_high_demand_jobs(
        &self,
        limit: Option<usize>,
    ) -> AppResult<Vec<CareerForecast>> {
        let query = Self::active()
            .filter(FieldFilter::one_of(
                "forecast.demand",
                vec![Value::from("high"), Value::from("very-high")],
            ))
            .sort(SortKey::desc("forecast.confidence"))
            .limit(limit.unwrap_or(DEFAULT_LIMIT));
        self.query(&query).await
    }

    /// Active jobs matching every equality filter. With a text query only
    /// documents that score on the text index are returned, best first.
    pub async fn search_jobs(
        &self,
        text: Option<&str>,
        filters: &BTreeMap<String, Value>,
    ) -> AppResult<Vec<CareerForecast>> {
        let mut query = Self::active();
        for (path, value) in filters {
            query = query.filter(FieldFilter::eq(path, value.clone()));
        }
        query = query.sort(SortKey::desc("forecast.confidence"));

        if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
            let index = self.forecasts.schema().text_index.clone().ok_or_else(|| {
                AppError::Internal("career_forecasts has no text index".to_string())
            })?;
            query = query.text(text, index);
        }

        self.query(&query).await
    }

    // Every store failure on this read path surfaces as QueryFailed
    async fn query(&self, query: &DocQuery) -> AppResult<Vec<CareerForecast>> {
        self.forecasts.gen_query(query).await.map_err(|e| match e {
            AppError::QueryFailed(_) => e,
            other => AppError::QueryFailed(other.to_string()),
        })
    }
}
