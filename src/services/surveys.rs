use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{survey, Survey as SurveyEntity};
use crate::errors::ServiceError;
use crate::services::reports::date_range_bounds;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitSurveyInput {
    pub email: Option<String>,
    pub comentario: Option<String>,
    pub imagen: Option<String>,
    pub recomendar: bool,
    pub puntuacion: Option<i32>,
}

/// Append-only survey collection. Responses are anonymous unless the
/// respondent volunteers an email.
#[derive(Clone)]
pub struct SurveyService {
    db: Arc<DbPool>,
}

impl SurveyService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn submit(&self, input: SubmitSurveyInput) -> Result<survey::Model, ServiceError> {
        let puntuacion = input.puntuacion.ok_or_else(|| {
            ServiceError::ValidationError("A score is required".to_string())
        })?;
        if !(0..=10).contains(&puntuacion) {
            return Err(ServiceError::ValidationError(
                "Score must be between 0 and 10".to_string(),
            ));
        }

        let survey = survey::ActiveModel {
            email: Set(input.email.filter(|e| !e.trim().is_empty())),
            comentario: Set(input.comentario.filter(|c| !c.trim().is_empty())),
            imagen: Set(input.imagen),
            recomendar: Set(input.recomendar),
            puntuacion: Set(puntuacion),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(survey_id = survey.id, puntuacion, "Survey recorded");
        Ok(survey)
    }

    /// Lists responses, newest first, optionally restricted to an inclusive
    /// submission-date range.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        desde: Option<NaiveDate>,
        hasta: Option<NaiveDate>,
    ) -> Result<Vec<survey::Model>, ServiceError> {
        let (lower, upper) = date_range_bounds(desde, hasta);

        let mut query = SurveyEntity::find();
        if let Some(lower) = lower {
            query = query.filter(survey::Column::CreatedAt.gte(lower));
        }
        if let Some(upper) = upper {
            query = query.filter(survey::Column::CreatedAt.lte(upper));
        }

        let surveys = query
            .order_by_desc(survey::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(surveys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_score_is_rejected() {
        let db = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let service = SurveyService::new(db);

        let result = service.submit(SubmitSurveyInput::default()).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let db = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let service = SurveyService::new(db);

        for score in [-1, 11] {
            let result = service
                .submit(SubmitSurveyInput {
                    puntuacion: Some(score),
                    ..Default::default()
                })
                .await;
            assert!(matches!(result, Err(ServiceError::ValidationError(_))));
        }
    }
}
