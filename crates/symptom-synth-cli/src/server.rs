//! Web form over the prediction service.
//!
//! Predictions are synchronous and run on the blocking pool; the async
//! runtime only handles I/O.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use symptom_synth_core::DatasetRow;
use symptom_synth_predict::classifier::ScaledClassifier;
use symptom_synth_predict::embedder::ModelEmbedder;
use symptom_synth_predict::{
    build_report, render_page, PredictError, PredictResult, PredictionService, Report,
    TrainingMetrics, Translator,
};
use tracing::{error, info};

pub type Service = PredictionService<ModelEmbedder, ScaledClassifier, Box<dyn Translator + Send + Sync>>;

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
    pub rows: Arc<Vec<DatasetRow>>,
    pub metrics: Option<TrainingMetrics>,
}

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub symptoms: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Serving prediction form");
    axum::serve(listener, router(state)).await.context("Server error")
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page("", None, state.metrics.as_ref()))
}

/// Run `build_report` on the blocking pool.
async fn run_report(state: &AppState, input: String) -> PredictResult<Report> {
    let service = Arc::clone(&state.service);
    let rows = Arc::clone(&state.rows);
    match tokio::task::spawn_blocking(move || build_report(&*service, rows.as_slice(), &input)).await {
        Ok(result) => result,
        Err(err) => {
            error!(error = %err, "Prediction task failed");
            Err(PredictError::Classifier(format!("prediction task failed: {}", err)))
        }
    }
}

async fn predict_form(State(state): State<AppState>, Form(form): Form<PredictForm>) -> Html<String> {
    let outcome = run_report(&state, form.symptoms.clone()).await;
    Html(render_page(&form.symptoms, Some(&outcome), state.metrics.as_ref()))
}

async fn predict_json(State(state): State<AppState>, Json(form): Json<PredictForm>) -> Response {
    match run_report(&state, form.symptoms).await {
        Ok(report) => Json(report).into_response(),
        Err(err @ PredictError::InputRejected { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symptom_synth_predict::classifier::{CentroidClassifier, FeatureScaler, LabelEncoder};
    use symptom_synth_predict::{HashingEmbedder, LexiconTranslator};

    fn state() -> AppState {
        let embedder = ModelEmbedder::Hashing(HashingEmbedder::new(4, 1));
        let model = CentroidClassifier::fit(
            &[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]],
            &[0, 1],
            2,
            0.1,
        )
        .unwrap();
        let classifier = ScaledClassifier {
            scaler: FeatureScaler {
                mean: vec![0.0; 4],
                scale: vec![1.0; 4],
            },
            model,
        };
        let translator: Box<dyn Translator + Send + Sync> = Box::new(LexiconTranslator::default());
        let service = PredictionService::new(embedder, classifier, LabelEncoder::fit(["Asthma", "Flu"]), translator)
            .with_top_k(2);

        AppState {
            service: Arc::new(service),
            rows: Arc::new(Vec::new()),
            metrics: None,
        }
    }

    #[tokio::test]
    async fn test_index_has_form() {
        let Html(page) = index(State(state())).await;
        assert!(page.contains("<form method=\"post\" action=\"/predict\">"));
    }

    #[tokio::test]
    async fn test_short_input_warns() {
        let form = PredictForm {
            symptoms: "fe".into(),
        };
        let Html(page) = predict_form(State(state()), Form(form)).await;
        assert!(page.contains("Please enter a valid symptom description."));
    }

    #[tokio::test]
    async fn test_prediction_rendered() {
        let form = PredictForm {
            symptoms: "cough at night".into(),
        };
        let Html(page) = predict_form(State(state()), Form(form)).await;
        assert!(page.contains("Top Predicted Diseases"));
        assert!(page.contains("Explainability (model) for"));
        assert!(page.contains("Uncertainty Score"));
    }
}
