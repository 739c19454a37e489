//! Report assembly and HTML rendering for the web form.

use serde::Serialize;
use symptom_synth_core::dataset::find_by_primary;
use symptom_synth_core::DatasetRow;

use crate::error::{PredictError, PredictResult};
use crate::explain::Explanation;
use crate::service::{Prediction, PredictionService};
use crate::traits::{Classifier, Embedder, Translator};
use crate::training::TrainingMetrics;

/// Inputs shorter than this (ignoring whitespace) are rejected.
pub const MIN_INPUT_CHARS: usize = 3;

const NOT_AVAILABLE: &str = "N/A";
const NO_RECOMMENDATION: &str = "No recommendation found.";

/// Reject input with fewer than [`MIN_INPUT_CHARS`] non-whitespace characters.
pub fn validate_input(text: &str) -> PredictResult<&str> {
    let got = text.chars().filter(|c| !c.is_whitespace()).count();
    if got < MIN_INPUT_CHARS {
        return Err(PredictError::InputRejected {
            min: MIN_INPUT_CHARS,
            got,
        });
    }
    Ok(text.trim())
}

/// Dataset-derived context for one predicted disease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseInsight {
    pub disease: String,
    pub probability: f64,
    pub reasoning: String,
    pub recommendation: String,
    pub explainability: String,
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

impl DiseaseInsight {
    /// Context from the first row whose primary label matches, ignoring case.
    pub fn lookup(rows: &[DatasetRow], disease: &str, probability: f64) -> Option<Self> {
        find_by_primary(rows, disease).map(|row| Self {
            disease: disease.to_string(),
            probability,
            reasoning: or_default(&row.reasoning_keywords, NOT_AVAILABLE),
            recommendation: or_default(&row.recommendations, NO_RECOMMENDATION),
            explainability: or_default(&row.lime_explainability, NOT_AVAILABLE),
        })
    }
}

/// Qualitative label for a score where higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricGrade {
    Good,
    Average,
    Bad,
}

impl MetricGrade {
    pub fn for_score(score: f64) -> Self {
        if score > 0.85 {
            MetricGrade::Good
        } else if score < 0.6 {
            MetricGrade::Bad
        } else {
            MetricGrade::Average
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricGrade::Good => "Good",
            MetricGrade::Average => "Average",
            MetricGrade::Bad => "Bad",
        }
    }
}

/// Everything shown after a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub input: String,
    pub prediction: Prediction,
    /// One entry per top-k disease that appears in the dataset
    pub insights: Vec<DiseaseInsight>,
    /// Word weights behind the top prediction, computed from the model
    pub explanation: Option<Explanation>,
}

/// Validate, predict, explain the top disease and attach dataset context.
///
/// Rejected input never reaches the model.
pub fn build_report<E, C, T>(
    service: &PredictionService<E, C, T>,
    rows: &[DatasetRow],
    input: &str,
) -> PredictResult<Report>
where
    E: Embedder,
    C: Classifier,
    T: Translator,
{
    let text = validate_input(input)?;
    let prediction = service.predict(text)?;
    let insights = prediction
        .top_k
        .iter()
        .filter_map(|r| DiseaseInsight::lookup(rows, &r.disease, r.probability))
        .collect();
    let explanation = service.explain_top(&prediction)?;

    Ok(Report {
        input: text.to_string(),
        prediction,
        insights,
        explanation,
    })
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_metrics(metrics: &TrainingMetrics) -> String {
    let graded = [("Accuracy", metrics.accuracy), ("F1", metrics.f1_weighted)];
    let mut html = String::from("<section><h2>Model Training Metrics</h2><ul>");
    for (name, value) in graded {
        html.push_str(&format!(
            "<li><b>{}:</b> {:.3} ({})</li>",
            name,
            value,
            MetricGrade::for_score(value).as_str()
        ));
    }
    html.push_str(&format!("<li><b>LogLoss:</b> {:.3}</li>", metrics.log_loss));
    html.push_str("</ul>");

    let classes = &metrics.report.classes;
    if !classes.is_empty() {
        html.push_str(
            "<details><summary>Per-class validation scores</summary><table>\
             <tr><th>Disease</th><th>Precision</th><th>Recall</th><th>F1</th><th>Support</th></tr>",
        );
        for c in classes {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{}</td></tr>",
                escape_html(&c.label),
                c.precision,
                c.recall,
                c.f1,
                c.support
            ));
        }
        html.push_str("</table></details>");
    }
    html.push_str("</section>");
    html
}

fn render_report(report: &Report) -> String {
    let mut html = String::from(
        "<section><h2>Top Predicted Diseases</h2><table><tr><th>Disease</th><th>Probability</th></tr>",
    );
    for ranked in &report.prediction.top_k {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.4}</td></tr>",
            escape_html(&ranked.disease),
            ranked.probability
        ));
    }
    html.push_str("</table>");

    if let Some(explanation) = &report.explanation {
        html.push_str(&format!(
            "<p><b>Explainability (model) for {}:</b> {}</p>",
            escape_html(&explanation.disease),
            escape_html(&explanation.summary())
        ));
    }

    for insight in &report.insights {
        html.push_str(&format!(
            "<h3>Disease: {}</h3><p><b>Reasoning Keywords:</b> {}</p>\
             <p><b>Recommendation:</b> {}</p><p><b>Explainability (dataset):</b> {}</p>",
            escape_html(&insight.disease),
            escape_html(&insight.reasoning),
            escape_html(&insight.recommendation),
            escape_html(&insight.explainability),
        ));
    }

    html.push_str(&format!(
        "<p><b>Detected language:</b> {}</p><h3>Uncertainty Score: <code>{}</code></h3></section>",
        escape_html(&report.prediction.detected_language),
        report.prediction.uncertainty
    ));
    html
}

/// Full page: metrics, the form, and either a report or a warning.
pub fn render_page(
    input: &str,
    outcome: Option<&PredictResult<Report>>,
    metrics: Option<&TrainingMetrics>,
) -> String {
    let mut body = String::new();
    if let Some(metrics) = metrics {
        body.push_str(&render_metrics(metrics));
    }

    body.push_str(&format!(
        "<form method=\"post\" action=\"/predict\">\
         <label for=\"symptoms\">Enter patient symptoms:</label><br>\
         <textarea id=\"symptoms\" name=\"symptoms\" rows=\"5\" cols=\"80\">{}</textarea><br>\
         <button type=\"submit\">Predict</button></form>",
        escape_html(input)
    ));

    match outcome {
        Some(Ok(report)) => body.push_str(&render_report(report)),
        Some(Err(PredictError::InputRejected { .. })) => {
            body.push_str("<p class=\"warning\">Please enter a valid symptom description.</p>")
        }
        Some(Err(err)) => body.push_str(&format!(
            "<p class=\"error\">Prediction failed: {}</p>",
            escape_html(&err.to_string())
        )),
        None => {}
    }

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Medical Disease Predictor</title></head><body>\
         <h1>Medical Disease Predictor</h1>\
         <p>Top 3 disease predictions with reasoning and recommendations</p>{}</body></html>",
        body
    )
}
