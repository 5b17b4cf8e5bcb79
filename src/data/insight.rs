//! Gemini integration for natural-language summaries.
//!
//! The "insight" card summarizes the currently visible rows through the
//! Gemini REST API. The call is strictly best-effort: at most the first 50
//! rows are sent, any failure degrades to a fixed Italian fallback string,
//! and nothing else in the pipeline ever depends on the result.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::BatchRow;
use crate::error::AppError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-3-flash-preview";

/// Rows beyond this are not sent; keeps the prompt bounded.
const MAX_PROMPT_ROWS: usize = 50;

/// Shown when the current selection has no rows to analyze.
pub const FALLBACK_EMPTY: &str = "Nessun dato disponibile per l'analisi.";
/// Shown when the request fails for any reason.
pub const FALLBACK_ERROR: &str = "Impossibile generare approfondimenti al momento.";

#[derive(Clone)]
pub struct InsightClient {
    client: Client,
    api_key: String,
}

impl InsightClient {
    /// Build a client from `GEMINI_API_KEY` (a `.env` file is honored).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AppError::usage("Missing GEMINI_API_KEY in environment (.env)."))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_key })
    }

    /// Summarize the visible rows.
    ///
    /// Never fails: an empty selection yields [`FALLBACK_EMPTY`], and any
    /// transport or decoding problem yields [`FALLBACK_ERROR`].
    pub fn summarize(&self, rows: &[BatchRow]) -> String {
        if rows.is_empty() {
            return FALLBACK_EMPTY.to_string();
        }
        match self.generate(&build_prompt(rows)) {
            Ok(Some(text)) => text,
            Ok(None) | Err(_) => FALLBACK_ERROR.to_string(),
        }
    }

    fn generate(&self, prompt: &str) -> Result<Option<String>, AppError> {
        let url = format!("{BASE_URL}/{MODEL}:generateContent");
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.9,
            },
        };

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| AppError::runtime(format!("Insight request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Insight request failed with status {}.",
                resp.status()
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse insight response: {e}")))?;

        Ok(extract_text(body))
    }
}

/// Build the Italian analysis prompt from at most [`MAX_PROMPT_ROWS`] rows.
fn build_prompt(rows: &[BatchRow]) -> String {
    let lines: Vec<String> = rows
        .iter()
        .take(MAX_PROMPT_ROWS)
        .map(|row| {
            format!(
                "{}: {} ({}) - Peso Tot: {}kg",
                row.date, row.product, row.part_type, row.total_weight
            )
        })
        .collect();

    format!(
        "Analizza questi dati di distribuzione agricola e fornisci un breve riassunto \
         (massimo 3 punti) sui trend principali, anomalie o suggerimenti. \
         Rispondi in italiano.\nDati:\n{}",
        lines.join("\n")
    )
}

fn extract_text(resp: GenerateResponse) -> Option<String> {
    let text: String = resp
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .map(|part| part.text)
        .collect();
    let text = text.trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, total: f64) -> BatchRow {
        BatchRow {
            date: date.to_string(),
            part_type: "PI".to_string(),
            product: "Patate".to_string(),
            weight_per_part: 2.5,
            parts_count: 10.0,
            total_weight: total,
            week: "2".to_string(),
            day: "2".to_string(),
        }
    }

    #[test]
    fn prompt_lists_rows_in_the_expected_shape() {
        let prompt = build_prompt(&[row("07/01/2025", 367.5)]);
        assert!(prompt.contains("Rispondi in italiano."));
        assert!(prompt.contains("07/01/2025: Patate (PI) - Peso Tot: 367.5kg"));
    }

    #[test]
    fn prompt_is_capped_at_fifty_rows() {
        let rows: Vec<BatchRow> = (0..80).map(|i| row(&format!("giorno-{i}"), 1.0)).collect();
        let prompt = build_prompt(&rows);
        assert!(prompt.contains("giorno-0:"));
        assert!(prompt.contains("giorno-49:"));
        assert!(!prompt.contains("giorno-50:"));
    }

    #[test]
    fn response_text_is_joined_across_parts() {
        let resp = GenerateResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![
                        CandidatePart {
                            text: "Trend ".to_string(),
                        },
                        CandidatePart {
                            text: "stabile.".to_string(),
                        },
                    ],
                }),
            }],
        };
        assert_eq!(extract_text(resp), Some("Trend stabile.".to_string()));
    }

    #[test]
    fn empty_response_yields_none() {
        let resp = GenerateResponse { candidates: vec![] };
        assert_eq!(extract_text(resp), None);

        let blank = GenerateResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![CandidatePart {
                        text: "   ".to_string(),
                    }],
                }),
            }],
        };
        assert_eq!(extract_text(blank), None);
    }

    #[test]
    fn response_schema_tolerates_extra_fields() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "Ok."}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": {"promptTokenCount": 12}
        }"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(resp), Some("Ok.".to_string()));
    }
}
