//! Client for the Gemini `generateContent` REST endpoint.
//!
//! Prompts are built here so both handlers stay thin. Generation settings are
//! pinned low-temperature: the model is analyzing code, not writing prose.
//! The API key goes in a header, never in the URL or the logs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.8;
const TOP_K: i32 = 40;

/// Output cap for code reviews.
const REVIEW_MAX_OUTPUT_TOKENS: u32 = 2048;
/// Output cap for code explanations, shorter than reviews.
const EXPLANATION_MAX_OUTPUT_TOKENS: u32 = 1024;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            model,
            api_key,
        })
    }

    /// Ask for a structured review of a solution attempt.
    pub async fn review_code(
        &self,
        code: &str,
        problem_statement: Option<&str>,
        language: Option<&str>,
    ) -> anyhow::Result<String> {
        let prompt = review_prompt(code, problem_statement, language);
        self.generate(&prompt, REVIEW_MAX_OUTPUT_TOKENS).await
    }

    /// Ask for a step-by-step explanation of a piece of code.
    pub async fn explain_code(&self, code: &str) -> anyhow::Result<String> {
        let prompt = explanation_prompt(code);
        self.generate(&prompt, EXPLANATION_MAX_OUTPUT_TOKENS).await
    }

    async fn generate(&self, prompt: &str, max_output_tokens: u32) -> anyhow::Result<String> {
        let url = format!("{}/v1beta/{}:generateContent", self.base_url, self.model);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_gemini_error(&body).unwrap_or(body);
            anyhow::bail!("Gemini responded with HTTP {status}: {message}");
        }

        let body: GenerateResponse = response.json().await?;
        let text = body.first_candidate_text();
        if text.is_empty() {
            anyhow::bail!("Gemini returned no content");
        }

        Ok(text)
    }
}

fn review_prompt(code: &str, problem_statement: Option<&str>, language: Option<&str>) -> String {
    let statement = problem_statement
        .map(|statement| format!("Problem Statement: {statement}\n\n"))
        .unwrap_or_default();
    let language = language.unwrap_or("Not specified");

    format!(
        "Please review the following code and provide concise feedback:\n\n\
         {statement}\
         Programming Language: {language}\n\n\
         Code:\n{code}\n\n\
         Please provide a comprehensive code review including:\n\
         1. Code efficiency and time complexity analysis\n\
         2. Best practices followed or violated\n\
         3. Potential bugs or edge cases not handled\n\
         4. Suggestions for improvement\n\
         5. Alternative approaches if applicable\n\n\
         Format your response with clear sections and bullet points.\n\
         Be concise and focus on actionable feedback."
    )
}

fn explanation_prompt(code: &str) -> String {
    format!(
        "Please explain the following code in detail:\n\n\
         {code}\n\n\
         Provide a comprehensive explanation including:\n\
         1. What the code does\n\
         2. How it works step by step\n\
         3. Key algorithms or data structures used\n\
         4. Time and space complexity analysis\n\n\
         Format your response with clear sections."
    )
}

// --- Wire DTOs ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, or an empty string.
    fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: Option<String>,
}

/// Pull the human-readable message out of a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorWrap {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorWrap>(body)
        .ok()
        .map(|wrap| wrap.error.message)
}
