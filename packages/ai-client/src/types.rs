//! Shared request types and response hygiene helpers.

/// A single text-generation request.
///
/// Deliberately minimal: one prompt in, one text out. Vendor-specific request
/// bodies are assembled inside each client.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The full prompt, including any style or format instructions.
    pub prompt: String,

    /// Completion budget in tokens.
    pub max_tokens: u32,

    /// Sampling temperature; `None` uses the vendor default.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a request with the default 1500-token budget.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 1500,
            temperature: None,
        }
    }

    /// Set the completion token budget.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Strip markdown code fences from a model response.
///
/// Models frequently wrap JSON answers in ```json fences even when asked not
/// to; callers strip before parsing.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
