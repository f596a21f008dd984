// Relevance scoring through an external language model
use crate::extraction::{ExtractionError, KeywordExtractor};
use crate::weighting::{ExclusionSet, WeightedWord};
use serde::Deserialize;
use std::cmp::Ordering;
use std::io::Write;
use std::process::{Command, Stdio};

/// Input characters sent to the model by default
pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

/// Environment variable carrying the API key to the transport command
pub const API_KEY_VAR: &str = "YUNTU_API_KEY";

/// Environment variable carrying the model name to the transport command
pub const MODEL_VAR: &str = "YUNTU_MODEL";

const RESPONSE_SCHEMA: &str = r#"{"keywords":[{"keyword":"<string>","score":<integer 1-100>}],"sentiment":[{"label":"<string>","score":<integer>,"explanation":"<string>"}],"overallTone":"<string>"}"#;

/// Where the API key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKey {
    /// Read from this environment variable at call time
    Env(String),
    Value(String),
}

impl ApiKey {
    fn resolve(&self) -> Result<String, ExtractionError> {
        match self {
            Self::Env(var) => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => Ok(key),
                _ => Err(ExtractionError::MissingApiKey { env: var.clone() }),
            },
            Self::Value(key) if !key.trim().is_empty() => Ok(key.clone()),
            Self::Value(_) => Err(ExtractionError::MissingApiKey {
                env: API_KEY_VAR.to_string(),
            }),
        }
    }
}

/// One completion request
#[derive(Debug, Clone)]
pub struct SemanticRequest {
    pub model: String,
    pub prompt: String,
    pub api_key: String,
}

/// Delivers a prompt to a model and returns its raw text answer
pub trait SemanticTransport: Send + Sync {
    fn complete(&self, request: &SemanticRequest) -> Result<String, ExtractionError>;
}

/// Runs a local command: prompt on stdin, JSON answer on stdout
#[derive(Debug, Clone)]
pub struct CommandTransport {
    program: String,
    args: Vec<String>,
}

impl CommandTransport {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list
    pub fn from_command(command: &[String]) -> Result<Self, ExtractionError> {
        match command.split_first() {
            Some((program, args)) if !program.trim().is_empty() => {
                Ok(Self::new(program.clone(), args.to_vec()))
            }
            _ => Err(ExtractionError::InvalidInput(
                "semantic.command must name a program".to_string(),
            )),
        }
    }
}

impl SemanticTransport for CommandTransport {
    fn complete(&self, request: &SemanticRequest) -> Result<String, ExtractionError> {
        tracing::debug!("Spawning semantic transport '{}'", self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(API_KEY_VAR, &request.api_key)
            .env(MODEL_VAR, &request.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExtractionError::Transport(format!("failed to start '{}': {}", self.program, e))
            })?;

        // The prompt is written on its own thread while stdout and stderr drain
        let stdin = child.stdin.take();
        let prompt = request.prompt.as_bytes();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(prompt),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output
            .map_err(|e| ExtractionError::Transport(format!("failed to read output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Transport(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        match written {
            Ok(Ok(())) => {}
            // The child answered without reading the whole prompt
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!("'{}' closed stdin early", self.program);
            }
            Ok(Err(e)) => {
                return Err(ExtractionError::Transport(format!(
                    "failed to write prompt: {}",
                    e
                )))
            }
            Err(_) => {
                return Err(ExtractionError::Transport(
                    "prompt writer thread panicked".to_string(),
                ))
            }
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ExtractionError::MalformedResponse(format!("output is not UTF-8: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct KeywordResponse {
    #[serde(default)]
    keywords: Vec<KeywordEntry>,
}

#[derive(Debug, Deserialize)]
struct KeywordEntry {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    score: f64,
}

/// Keyword extractor backed by a language model
pub struct SemanticExtractor {
    transport: Box<dyn SemanticTransport>,
    api_key: ApiKey,
    model: String,
    max_input_chars: usize,
}

impl SemanticExtractor {
    pub fn new(
        transport: Box<dyn SemanticTransport>,
        api_key: ApiKey,
        model: impl Into<String>,
        max_input_chars: usize,
    ) -> Self {
        Self {
            transport,
            api_key,
            model: model.into(),
            max_input_chars,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Cut `text` to `max_input_chars` characters, marking the cut with "..."
    pub fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.max_input_chars) {
            Some((byte, _)) => format!("{}...", &text[..byte]),
            None => text.to_string(),
        }
    }

    pub fn build_prompt(&self, text: &str) -> String {
        format!(
            "Analyze the following Chinese text for keyword extraction and sentiment analysis.\n\
             \n\
             1. Keywords: Extract the top 50-80 most significant keywords/concepts with a relevance score (1-100).\n\
             2. Sentiment: Identify the primary emotions and give a brief explanation in Chinese for the overall tone.\n\
             \n\
             Respond with JSON only, matching this schema:\n\
             {}\n\
             \n\
             Text snippet:\n\
             \"{}\"\n",
            RESPONSE_SCHEMA,
            self.truncate(text)
        )
    }
}

/// Strip a Markdown code fence some models wrap around JSON
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model answer into keywords sorted by descending score
pub fn parse_response(raw: &str) -> Result<Vec<WeightedWord>, ExtractionError> {
    let body = strip_code_fence(raw);
    let body = if body.is_empty() { "{}" } else { body };

    let response: KeywordResponse = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let mut words: Vec<WeightedWord> = response
        .keywords
        .into_iter()
        .filter(|entry| !entry.keyword.trim().is_empty() && entry.score.is_finite())
        .map(|entry| WeightedWord::new(entry.keyword.trim(), entry.score))
        .collect();
    words.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    Ok(words)
}

impl KeywordExtractor for SemanticExtractor {
    fn extract(
        &self,
        text: &str,
        _exclusions: &ExclusionSet,
    ) -> Result<Vec<WeightedWord>, ExtractionError> {
        let api_key = self.api_key.resolve()?;

        let request = SemanticRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(text),
            api_key,
        };
        let raw = self.transport.complete(&request)?;
        let words = parse_response(&raw)?;

        tracing::info!(
            "Semantic extraction via {} returned {} keywords",
            self.model,
            words.len()
        );
        Ok(words)
    }

    fn name(&self) -> &str {
        "semantic"
    }
}
