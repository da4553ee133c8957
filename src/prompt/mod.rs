//! Prompt construction
//!
//! Turns a request body (raw prompt, structured intent, or nothing at all) into
//! the single prompt string sent to the model. Building is pure and total: every
//! input produces a prompt, unknown modules fall back to the generic template.

pub mod module;
pub mod sanitize;

pub use module::{ModuleKind, SYSTEM_INSTRUCTION};
pub use sanitize::{CODE_SAFETY_NOTE, close_code_fences, has_python_signal};

use serde::Deserialize;
use serde_json::Value;

/// Placeholder used when the request carries neither a prompt nor an intent
pub const EMPTY_PROMPT_NOTICE: &str = "(Empty prompt received)";

/// Structured request naming a study module and the student's text
///
/// Fields are kept as raw JSON values because clients send loosely typed
/// payloads; they are coerced to text when read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub module: Option<Value>,
    /// Older clients send the module tag as `type`
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub intent: Option<Value>,
    #[serde(default)]
    pub subject: Option<Value>,
}

impl Intent {
    /// Intent for a module with plain user input
    pub fn new(module: &str, input: impl Into<String>) -> Self {
        Self {
            module: Some(Value::String(module.to_string())),
            input: Some(Value::String(input.into())),
            ..Self::default()
        }
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(Value::String(subject.into()));
        self
    }

    /// Resolved module (`module`, else `type`, else generic)
    pub fn module_kind(&self) -> ModuleKind {
        let tag = coerce_text(&self.module).or_else(|| coerce_text(&self.kind));
        tag.map_or(ModuleKind::Generic, |t| ModuleKind::from_tag(&t))
    }

    /// Student text: first of `input`, `message`, `intent` that carries a value
    pub fn user_text(&self) -> String {
        coerce_text(&self.input)
            .or_else(|| coerce_text(&self.message))
            .or_else(|| coerce_text(&self.intent))
            .unwrap_or_default()
    }

    /// Subject, if the client named one
    pub fn subject(&self) -> Option<String> {
        coerce_text(&self.subject)
    }
}

/// Whether a JSON value counts as "nothing supplied"
///
/// `null`, `false`, `0` and `""` are empty; everything else, including `[]`
/// and `{}`, carries a value.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Coerce a loosely typed JSON value to text
///
/// Blank values (see [`is_blank`]) yield `None` so that the next candidate
/// field is consulted.
fn coerce_text(value: &Option<Value>) -> Option<String> {
    value
        .as_ref()
        .filter(|value| !is_blank(value))
        .map(display_text)
}

/// Text form of a JSON value as a client would render it
///
/// Whole numbers print without a fractional part, arrays join their elements
/// with commas (`null` elements print as nothing) and objects print as
/// `[object Object]`.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// The shape a request body was interpreted as
#[derive(Debug, Clone, PartialEq)]
pub enum PromptRequest {
    /// Neither a prompt string nor an intent was supplied
    Empty,
    /// Free-form prompt text
    Raw(String),
    /// Module-tagged intent
    Structured(Intent),
}

impl PromptRequest {
    /// Interpret a JSON request body
    ///
    /// A string `prompt` wins over an `intent`; a blank or missing intent
    /// and non-object bodies are `Empty`.
    pub fn from_json(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::Empty;
        };

        if let Some(Value::String(prompt)) = object.get("prompt") {
            return Self::Raw(prompt.clone());
        }

        match object.get("intent") {
            None => Self::Empty,
            Some(intent) if is_blank(intent) => Self::Empty,
            // Non-object intents carry no usable fields and build a generic prompt
            Some(intent) => Self::Structured(
                serde_json::from_value::<Intent>(intent.clone()).unwrap_or_default(),
            ),
        }
    }

    /// Module this request resolves to, if structured
    pub fn module_kind(&self) -> Option<ModuleKind> {
        match self {
            Self::Structured(intent) => Some(intent.module_kind()),
            _ => None,
        }
    }
}

/// Build the final prompt for a request
///
/// Output is the system instruction, a blank line, then either the sanitized raw
/// prompt or the module template (plus the code-safety note when the student
/// text mentions Python).
pub fn build_prompt(request: &PromptRequest) -> String {
    match request {
        PromptRequest::Empty => format!("{}\n\n{}", SYSTEM_INSTRUCTION, EMPTY_PROMPT_NOTICE),
        PromptRequest::Raw(prompt) => {
            format!("{}\n\n{}", SYSTEM_INSTRUCTION, close_code_fences(prompt))
        }
        PromptRequest::Structured(intent) => {
            let user_text = close_code_fences(&intent.user_text());
            let subject = intent.subject();
            let module_prompt = intent.module_kind().render(&user_text, subject.as_deref());
            let code_note = if has_python_signal(&user_text) {
                CODE_SAFETY_NOTE
            } else {
                ""
            };

            format!("{}\n\n{}{}", SYSTEM_INSTRUCTION, module_prompt, code_note)
        }
    }
}
