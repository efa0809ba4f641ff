//! Structured output schemas and reply parsing.
//!
//! Every pipeline step declares the named string fields it expects back from
//! the model. Providers ask the model for a single JSON object; this module
//! turns whatever text comes back into the typed result or an error.

use crate::{GenesiteError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Matches a reply wrapped in a markdown code fence, e.g. ```json ... ```.
const FENCE_PATTERN: &str = r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$";

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| Regex::new(FENCE_PATTERN).expect("Invalid fence pattern regex"))
}

/// A single named field in a structured reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    /// Field name as it appears in the JSON object.
    pub name: &'static str,

    /// What the model should put in the field.
    pub description: &'static str,
}

/// The declared shape of a structured reply. All fields are strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSchema {
    /// Schema name, used in logs.
    pub name: &'static str,

    /// Required fields, in prompt order.
    pub fields: Vec<SchemaField>,
}

impl OutputSchema {
    /// Create an empty schema.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a required string field.
    pub fn field(mut self, name: &'static str, description: &'static str) -> Self {
        self.fields.push(SchemaField { name, description });
        self
    }

    /// Names of all required fields.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Instruction telling the model how to shape its reply.
    pub fn to_instruction(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|f| format!("- \"{}\" (string): {}", f.name, f.description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Respond with a single JSON object containing exactly these fields:\n{}\n\
             Output only the JSON object, without explanations or markdown code blocks.",
            fields
        )
    }

    /// Check that `value` is an object carrying every field as a string.
    pub fn check(&self, value: &Value) -> Result<()> {
        let object = value.as_object().ok_or_else(|| {
            GenesiteError::SchemaMismatch(format!("{} reply is not a JSON object", self.name))
        })?;

        for field in &self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    return Err(GenesiteError::MissingField(field.name.to_string()))
                }
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(GenesiteError::SchemaMismatch(format!(
                        "field '{}' must be a string, got {}",
                        field.name, other
                    )))
                }
            }
        }

        Ok(())
    }
}

/// A typed reply that a pipeline step expects from the model.
pub trait StructuredOutput: DeserializeOwned {
    /// The schema sent along with the prompt.
    fn schema() -> OutputSchema;

    /// Extra checks beyond field presence.
    fn verify(&self) -> Result<()> {
        Ok(())
    }
}

/// Parse raw model text into a structured reply.
pub fn parse_structured<T: StructuredOutput>(text: &str) -> Result<T> {
    let schema = T::schema();
    let json = extract_json_object(text).ok_or_else(|| {
        GenesiteError::SchemaMismatch(format!("no JSON object found in {} reply", schema.name))
    })?;

    let value: Value = serde_json::from_str(json)?;
    schema.check(&value)?;

    let parsed: T = serde_json::from_value(value)?;
    parsed.verify()?;
    Ok(parsed)
}

/// Locate the JSON object inside a reply, tolerating code fences and chatter.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let text = text.trim();
    let text = get_fence_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);

    // First brace that opens a complete object; the stream stops right after it.
    text.match_indices('{').find_map(|(start, _)| {
        let candidate = &text[start..];
        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(_))) => Some(&candidate[..stream.byte_offset()]),
            _ => None,
        }
    })
}
