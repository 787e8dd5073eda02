//! `{name}` placeholder templates.
//!
//! `{{` and `}}` stand for literal braces. Placeholder names follow identifier
//! rules: letters, digits and `_`, not starting with a digit.

use std::collections::HashMap;
use std::mem;
use thiserror::Error;

pub const DEFAULT_ANSWER_TEMPLATE: &str = "Answer the following question based on the provided context:
Chat history: {chat_history}
Question: {question}
Context: {context}
Answer:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unclosed '{{' at byte {0} in prompt template")]
    UnclosedBrace(usize),
    #[error("Unmatched '}}' at byte {0} in prompt template (use '}}}}' for a literal brace)")]
    StrayClosingBrace(usize),
    #[error("Invalid placeholder name '{0}' in prompt template")]
    InvalidVariable(String),
    #[error("Missing value for prompt variable '{0}'")]
    MissingVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn from_template(template: &str) -> Result<Self, PromptError> {
        let segments = parse(template)?;
        let mut input_variables: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !input_variables.contains(name) {
                    input_variables.push(name.clone());
                }
            }
        }
        Ok(Self { segments, input_variables })
    }

    pub fn default_answer() -> Self {
        Self::from_template(DEFAULT_ANSWER_TEMPLATE).expect("built-in template is well formed")
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.input_variables.iter().any(|v| v == name)
    }

    pub fn format(&self, values: &HashMap<String, String>) -> Result<String, PromptError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| PromptError::MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse(template: &str) -> Result<Vec<Segment>, PromptError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(PromptError::UnclosedBrace(pos));
                }
                if !is_identifier(&name) {
                    return Err(PromptError::InvalidVariable(name));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                    continue;
                }
                return Err(PromptError::StrayClosingBrace(pos));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
