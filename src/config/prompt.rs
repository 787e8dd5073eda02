use log::info;
use std::fs;
use std::io;
use thiserror::Error;

use crate::rag::prompt::{ PromptError, PromptTemplate };
use crate::rag::retrieval::TEMPLATE_VARIABLES;

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("Failed to read prompt template '{path}': {source}")]
    Io {
        path: String,
        source: io::Error,
    },
    #[error("Failed to parse prompt template '{path}': {source}")]
    Parse {
        path: String,
        source: PromptError,
    },
    #[error("Prompt template '{path}' must reference {{context}} and one of {{question}} or {{input}}")]
    MissingPlaceholders {
        path: String,
    },
    #[error("Prompt template '{path}' uses unknown variables {names:?} (allowed: {allowed:?})")]
    UnknownVariables {
        path: String,
        names: Vec<String>,
        allowed: &'static [&'static str],
    },
}

/// Loads the answer template from `path`, or the built-in one when no path is configured.
pub fn load_answer_template(path: Option<&str>) -> Result<PromptTemplate, TemplateLoadError> {
    let Some(path) = path else {
        return Ok(PromptTemplate::default_answer());
    };

    let text = fs::read_to_string(path).map_err(|source| TemplateLoadError::Io {
        path: path.to_string(),
        source,
    })?;
    let template = PromptTemplate::from_template(&text).map_err(|source| TemplateLoadError::Parse {
        path: path.to_string(),
        source,
    })?;

    let has_question = template.has_variable("question") || template.has_variable("input");
    if !template.has_variable("context") || !has_question {
        return Err(TemplateLoadError::MissingPlaceholders { path: path.to_string() });
    }

    let unknown: Vec<String> = template
        .input_variables()
        .iter()
        .filter(|name| !TEMPLATE_VARIABLES.contains(&name.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(TemplateLoadError::UnknownVariables {
            path: path.to_string(),
            names: unknown,
            allowed: TEMPLATE_VARIABLES,
        });
    }

    info!("Loaded prompt template from '{}' (variables: {:?})", path, template.input_variables());
    Ok(template)
}
