//! JSON object extraction from generated text
//!
//! Models asked for "exactly a JSON object" still wrap it in prose or
//! markdown fences now and then. These helpers find the first JSON object
//! in such text.

use crate::{LLMError, Result};
use serde_json::{Map, Value};

const FENCE_OPENERS: [&str; 4] = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

/// Extract the first JSON object from model output
///
/// Tried in order: the whole text, the contents of a markdown code fence,
/// then every balanced `{ ... }` span from left to right.
///
/// # Example
///
/// ```
/// use agent_llm::extract::extract_json_object;
///
/// let text = "Sure! Here you go: {\"tool_choice\": \"no tool\", \"tool_input\": \"hi\"} Hope it helps.";
/// let object = extract_json_object(text).unwrap();
/// assert_eq!(object["tool_choice"], "no tool");
/// ```
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    json_object_candidates(text)?
        .into_iter()
        .next()
        .ok_or_else(|| {
            LLMError::MalformedResponse(format!("no JSON object found in: {}", preview(text.trim())))
        })
}

/// Every JSON object in model output, in the order [`extract_json_object`] tries them
///
/// Callers looking for an object of a particular shape walk this list, so an
/// unrelated object earlier in the text does not hide the one they want.
/// Fails only on empty text; text with no objects yields an empty list.
pub fn json_object_candidates(text: &str) -> Result<Vec<Map<String, Value>>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LLMError::MalformedResponse("empty response".to_string()));
    }

    if let Some(object) = parse_object(trimmed) {
        return Ok(vec![object]);
    }

    let mut candidates = Vec::new();
    if let Some(object) = from_code_block(trimmed).as_deref().and_then(parse_object) {
        candidates.push(object);
    }

    for (start, c) in trimmed.char_indices() {
        if c != '{' {
            continue;
        }
        if let Some(object) = balanced_object(trimmed, start).and_then(parse_object) {
            candidates.push(object);
        }
    }

    Ok(candidates)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn from_code_block(s: &str) -> Option<String> {
    for opener in FENCE_OPENERS {
        if let Some(start) = s.find(opener) {
            let body_start = start + opener.len();
            if let Some(end) = s[body_start..].find("```") {
                return Some(s[body_start..body_start + end].trim().to_string());
            }
        }
    }
    None
}

/// Slice from `start` (a `{`) to its matching `}`, honoring string literals
fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

pub(crate) fn preview(s: &str) -> String {
    const LIMIT: usize = 120;
    if s.chars().count() <= LIMIT {
        s.to_string()
    } else {
        let head: String = s.chars().take(LIMIT).collect();
        format!("{head}...")
    }
}
