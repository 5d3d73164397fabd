//! JSON envelope extraction from free-form assistant output

use crate::agent::AgentError;
use regex::Regex;
use serde::de::DeserializeOwned;

const FENCED_JSON_PATTERN: &str = r"(?is)```json\s*(.*?)\s*```";

/// Locate the JSON payload in assistant output
///
/// Prefers the body of the first fenced ```` ```json ```` block, otherwise
/// the slice from the first `{` to the last `}`.
pub fn extract_json(output: &str) -> Option<&str> {
    if let Some(body) = Regex::new(FENCED_JSON_PATTERN)
        .ok()
        .and_then(|re| re.captures(output))
        .and_then(|caps| caps.get(1))
    {
        return Some(body.as_str());
    }

    let start = output.find('{')?;
    let end = output.rfind('}')?;
    (end > start).then(|| &output[start..=end])
}

/// Extract the JSON envelope and deserialize it
pub fn parse_json_envelope<T: DeserializeOwned>(output: &str) -> Result<T, AgentError> {
    let json = extract_json(output)
        .ok_or_else(|| AgentError::MalformedOutput("no JSON object found".to_string()))?;

    serde_json::from_str(json).map_err(|e| AgentError::MalformedOutput(e.to_string()))
}
