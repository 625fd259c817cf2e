use crate::domain::insight::Insight;
use crate::llm::MAX_INSIGHTS;
use anyhow::Context;
use serde_json::Value;

/// Unwrap the JSON payload from a model reply: a ```json fence wins, then a
/// generic ``` fence, then the raw text, trimmed in every case.
pub fn extract_json_payload(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(idx) = trimmed.find("```json") {
        let rest = &trimmed[idx + "```json".len()..];
        let inner = rest.split("```").next().unwrap_or(rest);
        return inner.trim().to_string();
    }

    if let Some(idx) = trimmed.find("```") {
        let rest = &trimmed[idx + "```".len()..];
        let inner = rest.split("```").next().unwrap_or(rest);
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

/// Parse a model reply into at most `MAX_INSIGHTS` insights. A bare object is
/// treated as a one-element array; model output order is preserved.
pub fn parse_insights(text: &str) -> anyhow::Result<Vec<Insight>> {
    let payload = extract_json_payload(text);
    let value = serde_json::from_str::<Value>(&payload)
        .with_context(|| format!("model output is not valid JSON: {payload}"))?;

    let mut insights = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value::<Insight>)
            .collect::<Result<Vec<_>, _>>()
            .context("model output array does not match the insight shape")?,
        other => vec![serde_json::from_value::<Insight>(other)
            .context("model output object does not match the insight shape")?],
    };

    insights.truncate(MAX_INSIGHTS);
    Ok(insights)
}
