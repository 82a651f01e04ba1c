//! Prompt construction for mapping suggestions and transforms

use serde_json::Value;

fn pretty(value: &Value) -> String {
    // Serializing a Value only fails for non-string map keys, which Value cannot hold.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Build the prompt asking the model for field mappings between two schemas
pub fn build_mapping_prompt(source_format: &Value, target_format: &Value) -> String {
    format!(
        r#"Given these two data structures:

SOURCE FORMAT:
{}

TARGET FORMAT:
{}

Generate field mappings with:
1. Source path -> Target path
2. Transformation needed (if any)
3. Confidence score (0-1)

Return as JSON {{"mappings": [...] }} with strictly valid JSON."#,
        pretty(source_format),
        pretty(target_format)
    )
}

/// Build the prompt asking the model to rewrite `source_data` into the target format.
///
/// `extra_instructions` is appended verbatim when non-empty.
pub fn build_transform_prompt(
    source_format: &Value,
    target_format: &Value,
    source_data: &Value,
    extra_instructions: &str,
) -> String {
    let mut prompt = format!(
        "{}\n\n\
         Now transform the following SOURCE DATA into the TARGET FORMAT structure:\n\n\
         SOURCE DATA:\n{}\n\n\
         Return ONLY the final transformed JSON object.\n",
        build_mapping_prompt(source_format, target_format),
        pretty(source_data)
    );

    if !extra_instructions.is_empty() {
        prompt.push_str("\nAdditional instructions:\n");
        prompt.push_str(extra_instructions);
    }

    prompt
}
