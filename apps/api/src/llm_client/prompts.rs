// Shared prompt fragments.
// Each pipeline defines its own system description and template in
// generation/prompts.rs; this file holds the cross-cutting pieces.

/// Appended to every instruction. The provider already enforces the JSON
/// mime type and schema; this keeps the model from padding string fields.
pub const OUTPUT_CONTRACT: &str = "\
    OUTPUT RULES: \
    Respond with a single JSON object matching the response schema exactly. \
    Every field is required; never return null, empty strings, or placeholder text. \
    Use only the enumeration values listed in the schema. \
    Do NOT use markdown code fences. \
    Do NOT include explanations outside the JSON object.";

/// Appends the shared output contract to a pipeline instruction.
pub fn with_output_contract(instruction: &str) -> String {
    format!("{}\n\n{}", instruction.trim_end(), OUTPUT_CONTRACT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_is_appended_once_at_the_end() {
        let prompt = with_output_contract("Analyze this.\n\n");
        assert!(prompt.starts_with("Analyze this.\n\nOUTPUT RULES:"));
        assert_eq!(prompt.matches("OUTPUT RULES").count(), 1);
    }
}
