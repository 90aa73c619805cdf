// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Output contract appended to every prompt. The sanitizer still defends against violations.
pub const JSON_ARRAY_ONLY_INSTRUCTION: &str = "\
    Please format the output strictly as an array of JSON objects without any additional \
    labels, code blocks, markdown, or explanations. Return only the JSON array.";

/// Substitutes `{key}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so user text containing `{...}` is inlined
/// verbatim. Braces that do not name a known key are copied through unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let hit = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });

        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
