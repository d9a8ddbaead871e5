//! System prompt construction
//!
//! Fills the fixed instruction template with the per-turn
//! [`SessionContext`]. Substitution is a single left-to-right pass:
//! every `{{name}}` occurrence is replaced exactly once and substituted
//! values are never re-scanned, so code or problem text that happens to
//! contain a placeholder name cannot expand recursively.

use crate::extractor::SessionContext;

/// Instruction template for every turn. The three placeholders are filled
/// from the extracted page context; everything else is fixed.
pub const SYSTEM_TEMPLATE: &str = "\
You are a coding assistant embedded in a programming-problem page. \
Help the user reason about the problem without spoiling it: prefer \
feedback and hints over full solutions, and keep snippets minimal.

Problem statement:
{{problem_statement}}

The user is writing {{programming_language}} code. Their current code:
{{user_code}}

CRITICAL: Your entire reply MUST be a single valid JSON object of the form:
{\"output\": {\"feedback\": string, \"hints\": [string], \"snippet\": string, \"programmingLanguage\": string}}
Every field inside \"output\" is optional; omit what you have nothing to say for.
Never add anything before or after the JSON. No markdown fences, no commentary.";

/// Build the system-role message content for a turn
pub fn build_system_prompt(ctx: &SessionContext) -> String {
    render_template(SYSTEM_TEMPLATE, ctx)
}

/// Substitute `{{problem_statement}}`, `{{programming_language}}` and
/// `{{user_code}}` in `template`. Unknown placeholders are left intact.
pub fn render_template(template: &str, ctx: &SessionContext) -> String {
    let mut out = String::with_capacity(template.len() + ctx.user_code.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match lookup(name, ctx) {
                    Some(value) => out.push_str(value),
                    // Not one of ours: emit the placeholder verbatim
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated opener, keep the tail as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(name: &str, ctx: &'a SessionContext) -> Option<&'a str> {
    match name {
        "problem_statement" => Some(&ctx.problem_statement),
        "programming_language" => Some(&ctx.programming_language),
        "user_code" => Some(&ctx.user_code),
        _ => None,
    }
}
