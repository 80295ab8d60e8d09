//! Example spec template.
//!
//! The template is stored as a valid TOML file and returned as a commented-out
//! example spec.

/// Example spec template (valid TOML).
const SPEC_TEMPLATE: &str = include_str!("../templates/spec.toml");

/// Returns the example spec as a commented-out template.
pub fn spec_template() -> String {
    comment_template(SPEC_TEMPLATE)
}

/// Converts a valid TOML template into a commented-out example spec.
///
/// Lines that are already comments are preserved as-is. Non-comment, non-empty
/// lines get a "# " prefix. Empty lines are preserved.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
