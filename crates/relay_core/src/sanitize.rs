//! Stripping markdown code fences from model output.

use regex::Regex;
use std::sync::LazyLock;

// Opening fence, optionally followed by a language tag and a line break. A
// `json` tag running straight into the payload is also dropped, keeping the
// opening bracket.
static LEADING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```(?:[\w+.-]*[ \t]*\r?\n|[\w+.-]+[ \t]+|(?i:json)(?P<open>[{\[]))?")
        .expect("valid leading fence regex")
});

static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").expect("valid trailing fence regex"));

/// Removes surrounding ```` ``` ```` fences and whitespace from model output.
///
/// Leading fences (with their optional language tag) and trailing fences are
/// stripped repeatedly until none remain, so nested fencing is fully unwrapped
/// and `sanitize_output(&sanitize_output(x)) == sanitize_output(x)`.
///
/// # Examples
///
/// ```
/// use relay_core::sanitize_output;
///
/// assert_eq!(sanitize_output("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(sanitize_output("```json{\"a\":1}```"), "{\"a\":1}");
/// assert_eq!(sanitize_output("{\"a\":1}"), "{\"a\":1}");
/// ```
pub fn sanitize_output(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    loop {
        let stripped = strip_fences_once(&text);
        if stripped == text {
            return text;
        }
        text = stripped;
    }
}

fn strip_fences_once(text: &str) -> String {
    let without_leading = LEADING_FENCE.replace(text, "${open}");
    let without_trailing = TRAILING_FENCE.replace(without_leading.trim(), "");
    without_trailing.trim().to_string()
}
