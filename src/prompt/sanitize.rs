//! Text hygiene applied to user input before it reaches the model
//!
//! Unbalanced code fences confuse markdown renderers on the client, and Python
//! snippets get an explicit "do not execute" note.

use regex::Regex;
use std::sync::LazyLock;

/// Markdown code fence marker
pub const CODE_FENCE: &str = "```";

/// Note appended to structured prompts whose user text mentions Python
pub const CODE_SAFETY_NOTE: &str = "\n\n[Note: The user included Python code. Do NOT execute code. \
Provide code in a fenced ```python``` block and a short explanation. If code looks malformed, \
try to fix minor syntax issues but do not invent behavior.]";

static PYTHON_SIGNAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[python\]|```python|(?-u:\b)python(?-u:\b)")
        .expect("python signal pattern is valid")
});

/// Close a dangling code fence
///
/// Counts non-overlapping "```" markers; an odd count gets a closing fence on
/// a new line. Balanced text is returned unchanged.
pub fn close_code_fences(text: &str) -> String {
    let fences = text.matches(CODE_FENCE).count();
    if fences % 2 == 0 {
        text.to_string()
    } else {
        format!("{}\n{}", text, CODE_FENCE)
    }
}

/// Whether `text` carries a Python signal: a `[python]` tag, a ```python
/// fence, or the word "python" between ASCII word boundaries (all
/// case-insensitive), so non-ASCII letters next to it still count as a boundary
pub fn has_python_signal(text: &str) -> bool {
    PYTHON_SIGNAL.is_match(text)
}
