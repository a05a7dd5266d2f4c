//! Interpretation of scalar values typed on the command line.

use crate::tree::Tree;

/// Turn `text` into the most specific scalar it spells.
///
/// `true`/`false` in any case become booleans, then 64-bit integers and
/// finite floats are recognised; anything else stays a string.
///
/// # Examples
///
/// ```
/// use ochami_config::parse_scalar;
/// use serde_json::json;
///
/// assert_eq!(parse_scalar("FALSE"), json!(false));
/// assert_eq!(parse_scalar("30"), json!(30));
/// assert_eq!(parse_scalar("0.5"), json!(0.5));
/// assert_eq!(parse_scalar("30s"), json!("30s"));
/// ```
#[must_use]
pub fn parse_scalar(text: &str) -> Tree {
    if text.eq_ignore_ascii_case("true") {
        return Tree::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Tree::Bool(false);
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Tree::from(integer);
    }
    if let Some(number) = text
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
    {
        return Tree::Number(number);
    }
    Tree::String(text.to_owned())
}
