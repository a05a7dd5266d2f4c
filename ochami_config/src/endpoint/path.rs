//! Lexical URL path joining.

/// Join `element` onto `base`, resolving `.` and `..` segments and
/// collapsing repeated slashes. The result is always rooted and ends in a
/// slash exactly when `element` does (or would be `/` anyway).
pub(super) fn join(base: &str, element: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(element.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut joined = format!("/{}", segments.join("/"));
    if element.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}
