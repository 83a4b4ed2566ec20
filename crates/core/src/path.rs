//! Canonical route path normalization.
//!
//! Route definitions may declare an explicit path or fall back to the
//! source-relative location of their module. Either way the raw string is
//! funneled through [`normalize`] before it reaches the registry, so the
//! table is keyed by one canonical spelling per endpoint.

/// Normalize a raw file-relative or declared path into a canonical route path.
///
/// Rules, in order:
/// - `\` separators become `/`
/// - trailing source extensions (`.rs`, `.ts`, `.js`) are stripped, stacked
///   ones included
/// - parenthesized segments are dropped (organizational grouping only,
///   they never affect the URL)
/// - trailing `index` segments collapse onto their parent
/// - trailing slashes are removed
/// - the result always starts with `/`; the empty path is the root `/`
///
/// The function is total (any input yields a valid path) and idempotent.
pub fn normalize(raw: &str) -> String {
    let raw = raw.replace('\\', "/");
    let raw = strip_extension(&raw);

    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        if segment.is_empty() {
            continue;
        }
        // Grouping segments like "(admin)" organize source files without
        // contributing to the route path.
        if segment.starts_with('(') && segment.ends_with(')') {
            continue;
        }
        segments.push(segment);
    }

    // "auth/index" names the same endpoint as "auth". Popped to a fixpoint
    // so renormalizing a normalized path changes nothing.
    while segments.last() == Some(&"index") {
        segments.pop();
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

fn strip_extension(mut path: &str) -> &str {
    while let Some(stripped) = [".rs", ".ts", ".js"]
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
    {
        path = stripped;
    }
    path
}
