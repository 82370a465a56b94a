//! Quoting of option values for the NuGet command line.
//!
//! NuGet.exe parses its command line with the Windows rules, where a
//! backslash right before a closing double quote escapes it. Values ending in
//! a backslash (typically directories) therefore get that backslash flipped
//! to a forward slash when they are wrapped. This is a heuristic, not a full
//! escaping scheme: embedded double quotes are passed through untouched.

/// Quote `value` only if it contains whitespace.
///
/// An empty value becomes `""` so the option still receives an argument.
pub fn quote_if_needed(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_owned();
    }
    if value.chars().any(char::is_whitespace) {
        return quote(value);
    }
    value.to_owned()
}

/// Wrap `value` in double quotes unconditionally.
pub fn quote(value: &str) -> String {
    let quoted = format!("\"{value}\"");
    match quoted.strip_suffix("\\\"") {
        Some(head) => format!("{head}/\""),
        None => quoted,
    }
}

/// Split an argument token into process arguments.
///
/// Whitespace outside double quotes separates arguments; the quote
/// characters themselves are dropped. `-Exclude "a b"` becomes
/// `["-Exclude", "a b"]` and `""` becomes a single empty argument.
///
/// Every `"` toggles quoting and backslashes are always literal. This differs
/// from the Windows rules NuGet.exe uses, where `\"` is an escaped quote: a
/// whitespace value ending in `\"` wraps to `"a \""`, which splits here to
/// `a \` but which NuGet.exe reads as `a "`. Only the raw command line passed
/// to NuGet.exe on Windows follows the Windows reading.
pub fn split_token(token: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for c in token.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}
