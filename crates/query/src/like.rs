//! SQL-style `LIKE` pattern matching for `$like`.
//!
//! `%` matches any run of characters (including none); `_` matches exactly
//! one character. Everything else is matched literally. Translated to an
//! anchored [`regex::Regex`] rather than hand-rolled, since `regex` is
//! already a dependency for `$regex` and the ecosystem way to do this.

use regex::Regex;

/// Compile a SQL `LIKE` pattern into an anchored regular expression.
pub fn compile_like(pattern: &str) -> Result<Regex, String> {
    let mut re = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| format!("invalid $like pattern '{pattern}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_any_run() {
        let re = compile_like("a%z").unwrap();
        assert!(re.is_match("az"));
        assert!(re.is_match("abcz"));
        assert!(!re.is_match("abcy"));
    }

    #[test]
    fn underscore_matches_one_char() {
        let re = compile_like("a_c").unwrap();
        assert!(re.is_match("abc"));
        assert!(!re.is_match("ac"));
        assert!(!re.is_match("abbc"));
    }

    #[test]
    fn literal_regex_metacharacters_are_escaped() {
        let re = compile_like("a.b").unwrap();
        assert!(re.is_match("a.b"));
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn full_match_required() {
        let re = compile_like("abc").unwrap();
        assert!(re.is_match("abc"));
        assert!(!re.is_match("xabcx"));
    }
}
