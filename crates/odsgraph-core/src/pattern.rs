use crate::error::{ErrorOrigin, InternalError};
use globset::{GlobBuilder, GlobMatcher};

///
/// CaseMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaseMode {
    Sensitive,
    Insensitive,
}

///
/// NamePattern
///
/// Compiled name filter. `*` matches any run of characters and `?` exactly
/// one; every other character is literal.
///

#[derive(Clone, Debug)]
pub struct NamePattern {
    text: String,
    matcher: Option<GlobMatcher>,
}

impl NamePattern {
    pub fn new(
        pattern: &str,
        case: CaseMode,
        origin: ErrorOrigin,
    ) -> Result<Self, InternalError> {
        let escaped = escape_pattern(pattern);

        // a lone star is by far the most common filter
        if escaped == "*" {
            return Ok(Self {
                text: pattern.to_string(),
                matcher: None,
            });
        }

        let glob = GlobBuilder::new(&escaped)
            .case_insensitive(matches!(case, CaseMode::Insensitive))
            .literal_separator(false)
            .backslash_escape(true)
            .build()
            .map_err(|e| {
                InternalError::bad_parameter(origin, format!("invalid name pattern '{pattern}': {e}"))
            })?;

        Ok(Self {
            text: pattern.to_string(),
            matcher: Some(glob.compile_matcher()),
        })
    }

    /// Pattern matching every name.
    #[must_use]
    pub fn any() -> Self {
        Self {
            text: "*".to_string(),
            matcher: None,
        }
    }

    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.as_ref().is_none_or(|m| m.is_match(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

// Escape glob syntax that has no meaning in model name filters and collapse
// star runs so `**` is not read as a recursive wildcard.
fn escape_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut prev_star = false;

    for c in pattern.chars() {
        match c {
            '*' => {
                if !prev_star {
                    out.push('*');
                }
                prev_star = true;
                continue;
            }
            '[' | ']' | '{' | '}' | '\\' | '!' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
        prev_star = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(p: &str, case: CaseMode) -> NamePattern {
        NamePattern::new(p, case, ErrorOrigin::Model).expect("valid pattern")
    }

    #[test]
    fn star_and_question_mark_wildcards() {
        let p = pattern("Ao*Test", CaseMode::Sensitive);
        assert!(p.is_match("AoTest"));
        assert!(p.is_match("AoSubTest"));
        assert!(!p.is_match("AoTestEquipment"));

        let q = pattern("unit?", CaseMode::Sensitive);
        assert!(q.is_match("units"));
        assert!(!q.is_match("unit"));
    }

    #[test]
    fn case_mode_is_honoured() {
        assert!(pattern("aounit", CaseMode::Insensitive).is_match("AoUnit"));
        assert!(!pattern("aounit", CaseMode::Sensitive).is_match("AoUnit"));
    }

    #[test]
    fn brackets_and_braces_are_literal() {
        let p = pattern("temp[C]{x}", CaseMode::Sensitive);
        assert!(p.is_match("temp[C]{x}"));
        assert!(!p.is_match("tempC"));
    }

    #[test]
    fn repeated_stars_collapse() {
        let p = pattern("a**b", CaseMode::Sensitive);
        assert!(p.is_match("ab"));
        assert!(p.is_match("a/x/b"));
        assert!(NamePattern::any().is_match(""));
    }
}
