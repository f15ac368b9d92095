use crate::models::TAG_SEPARATOR;

/// Query value that matches every article regardless of its tags.
pub const WILDCARD_TAG: &str = "%";

/// The four positional patterns a single tag can take inside the
/// comma separated `tags` column.
///
/// All four cases go through `LIKE`, so matching ignores ASCII case.
/// `%`, `_` and `,` inside the tag are passed through unescaped, so a tag
/// containing them can over-match (`_` and `%` act as LIKE wildcards) or
/// split across tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPatterns {
    pub only: String,
    pub first: String,
    pub last: String,
    pub middle: String,
}

impl TagPatterns {
    pub fn new(tag: &str) -> Self {
        Self {
            only: tag.to_owned(),
            first: format!("{tag}{TAG_SEPARATOR}%"),
            last: format!("%{TAG_SEPARATOR}{tag}"),
            middle: format!("%{TAG_SEPARATOR}{tag}{TAG_SEPARATOR}%"),
        }
    }

    pub const PREDICATE: &'static str =
        "tags LIKE $1 OR tags LIKE $2 OR tags LIKE $3 OR tags LIKE $4";

    /// Bind order matches the placeholders of [`TagPatterns::PREDICATE`].
    pub fn binds(self) -> [String; 4] {
        [self.only, self.first, self.last, self.middle]
    }
}

pub fn is_wildcard(tag: &str) -> bool {
    tag == WILDCARD_TAG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_positional_patterns() {
        let patterns = TagPatterns::new("rust");
        assert_eq!(patterns.only, "rust");
        assert_eq!(patterns.first, "rust,%");
        assert_eq!(patterns.last, "%,rust");
        assert_eq!(patterns.middle, "%,rust,%");
    }

    #[test]
    fn binds_in_placeholder_order() {
        assert_eq!(
            TagPatterns::new("a").binds(),
            ["a".to_string(), "a,%".into(), "%,a".into(), "%,a,%".into()]
        );
    }

    #[test]
    fn wildcard_is_recognised() {
        assert!(is_wildcard("%"));
        assert!(!is_wildcard("%%"));
        assert!(!is_wildcard(""));
    }

    #[test]
    fn separator_in_tag_is_not_escaped() {
        // a query containing the separator spans two tokens
        assert_eq!(TagPatterns::new("a,b").middle, "%,a,b,%");
    }
}
