use chrono::NaiveDateTime;

pub const TAG_SEPARATOR: char = ',';

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[sqlx(rename = "tags")]
    pub tag_string: String,
    pub url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Article {
    /// Splits the stored tag string on `,`. Empty tokens are kept.
    pub fn tags(&self) -> Vec<&str> {
        split_tags(&self.tag_string)
    }
}

pub fn split_tags(tag_string: &str) -> Vec<&str> {
    tag_string.split(TAG_SEPARATOR).collect()
}

/// The writable fields of an article, as submitted by the edit and new forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub body: String,
    pub url: String,
    pub tag_string: String,
}

impl ArticleDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        url: impl Into<String>,
        tag_string: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: url.into(),
            tag_string: tag_string.into(),
        }
    }
}
