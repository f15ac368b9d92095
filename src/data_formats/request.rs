use serde::Deserialize;

use crate::models::ArticleDraft;

// ----------------- Article Forms -----------------
#[derive(Deserialize, Debug)]
pub struct ArticleForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: String,
}

/// The creation form also carries the url, which the edit form takes from
/// the path.
#[derive(Deserialize, Debug)]
pub struct NewArticleForm {
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub article: ArticleForm,
}

impl ArticleForm {
    pub fn into_draft(self, url: String) -> ArticleDraft {
        ArticleDraft {
            title: self.title,
            body: self.body,
            url,
            tag_string: self.tags,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub tag: String,
}

// ----------------- Session Forms -----------------
#[derive(Deserialize, Debug)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}
