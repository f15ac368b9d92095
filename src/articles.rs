use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::{
    db_helpers::{
        constraint_message, delete_article_by_url, get_article_by_url, insert_article,
        is_unique_violation, is_wildcard, list_all_articles, list_articles_by_tag,
        update_article_by_url, TagPatterns, WILDCARD_TAG,
    },
    errors::ArticleError,
    models::{Article, ArticleDraft},
};

/// Article persistence plus the cached full collection shown on the index.
///
/// The cache starts empty and is refreshed from storage after every
/// mutation; readers get a cloned snapshot.
pub struct ArticleService {
    pool: SqlitePool,
    all_articles: RwLock<Arc<Vec<Article>>>,
}

impl ArticleService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            all_articles: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Inserts the draft, or updates the article with the same url when the
    /// insert hits a uniqueness constraint.
    pub async fn save(&self, draft: &ArticleDraft) -> Result<(), ArticleError> {
        if draft.url.is_empty() {
            return Err(ArticleError::Validation("URL cannot be empty".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        match insert_article(&mut tx, draft).await {
            Ok(id) => info!(id, url = %draft.url, "article created"),
            Err(e) if is_unique_violation(&e) => {
                debug!(url = %draft.url, "insert collided, updating instead: {}", e);
                let rows = update_article_by_url(&mut tx, draft)
                    .await
                    .map_err(into_constraint_error)?;
                if rows == 0 {
                    return Err(ArticleError::Validation(format!(
                        "no article with url `{}` to update",
                        draft.url
                    )));
                }
                info!(url = %draft.url, "article updated");
            }
            Err(e) => return Err(into_constraint_error(e)),
        }
        tx.commit().await?;

        self.refresh_cache().await;
        Ok(())
    }

    pub async fn find_by_url(&self, url: &str) -> Result<Article, ArticleError> {
        let mut tx = self.pool.begin().await?;
        let article = get_article_by_url(&mut tx, url).await?;
        tx.commit().await?;
        article.ok_or_else(|| ArticleError::not_found(url))
    }

    /// Most recent first. The wildcard tag returns every article.
    pub async fn find_by_tag(&self, tag: &str) -> Result<Vec<Article>, ArticleError> {
        let mut tx = self.pool.begin().await?;
        let articles = if is_wildcard(tag) {
            list_all_articles(&mut tx).await?
        } else {
            list_articles_by_tag(&mut tx, TagPatterns::new(tag)).await?
        };
        tx.commit().await?;
        Ok(articles)
    }

    /// Returns whether an article was removed. A missing url is not an error.
    pub async fn delete(&self, url: &str) -> Result<bool, ArticleError> {
        let mut tx = self.pool.begin().await?;
        let rows = delete_article_by_url(&mut tx, url).await?;
        tx.commit().await?;
        if rows > 0 {
            info!(url, "article deleted");
            self.refresh_cache().await;
        }
        Ok(rows > 0)
    }

    pub async fn all_articles(&self) -> Arc<Vec<Article>> {
        self.all_articles.read().await.clone()
    }

    /// The write lock is held across the query so a slower reload cannot
    /// replace a newer snapshot.
    pub async fn reload(&self) -> Result<(), ArticleError> {
        let mut cache = self.all_articles.write().await;
        let articles = self.find_by_tag(WILDCARD_TAG).await?;
        debug!(count = articles.len(), "article cache reloaded");
        *cache = Arc::new(articles);
        Ok(())
    }

    /// Reload after a committed mutation. The write already succeeded, so a
    /// failure here only leaves the cache stale until the next change.
    async fn refresh_cache(&self) {
        if let Err(e) = self.reload().await {
            error!("Failed to reload article cache: {:?}", e);
        }
    }
}

fn into_constraint_error(error: sqlx::Error) -> ArticleError {
    match constraint_message(&error) {
        Some(message) => ArticleError::Constraint(message),
        None => ArticleError::Database(error),
    }
}
