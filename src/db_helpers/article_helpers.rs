use sqlx::{Sqlite, Transaction};

use crate::models::{Article, ArticleDraft};

use super::tag_helpers::TagPatterns;

const ARTICLE_QUERY: &str = r#"
            SELECT id,
                   title,
                   body,
                   tags,
                   url,
                   created_at,
                   updated_at
            FROM   articles
"#;

const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

pub async fn insert_article(
    tx: &mut Transaction<'_, Sqlite>,
    ArticleDraft {
        title,
        body,
        url,
        tag_string,
    }: &ArticleDraft,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO articles (title, body, tags, url)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(title)
    .bind(body)
    .bind(tag_string)
    .bind(url)
    .execute(&mut *tx)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Returns the number of rows touched; zero means no article has `draft.url`.
pub async fn update_article_by_url(
    tx: &mut Transaction<'_, Sqlite>,
    ArticleDraft {
        title,
        body,
        url,
        tag_string,
    }: &ArticleDraft,
) -> Result<u64, sqlx::Error> {
    let query = format!(
        "UPDATE articles SET title = $1, body = $2, tags = $3, updated_at = {NOW} WHERE url = $4"
    );
    let result = sqlx::query(&query)
        .bind(title)
        .bind(body)
        .bind(tag_string)
        .bind(url)
        .execute(&mut *tx)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_article_by_url(
    tx: &mut Transaction<'_, Sqlite>,
    url: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM articles WHERE url = $1")
        .bind(url)
        .execute(&mut *tx)
        .await?;
    Ok(result.rows_affected())
}

pub async fn get_article_by_url(
    tx: &mut Transaction<'_, Sqlite>,
    url: &str,
) -> Result<Option<Article>, sqlx::Error> {
    let query = format!("{ARTICLE_QUERY} WHERE url = $1");
    sqlx::query_as::<Sqlite, Article>(&query)
        .bind(url)
        .fetch_optional(&mut *tx)
        .await
}

pub async fn list_all_articles(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<Vec<Article>, sqlx::Error> {
    let query = format!("{ARTICLE_QUERY} ORDER BY id DESC");
    sqlx::query_as::<Sqlite, Article>(&query)
        .fetch_all(&mut *tx)
        .await
}

pub async fn list_articles_by_tag(
    tx: &mut Transaction<'_, Sqlite>,
    patterns: TagPatterns,
) -> Result<Vec<Article>, sqlx::Error> {
    let query = format!(
        "{ARTICLE_QUERY} WHERE {} ORDER BY id DESC",
        TagPatterns::PREDICATE
    );
    let mut query = sqlx::query_as::<Sqlite, Article>(&query);
    for pattern in patterns.binds() {
        query = query.bind(pattern);
    }
    query.fetch_all(&mut *tx).await
}

pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    constraint_message(error).map_or(false, |message| message.contains("UNIQUE constraint failed"))
}

pub fn constraint_message(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(e) if e.message().contains("constraint failed") => {
            Some(e.message().to_owned())
        }
        _ => None,
    }
}
