use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{header::SET_COOKIE, StatusCode, Uri},
    response::{IntoResponse, Redirect},
    Extension, Form,
};

use crate::{
    articles::ArticleService,
    authentication::{expired_session_cookie, session_cookie, AdminSession, Session, SessionGate},
    data_formats::{
        encode_path_segment, ArticleForm, EditTemplate, HtmlTemplate, LoginForm, LoginTemplate,
        NewArticleForm, NewTemplate, SearchQuery, TagTemplate, ViewTemplate,
    },
    db_helpers::{is_wildcard, WILDCARD_TAG},
    errors::RequestError,
    models::ArticleDraft,
};

type Articles = Extension<Arc<ArticleService>>;
type HtmlResult<T> = Result<HtmlTemplate<T>, RequestError>;

fn article_location(url: &str) -> String {
    format!("/{}", encode_path_segment(url))
}

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    )
}

// ----------------- Article Handlers -----------------
pub async fn index(
    Extension(articles): Articles,
    Session { authenticated }: Session,
) -> HtmlTemplate<TagTemplate> {
    HtmlTemplate(TagTemplate {
        heading: "All articles".to_string(),
        articles: articles.all_articles().await.to_vec(),
        authenticated,
    })
}

pub async fn view_article(
    Extension(articles): Articles,
    Session { authenticated }: Session,
    Path(url): Path<String>,
) -> HtmlResult<ViewTemplate> {
    let article = articles.find_by_url(&url).await?;
    Ok(HtmlTemplate(ViewTemplate {
        article,
        authenticated,
    }))
}

pub async fn list_tagged(
    Extension(articles): Articles,
    Session { authenticated }: Session,
    Path(tag): Path<String>,
) -> HtmlResult<TagTemplate> {
    render_tag_listing(&articles, &tag, authenticated).await
}

/// Search form target. An empty query lists everything.
pub async fn search(
    Extension(articles): Articles,
    Session { authenticated }: Session,
    Query(SearchQuery { tag }): Query<SearchQuery>,
) -> HtmlResult<TagTemplate> {
    let tag = tag.trim();
    let tag = if tag.is_empty() { WILDCARD_TAG } else { tag };
    render_tag_listing(&articles, tag, authenticated).await
}

async fn render_tag_listing(
    articles: &ArticleService,
    tag: &str,
    authenticated: bool,
) -> HtmlResult<TagTemplate> {
    let heading = if is_wildcard(tag) {
        "All articles".to_string()
    } else {
        format!("Articles tagged \"{tag}\"")
    };
    Ok(HtmlTemplate(TagTemplate {
        heading,
        articles: articles.find_by_tag(tag).await?,
        authenticated,
    }))
}

pub async fn edit_article(
    _: AdminSession,
    Extension(articles): Articles,
    Path(url): Path<String>,
) -> HtmlResult<EditTemplate> {
    let article = articles.find_by_url(&url).await?;
    Ok(HtmlTemplate(EditTemplate {
        article,
        authenticated: true,
    }))
}

pub async fn save_article(
    _: AdminSession,
    Extension(articles): Articles,
    Path(url): Path<String>,
    Form(form): Form<ArticleForm>,
) -> Result<Redirect, RequestError> {
    save_and_redirect(&articles, form.into_draft(url)).await
}

pub async fn new_article_form(_: AdminSession) -> HtmlTemplate<NewTemplate> {
    HtmlTemplate(NewTemplate {
        authenticated: true,
    })
}

pub async fn create_article(
    _: AdminSession,
    Extension(articles): Articles,
    Form(NewArticleForm { url, article }): Form<NewArticleForm>,
) -> Result<Redirect, RequestError> {
    save_and_redirect(&articles, article.into_draft(url)).await
}

async fn save_and_redirect(
    articles: &ArticleService,
    draft: ArticleDraft,
) -> Result<Redirect, RequestError> {
    articles.save(&draft).await?;
    Ok(Redirect::to(&article_location(&draft.url)))
}

/// Unknown urls answer 404; the delete itself is idempotent.
pub async fn delete_article(
    _: AdminSession,
    Extension(articles): Articles,
    Path(url): Path<String>,
) -> Result<Redirect, RequestError> {
    articles.find_by_url(&url).await?;
    articles.delete(&url).await?;
    Ok(Redirect::to("/"))
}

// ----------------- Session Handlers -----------------
pub async fn login_form(Session { authenticated }: Session) -> HtmlTemplate<LoginTemplate> {
    HtmlTemplate(LoginTemplate { authenticated })
}

pub async fn login(
    Extension(gate): Extension<Arc<SessionGate>>,
    Form(LoginForm { name, password }): Form<LoginForm>,
) -> Result<impl IntoResponse, RequestError> {
    match gate.login(&name, password).await? {
        Some(token) => Ok((
            [(SET_COOKIE, session_cookie(&token))],
            Redirect::to("/"),
        )
            .into_response()),
        None => Ok(Redirect::to("/login").into_response()),
    }
}

pub async fn logout(Extension(gate): Extension<Arc<SessionGate>>) -> impl IntoResponse {
    gate.logout().await;
    ([(SET_COOKIE, expired_session_cookie())], Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_location_encodes_reserved_characters() {
        assert_eq!(article_location("hello"), "/hello");
        assert_eq!(article_location("a b/c?d"), "/a%20b%2Fc%3Fd");
        assert_eq!(article_location("100%"), "/100%25");
    }
}
