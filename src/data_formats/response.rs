use askama::Template;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::models::Article;

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encodes a url or tag for use as one path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

mod filters {
    pub fn segment<T: std::fmt::Display>(value: T) -> ::askama::Result<String> {
        Ok(super::encode_path_segment(&value.to_string()))
    }
}

#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub article: Article,
    pub authenticated: bool,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub article: Article,
    pub authenticated: bool,
}

#[derive(Template)]
#[template(path = "new.html")]
pub struct NewTemplate {
    pub authenticated: bool,
}

#[derive(Template)]
#[template(path = "tag.html")]
pub struct TagTemplate {
    pub heading: String,
    pub articles: Vec<Article>,
    pub authenticated: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(url: &str, tags: &str) -> Article {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Article {
            id: 1,
            title: "Title".to_string(),
            body: "Body".to_string(),
            tag_string: tags.to_string(),
            url: url.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode_path_segment("hello"), "hello");
        assert_eq!(encode_path_segment("a b/c?d"), "a%20b%2Fc%3Fd");
        assert_eq!(encode_path_segment("100%#x"), "100%25%23x");
    }

    #[test]
    fn view_links_are_percent_encoded() {
        let html = ViewTemplate {
            article: article("a b#c", "c#,d?e"),
            authenticated: true,
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"href="/edit/a%20b%23c""#));
        assert!(html.contains(r#"href="/delete/a%20b%23c""#));
        assert!(html.contains(r#"href="/tag/c%23""#));
        assert!(html.contains(r#"href="/tag/d%3Fe""#));
    }

    #[test]
    fn listing_links_are_percent_encoded() {
        let html = TagTemplate {
            heading: "All articles".to_string(),
            articles: vec![article("what?", "x")],
            authenticated: false,
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"href="/what%3F""#));
    }
}
