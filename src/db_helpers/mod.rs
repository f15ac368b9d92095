mod article_helpers;
mod tag_helpers;

pub use article_helpers::*;
pub use tag_helpers::*;
