//! Article acquisition for Inkstand.
//!
//! - [`Article`] record and the [`ArticleExtractor`] seam (`article`)
//! - Default download-and-parse extractor built on `scraper` (`extract`)

pub mod article;
pub mod extract;

pub use article::{Article, ArticleError, ArticleExtractor, ArticleFetcher};
pub use extract::{HtmlExtractor, parse_article};
