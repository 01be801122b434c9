use crate::error::MediumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Declares a closed string enum with its wire spelling shared by serde,
/// `Display` and `FromStr`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MediumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(MediumError::Validation(format!(
                        "invalid {} \"{}\" (expected one of: {})",
                        $what,
                        other,
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Visibility of a newly created post.
    PublishStatus, "publish status" {
        Draft => "draft",
        Unlisted => "unlisted",
        Public => "public",
    }
}

wire_enum! {
    /// Markup flavour of the `content` field.
    ContentFormat, "content format" {
        Html => "html",
        Markdown => "markdown",
    }
}

wire_enum! {
    License, "license" {
        AllRightsReserved => "all-rights-reserved",
        Cc40By => "cc-40-by",
        Cc40ByNd => "cc-40-by-nd",
        Cc40BySa => "cc-40-by-sa",
        Cc40ByNc => "cc-40-by-nc",
        Cc40ByNcNd => "cc-40-by-nc-nd",
        Cc40ByNcSa => "cc-40-by-nc-sa",
        Cc40Zero => "cc-40-zero",
        PublicDomain => "public-domain",
    }
}

// ==============================
// REST resources
// ==============================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub publication_id: String,
    pub user_id: String,
    /// `editor` or `writer`.
    pub role: String,
}

/// A post as echoed back by the create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub publish_status: Option<PublishStatus>,
    #[serde(default)]
    pub published_at: Option<i64>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub publication_id: Option<String>,
}

/// Options for creating a post.
///
/// Only `title` and `content` are mandatory. Unset `license`,
/// `publish_status` and `content_format` fall back to the client defaults.
///
/// ```
/// use inkstand_medium::{NewPost, PublishStatus};
///
/// let post = NewPost::new("Hello", "# Hello")
///     .with_tags(["rust", "http"])
///     .with_publish_status(PublishStatus::Unlisted);
/// assert_eq!(post.tags.as_ref().map(Vec::len), Some(2));
/// assert!(post.user_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub canonical_url: Option<String>,
    pub license: Option<License>,
    pub published_at: Option<String>,
    pub publish_status: Option<PublishStatus>,
    pub content_format: Option<ContentFormat>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_canonical_url(mut self, url: impl Into<String>) -> Self {
        self.canonical_url = Some(url.into());
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_publish_status(mut self, status: PublishStatus) -> Self {
        self.publish_status = Some(status);
        self
    }

    pub fn with_content_format(mut self, format: ContentFormat) -> Self {
        self.content_format = Some(format);
        self
    }
}

/// Outgoing JSON body shared by both create endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostBody<'a> {
    pub title: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_status: Option<PublishStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

// ==============================
// Profile stream
// ==============================

/// One post from a user's profile stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub link: String,
    /// Unix epoch milliseconds of first publication.
    pub pub_date: Option<i64>,
    pub categories: Vec<String>,
}

impl Post {
    pub fn published_at_utc(&self) -> Option<OffsetDateTime> {
        let millis = self.pub_date?;
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
    }
}

/// Position in a paginated profile stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Start from the current instant.
    Start,
    /// Opaque `to` token handed out by the server.
    At(String),
}

impl Cursor {
    /// Value sent as `pagingOptions.to`.
    pub fn to_param(&self) -> String {
        match self {
            Cursor::Start => now_millis().to_string(),
            Cursor::At(token) => token.clone(),
        }
    }
}

fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

/// One page of a profile stream. `next == None` ends the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage<T> {
    pub author: Option<String>,
    pub items: Vec<T>,
    pub next: Option<Cursor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_their_wire_spelling() {
        for license in License::ALL {
            assert_eq!(license.as_str().parse::<License>().unwrap(), *license);
        }
        assert_eq!(License::ALL.len(), 9);
        assert_eq!(
            serde_json::to_value(PublishStatus::Unlisted).unwrap(),
            serde_json::json!("unlisted")
        );
    }

    #[test]
    fn unknown_spelling_is_rejected() {
        let err = "secret".parse::<PublishStatus>().unwrap_err();
        assert!(matches!(err, MediumError::Validation(_)));
        assert!(err.to_string().contains("draft, unlisted, public"));
        assert!("MARKDOWN".parse::<ContentFormat>().is_err());
    }

    #[test]
    fn post_body_skips_unset_fields() {
        let body = PostBody {
            title: "t",
            content: "c",
            content_format: Some(ContentFormat::Html),
            tags: None,
            canonical_url: None,
            published_at: None,
            publish_status: None,
            license: Some(License::Cc40Zero),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "title": "t",
                "content": "c",
                "contentFormat": "html",
                "license": "cc-40-zero"
            })
        );
    }

    #[test]
    fn start_cursor_uses_current_millis() {
        let before = now_millis();
        let to: i128 = Cursor::Start.to_param().parse().unwrap();
        assert!(to >= before);
        assert_eq!(Cursor::At("1690000000000".into()).to_param(), "1690000000000");
    }

    #[test]
    fn pub_date_converts_to_utc() {
        let post = Post {
            id: "a".into(),
            title: "t".into(),
            link: "https://medium.com/p/a".into(),
            pub_date: Some(1_501_756_968_314),
            categories: vec![],
        };
        let at = post.published_at_utc().unwrap();
        assert_eq!(at.year(), 2017);
        assert_eq!(at.month(), time::Month::August);
    }
}
