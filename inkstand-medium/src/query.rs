//! GraphQL documents for the profile stream and the shapes they come back in.

use crate::types::{Cursor, Post};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPERATION_NAME: &str = "UserStreamOverview";

/// Fixed page size requested from the profile stream.
pub const PAGE_SIZE: usize = 25;

/// Full projection: id, link, publish date, tag ids and the author's name.
pub const FULL_QUERY: &str = r#"
query UserStreamOverview($userId: ID!, $pagingOptions: PagingOptions) {
  user(username: $userId) {
    name
    profileStreamConnection(paging: $pagingOptions) {
      ...commonStreamConnection
      __typename
    }
    __typename
  }
}
fragment commonStreamConnection on StreamConnection {
  pagingInfo {
    next {
      limit
      page
      source
      to
      ignoredIds
      __typename
    }
    __typename
  }
  stream {
    ...StreamItemList_streamItem
    __typename
  }
  __typename
}
fragment StreamItemList_streamItem on StreamItem {
  ...StreamItem_streamItem
  __typename
}
fragment StreamItem_streamItem on StreamItem {
  itemType {
    __typename
    ... on StreamItemPostPreview {
      post {
        id
        mediumUrl
        title
        firstPublishedAt
        tags {
          id
        }
        __typename
      }
      __typename
    }
  }
  __typename
}
"#;

/// Minimal projection: titles only.
pub const TITLES_QUERY: &str = r#"
query UserStreamOverview($userId: ID!, $pagingOptions: PagingOptions) {
  user(username: $userId) {
    profileStreamConnection(paging: $pagingOptions) {
      ...commonStreamConnection
      __typename
    }
    __typename
  }
}
fragment commonStreamConnection on StreamConnection {
  pagingInfo {
    next {
      limit
      to
      __typename
    }
    __typename
  }
  stream {
    ...StreamItemList_streamItem
    __typename
  }
  __typename
}
fragment StreamItemList_streamItem on StreamItem {
  ...StreamItem_streamItem
  __typename
}
fragment StreamItem_streamItem on StreamItem {
  itemType {
    __typename
    ... on StreamItemPostPreview {
      post {
        title
        __typename
      }
      __typename
    }
  }
  __typename
}
"#;

/// Which of the two documents a page request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Full,
    Titles,
}

impl Projection {
    fn query(self) -> &'static str {
        match self {
            Projection::Full => FULL_QUERY,
            Projection::Titles => TITLES_QUERY,
        }
    }
}

// ==============================
// Request
// ==============================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlBody<'a> {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables<'a> {
    pub user_id: &'a str,
    pub paging_options: PagingOptions,
}

/// The full query spells out every paging field (as nulls); the titles
/// query only sends `limit` and `to`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PagingOptions {
    #[serde(rename_all = "camelCase")]
    Full {
        limit: usize,
        page: Option<u32>,
        source: Option<String>,
        to: String,
        ignored_ids: Option<Vec<String>>,
    },
    Titles { limit: usize, to: String },
}

impl<'a> GraphqlBody<'a> {
    pub fn new(projection: Projection, username: &'a str, cursor: &Cursor) -> Self {
        let to = cursor.to_param();
        let paging_options = match projection {
            Projection::Full => PagingOptions::Full {
                limit: PAGE_SIZE,
                page: None,
                source: None,
                to,
                ignored_ids: None,
            },
            Projection::Titles => PagingOptions::Titles {
                limit: PAGE_SIZE,
                to,
            },
        };
        Self {
            operation_name: OPERATION_NAME,
            query: projection.query(),
            variables: Variables {
                user_id: username,
                paging_options,
            },
        }
    }
}

// ==============================
// Response
// ==============================

#[derive(Debug, Deserialize)]
pub struct StreamData {
    pub user: Option<StreamUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUser {
    #[serde(default)]
    pub name: Option<String>,
    pub profile_stream_connection: StreamConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConnection {
    #[serde(default)]
    pub paging_info: Option<PagingInfo>,
    #[serde(default)]
    pub stream: Vec<StreamItem>,
}

#[derive(Debug, Deserialize)]
pub struct PagingInfo {
    #[serde(default)]
    pub next: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
pub struct NextPage {
    /// String on the wire today; numbers are accepted too.
    #[serde(default)]
    pub to: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamItem {
    #[serde(default)]
    pub item_type: Option<ItemType>,
}

#[derive(Debug, Deserialize)]
pub struct ItemType {
    #[serde(default)]
    pub post: Option<StreamPost>,
}

/// Post node; the titles query only fills `title`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamPost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub medium_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_published_at: Option<i64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
pub struct Tag {
    pub id: String,
}

impl From<StreamPost> for Post {
    fn from(p: StreamPost) -> Self {
        Post {
            id: p.id,
            title: p.title,
            link: p.medium_url,
            pub_date: p.first_published_at,
            categories: p.tags.into_iter().map(|t| t.id).collect(),
        }
    }
}

impl StreamConnection {
    /// Next cursor, but only when this page came back exactly full.
    pub fn next_cursor(&self) -> Option<Cursor> {
        if self.stream.len() != PAGE_SIZE {
            return None;
        }
        let to = self.paging_info.as_ref()?.next.as_ref()?.to.as_ref()?;
        match to {
            Value::String(s) if !s.is_empty() => Some(Cursor::At(s.clone())),
            Value::Number(n) => Some(Cursor::At(n.to_string())),
            _ => None,
        }
    }

    /// Posts in stream order; items that are not post previews are dropped.
    pub fn into_posts(self) -> impl Iterator<Item = StreamPost> {
        self.stream
            .into_iter()
            .filter_map(|item| item.item_type.and_then(|t| t.post))
    }
}
