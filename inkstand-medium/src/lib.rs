//! Client for the Medium publishing API.
//!
//! Two surfaces live here: the bearer-authenticated REST API (current user,
//! publications, contributors, post creation) and the public GraphQL profile
//! stream, read page by page through [`MediumClient::post_stream`] and its
//! collected form [`MediumClient::get_posts`].
//!
//! ```no_run
//! use inkstand_medium::{ClientConfig, MediumClient, NewPost};
//!
//! # async fn demo() -> inkstand_medium::Result<()> {
//! let client = MediumClient::new(ClientConfig::new("token"))?;
//! let posts = client.get_posts("someone").await?;
//! let created = client.create_post(NewPost::new("Hello", "# Hello")).await?;
//! println!("{} posts, new one at {:?}", posts.len(), created.url);
//! # Ok(()) }
//! ```
pub mod client;
pub mod error;
pub mod query;
pub mod stream;
pub mod types;

pub use client::{ClientConfig, MediumClient};
pub use error::{DEFAULT_ERROR_CODE, MediumError, Result};
pub use types::{
    ContentFormat, Contributor, CreatedPost, Cursor, License, NewPost, Post, PostPage,
    Publication, PublishStatus, User,
};
