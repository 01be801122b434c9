//! Sequential pagination over a user's profile stream.
//!
//! Pages are requested one after another, each with the cursor the previous
//! page handed back. A page shorter than [`PAGE_SIZE`](crate::query::PAGE_SIZE)
//! ends the stream. `ClientConfig::max_pages` caps the number of requests so
//! a server that keeps returning full pages cannot spin the loop forever.
use crate::client::MediumClient;
use crate::error::{MediumError, Result};
use crate::types::{Cursor, Post, PostPage};
use futures::stream::BoxStream;
use futures::TryStreamExt;
use std::future::Future;

impl MediumClient {
    /// Every post of `username`, oldest page last, in arrival order.
    pub async fn get_posts(&self, username: &str) -> Result<Vec<Post>> {
        self.post_stream(username).try_collect().await
    }

    /// Titles only, same order and termination rules as [`MediumClient::get_posts`].
    pub async fn get_post_titles(&self, username: &str) -> Result<Vec<String>> {
        self.title_stream(username).try_collect().await
    }

    /// Posts yielded as their pages arrive. Dropping the stream stops paging.
    pub fn post_stream<'a>(&'a self, username: &'a str) -> BoxStream<'a, Result<Post>> {
        paginate(self.config().max_pages, move |cursor| async move {
            self.fetch_post_page(username, &cursor).await
        })
    }

    pub fn title_stream<'a>(&'a self, username: &'a str) -> BoxStream<'a, Result<String>> {
        paginate(self.config().max_pages, move |cursor| async move {
            self.fetch_title_page(username, &cursor).await
        })
    }
}

fn paginate<'a, T, F, Fut>(max_pages: Option<u32>, mut fetch: F) -> BoxStream<'a, Result<T>>
where
    T: Send + 'a,
    F: FnMut(Cursor) -> Fut + Send + 'a,
    Fut: Future<Output = Result<PostPage<T>>> + Send + 'a,
{
    Box::pin(async_stream::try_stream! {
        let mut next = Some(Cursor::Start);
        let mut pages = 0u32;

        while let Some(cursor) = next.take() {
            if let Some(limit) = max_pages {
                if pages >= limit {
                    Err::<(), _>(MediumError::PageLimit { pages })?;
                }
            }

            let page = fetch(cursor).await?;
            pages += 1;
            tracing::debug!(
                target: "medium.stream",
                page = pages,
                items = page.items.len(),
                has_next = page.next.is_some(),
                "medium.stream.page"
            );

            next = page.next;
            for item in page.items {
                yield item;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn page(n: usize, next: Option<&str>) -> PostPage<usize> {
        PostPage {
            author: None,
            items: (0..n).collect(),
            next: next.map(|s| Cursor::At(s.to_string())),
        }
    }

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = seen.clone();
        let items: Vec<usize> = paginate(None, move |cursor| {
            log.lock().unwrap().push(cursor.clone());
            async move {
                Ok(match cursor {
                    Cursor::Start => page(25, Some("a")),
                    Cursor::At(ref s) if s == "a" => page(25, Some("b")),
                    Cursor::At(_) => page(10, None),
                })
            }
        })
        .try_collect()
        .await
        .unwrap();

        assert_eq!(items.len(), 60);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Cursor::Start,
                Cursor::At("a".into()),
                Cursor::At("b".into())
            ]
        );
    }

    #[tokio::test]
    async fn page_guard_stops_endless_servers() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let err = paginate::<usize, _, _>(Some(3), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(page(25, Some("again"))) }
        })
        .try_collect::<Vec<_>>()
        .await
        .unwrap_err();

        assert!(matches!(err, MediumError::PageLimit { pages: 3 }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn first_error_ends_the_stream() {
        let mut stream = paginate::<usize, _, _>(None, |cursor| async move {
            match cursor {
                Cursor::Start => Ok(page(25, Some("boom"))),
                Cursor::At(_) => Err(MediumError::Unexpected("bad page".into())),
            }
        });

        let mut ok = 0;
        let mut failed = false;
        while let Some(item) = stream.next().await {
            match item {
                Ok(_) => ok += 1,
                Err(_) => failed = true,
            }
        }
        assert_eq!(ok, 25);
        assert!(failed);
    }
}
