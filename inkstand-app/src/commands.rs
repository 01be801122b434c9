use std::fs;

use anyhow::{Context, Result, bail};
use futures::TryStreamExt;
use inkstand_config::InkstandConfig;
use inkstand_medium::{MediumClient, NewPost};
use inkstand_web::ArticleFetcher;
use serde::Serialize;

use crate::cli::{Command, PublishArgs};
use crate::settings;

pub async fn dispatch(command: Command, cfg: &InkstandConfig) -> Result<()> {
    match command {
        Command::Article { url } => {
            let fetcher = ArticleFetcher::new(settings::extractor(&cfg.article)?);
            print_json(&fetcher.fetch(&url).await?)
        }
        Command::Me => {
            let client = authenticated(cfg)?;
            print_json(&client.get_user().await?)
        }
        Command::Publications { user_id } => {
            let client = authenticated(cfg)?;
            let user_id = match user_id {
                Some(id) => id,
                None => client.get_user().await?.id,
            };
            print_json(&client.get_publications_for_user(&user_id).await?)
        }
        Command::Contributors { publication_id } => {
            let client = authenticated(cfg)?;
            print_json(&client.get_contributors_for_publication(&publication_id).await?)
        }
        Command::Posts { username, titles } => {
            // The profile stream is public; no token needed.
            let client = MediumClient::new(settings::client_config(&cfg.medium)?)?;
            if titles {
                let titles: Vec<String> = client.title_stream(&username).try_collect().await?;
                tracing::info!(username = %username, count = titles.len(), "posts.titles");
                print_json(&titles)
            } else {
                let posts: Vec<_> = client.post_stream(&username).try_collect().await?;
                tracing::info!(username = %username, count = posts.len(), "posts.listed");
                print_json(&posts)
            }
        }
        Command::Publish(args) => publish(args, cfg).await,
    }
}

async fn publish(args: PublishArgs, cfg: &InkstandConfig) -> Result<()> {
    let client = authenticated(cfg)?;

    let content = match (&args.file, args.content) {
        (Some(path), _) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, Some(content)) => content,
        (None, None) => bail!("either --file or --content is required"),
    };

    let mut post = NewPost::new(args.title, content);
    if let Some(user_id) = args.user_id {
        post = post.with_user_id(user_id);
    }
    if !args.tags.is_empty() {
        post = post.with_tags(args.tags);
    }
    if let Some(url) = args.canonical_url {
        post = post.with_canonical_url(url);
    }
    if let Some(at) = args.published_at {
        post = post.with_published_at(at);
    }
    if let Some(status) = args.status {
        post = post.with_publish_status(status);
    }
    if let Some(license) = args.license {
        post = post.with_license(license);
    }
    if let Some(format) = args.format {
        post = post.with_content_format(format);
    }

    let created = match args.publication {
        Some(publication_id) => client.create_post_in_publication(&publication_id, post).await?,
        None => client.create_post(post).await?,
    };
    tracing::info!(post_id = %created.id, url = ?created.url, "post.created");
    print_json(&created)
}

fn authenticated(cfg: &InkstandConfig) -> Result<MediumClient> {
    let config = settings::client_config(&cfg.medium)?;
    if config.access_token.is_empty() {
        bail!("no access token configured (set MEDIUM_ACCESS_TOKEN or medium.access_token)");
    }
    Ok(MediumClient::new(config)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}
