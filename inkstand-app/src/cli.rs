use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use inkstand_medium::{ContentFormat, License, PublishStatus};

/// Publish to Medium, list a writer's posts, and pull articles off the web.
#[derive(Parser, Debug)]
#[command(name = "inkstand", version, about, long_about = None)]
pub struct Cli {
    /// YAML config file; `inkstand.yaml` in the working directory is read when present
    #[arg(long, short, global = true, env = "INKSTAND_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug-level logs, mirrored to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a web page and print the extracted article as JSON
    Article {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show the user the access token belongs to
    Me,

    /// List publications a user follows, contributes to or owns
    Publications {
        /// Defaults to the authenticated user
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
    },

    /// List editors and writers of a publication
    Contributors {
        #[arg(value_name = "PUBLICATION_ID")]
        publication_id: String,
    },

    /// Walk a writer's profile stream
    Posts {
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Only print titles
        #[arg(long)]
        titles: bool,
    },

    /// Create a post on the user's profile or in a publication
    Publish(PublishArgs),
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("body").required(true).args(["file", "content"])))]
pub struct PublishArgs {
    #[arg(long)]
    pub title: String,

    /// Read the post body from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Post body given inline
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,

    /// Skip the `/v1/me` lookup by naming the author directly
    #[arg(long, value_name = "ID", conflicts_with = "publication")]
    pub user_id: Option<String>,

    /// Publish into this publication instead of the user's profile
    #[arg(long, value_name = "ID")]
    pub publication: Option<String>,

    /// Repeat for several tags
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(long, value_name = "URL")]
    pub canonical_url: Option<String>,

    /// Backdate the post (ISO 8601)
    #[arg(long, value_name = "TIMESTAMP")]
    pub published_at: Option<String>,

    /// draft, unlisted or public; falls back to the configured default
    #[arg(long, value_name = "STATUS")]
    pub status: Option<PublishStatus>,

    /// Falls back to the configured default
    #[arg(long, value_name = "LICENSE")]
    pub license: Option<License>,

    /// html or markdown; falls back to the configured default
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ContentFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn publish_needs_exactly_one_body_source() {
        assert!(Cli::try_parse_from(["inkstand", "publish", "--title", "T"]).is_err());
        assert!(
            Cli::try_parse_from([
                "inkstand", "publish", "--title", "T", "--file", "a.md", "--content", "x"
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from([
            "inkstand", "publish", "--title", "T", "--content", "# Hi", "--tag", "a", "--tag",
            "b", "--status", "public", "--license", "cc-40-zero",
        ])
        .unwrap();
        let Command::Publish(args) = cli.command else {
            panic!("expected publish");
        };
        assert_eq!(args.tags, vec!["a", "b"]);
        assert_eq!(args.status, Some(PublishStatus::Public));
        assert_eq!(args.license, Some(License::Cc40Zero));
    }

    #[test]
    fn closed_sets_are_checked_while_parsing() {
        let err = Cli::try_parse_from([
            "inkstand", "publish", "--title", "T", "--content", "x", "--status", "published",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("invalid publish status"));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["inkstand", "posts", "someone", "--titles", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Posts { titles: true, .. }));
    }
}
