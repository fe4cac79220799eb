use anyhow::Result;
use clap::Parser;
use newsrpm::api::{ArticleQuery, IndexValue, IndexedDataQuery, split_list};
use newsrpm::commands::{self, ArticleRef, ConfigOverrides};
use newsrpm::config::AuthMode;
use newsrpm::error::NewsRpmError;
use std::path::PathBuf;

/// newsrpm - NewsRPM API client
///
/// Search, fetch and upload news articles through the NewsRPM API.
///
/// The API key is read from --api-key, the NEWSRPM_API_KEY environment
/// variable, or the `apiKey` field of the config file.
///
/// Examples:
///   newsrpm search --fulltext "AI" --count 10
///   newsrpm article slug my-article-slug
///   newsrpm index publisher --value "Reuters,BBC"
///   newsrpm providers --save providers.json
#[derive(Parser, Debug)]
#[command(author, version = env!("NEWSRPM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (JSON; the client object or a document with a "newsrpm" key)
    #[arg(long, short = 'c', env = "NEWSRPM_CONFIG", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// API key
    #[arg(long, env = "NEWSRPM_API_KEY", value_name = "KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL (defaults to https://api.newsrpm.com)
    #[arg(long, env = "NEWSRPM_BASE_URL", value_name = "URL", global = true)]
    base_url: Option<String>,

    /// How the API key is sent
    #[arg(long, env = "NEWSRPM_AUTH_MODE", value_enum, global = true)]
    auth_mode: Option<AuthMode>,

    /// Per-attempt request timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    timeout_ms: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search indexed data by key
    Index(IndexArgs),

    /// Search articles with filters
    Search(SearchArgs),

    /// Get an article by slug or id
    Article(ArticleArgs),

    /// List available news providers
    Providers(SaveArgs),

    /// Get article body content
    Body(BodyArgs),

    /// Upload an article from a JSON file
    Upload(UploadArgs),
}

#[derive(clap::Args, Debug)]
struct SaveArgs {
    /// Save the raw JSON response to a file
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

/// Paging and date range shared by the search commands.
#[derive(clap::Args, Debug)]
struct RangeArgs {
    /// Limit number of results
    #[arg(long, value_name = "N")]
    count: Option<u64>,

    /// Skip number of results
    #[arg(long, value_name = "N")]
    offset: Option<u64>,

    /// Minimum date (ISO format)
    #[arg(long, value_name = "ISO")]
    min: Option<String>,

    /// Maximum date (ISO format)
    #[arg(long, value_name = "ISO")]
    max: Option<String>,
}

#[derive(clap::Args, Debug)]
struct IndexArgs {
    /// Indexed data key, e.g. "publisher" or "topic"
    #[arg(value_name = "KEY")]
    key: String,

    /// Filter by value(s), comma-separated for multiple
    #[arg(long, value_name = "VALUES")]
    value: Option<String>,

    /// Sort order
    #[arg(long)]
    order: Option<String>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    save: SaveArgs,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Filter by publisher(s), comma-separated
    #[arg(long, value_name = "NAMES")]
    publisher: Option<String>,

    /// Filter by provider(s), comma-separated
    #[arg(long, value_name = "NAMES")]
    provider: Option<String>,

    /// Filter by type(s), comma-separated
    #[arg(long = "type", value_name = "TYPES")]
    kind: Option<String>,

    /// Full-text search query
    #[arg(long, value_name = "QUERY")]
    fulltext: Option<String>,

    /// Filter by sponsored status
    #[arg(long, value_name = "BOOL")]
    sponsored: Option<bool>,

    /// Filter by language
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    save: SaveArgs,
}

#[derive(clap::Args, Debug)]
struct ArticleArgs {
    #[command(subcommand)]
    by: ArticleBy,
}

#[derive(clap::Subcommand, Debug)]
enum ArticleBy {
    /// Get article by slug
    Slug {
        slug: String,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Get article by id
    Id {
        id: i64,
        #[command(flatten)]
        save: SaveArgs,
    },
}

#[derive(clap::Args, Debug)]
struct BodyArgs {
    #[arg(value_name = "BODY_ID")]
    body_id: String,

    /// Render the body content
    #[arg(long)]
    render: bool,

    #[command(flatten)]
    save: SaveArgs,
}

#[derive(clap::Args, Debug)]
struct UploadArgs {
    /// Article JSON file
    #[arg(long, value_name = "PATH")]
    json: PathBuf,
}

fn list_flag(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(split_list).filter(|values| !values.is_empty())
}

fn index_query(args: &IndexArgs) -> IndexedDataQuery {
    IndexedDataQuery {
        key: args.key.clone(),
        value: args.value.as_deref().and_then(IndexValue::parse),
        count: args.range.count,
        offset: args.range.offset,
        min_date: args.range.min.clone(),
        max_date: args.range.max.clone(),
        order: args.order.clone().filter(|o| !o.is_empty()),
    }
}

fn article_query(args: &SearchArgs) -> ArticleQuery {
    ArticleQuery {
        publisher: list_flag(args.publisher.as_deref()),
        provider: list_flag(args.provider.as_deref()),
        kind: list_flag(args.kind.as_deref()),
        full_text: args.fulltext.clone(),
        sponsored: args.sponsored,
        count: args.range.count,
        offset: args.range.offset,
        min_date: args.range.min.clone(),
        max_date: args.range.max.clone(),
        language: args.language.clone(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let runtime = newsrpm::runtime::RealRuntime;
    let overrides = ConfigOverrides {
        config_path: cli.config,
        api_key: cli.api_key,
        base_url: cli.base_url,
        auth_mode: cli.auth_mode,
        timeout_ms: cli.timeout_ms,
    };
    let client = commands::connect(&runtime, overrides)?;

    match cli.command {
        Commands::Index(args) => {
            commands::index(&client, &runtime, &index_query(&args), args.save.save.as_deref()).await
        }
        Commands::Search(args) => {
            commands::search(&client, &runtime, &article_query(&args), args.save.save.as_deref())
                .await
        }
        Commands::Article(args) => {
            let (target, save) = match args.by {
                ArticleBy::Slug { slug, save } => (ArticleRef::Slug(slug), save.save),
                ArticleBy::Id { id, save } => (ArticleRef::Id(id), save.save),
            };
            commands::article(&client, &runtime, &target, save.as_deref()).await
        }
        Commands::Providers(args) => {
            commands::providers(&client, &runtime, args.save.as_deref()).await
        }
        Commands::Body(args) => {
            commands::body(
                &client,
                &runtime,
                &args.body_id,
                args.render,
                args.save.save.as_deref(),
            )
            .await
        }
        Commands::Upload(args) => commands::upload(&client, &runtime, &args.json).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("NewsRPM command error: {:#}", e);
        if let Some(hint) = e.downcast_ref::<NewsRpmError>().and_then(NewsRpmError::hint) {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}
