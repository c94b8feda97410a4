mod display;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use controversy_client::{Page, ScoreClient};
use controversy_core::rating::entry_control_id;
use controversy_core::{EntryRating, PageContext, RatingTier, RequestId, Selection, StatusTarget};
use controversy_store::{CookieJar, IdentityStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PAGE: &str = "http://localhost:8080/controversy_webservice/controversy.html";

#[derive(Parser, Debug)]
#[command(name = "controversy", version, about = "Score pages and text for controversy")]
struct Cli {
    /// Cookie jar holding the anonymous user id.
    #[arg(long, env = "CONTROVERSY_COOKIE_JAR", global = true)]
    cookie_jar: Option<PathBuf>,

    /// Store the id expiry in a separate `expires` cookie, as the deployed page does.
    #[arg(long, global = true)]
    legacy_expires_cookie: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a controversy score and optionally rate the result.
    Detect(DetectArgs),
    /// Rate a previously scored page or text (1-5).
    RateUrl(RateUrlArgs),
    /// Rate a Wikipedia entry's relevance (1-4).
    RateEntry(RateEntryArgs),
    /// Turn a selection into the client page URL the bookmarklet would open.
    Bookmarklet(BookmarkletArgs),
    /// Show or reset the anonymous user id.
    Whoami {
        /// Drop all cookies and issue a fresh id.
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Client page location, including any `url`/`text` query parameters.
    #[arg(long, env = "CONTROVERSY_PAGE", default_value = DEFAULT_PAGE)]
    page: String,

    /// Target URL; overrides the page's `url` parameter.
    #[arg(long)]
    url: Option<String>,

    /// Selected text; overrides the page's `text` parameter.
    #[arg(long)]
    text: Option<String>,
}

#[derive(Args, Debug)]
struct DetectArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Rate the scored page or text once the score arrives.
    #[arg(long, value_parser = parse_tier)]
    rate: Option<RatingTier>,

    /// Rate an offered entry, as `ENTRY=RATING`. Repeatable.
    #[arg(long = "rate-entry", value_parser = parse_entry_rating)]
    rate_entries: Vec<(String, EntryRating)>,

    /// Print the scorer's debug diagnostics.
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Args, Debug)]
struct RateUrlArgs {
    #[command(flatten)]
    page: PageArgs,

    #[arg(long)]
    request_id: String,

    #[arg(value_parser = parse_tier)]
    rating: RatingTier,
}

#[derive(Args, Debug)]
struct RateEntryArgs {
    #[command(flatten)]
    page: PageArgs,

    #[arg(long)]
    request_id: String,

    #[arg(long)]
    entry: String,

    #[arg(value_parser = parse_entry_rating_value)]
    rating: EntryRating,
}

#[derive(Args, Debug)]
struct BookmarkletArgs {
    /// Client page the bookmarklet opens.
    #[arg(long, env = "CONTROVERSY_PAGE", default_value = DEFAULT_PAGE)]
    page: String,

    /// Location of the page the selection was made on.
    #[arg(long, default_value = "")]
    location: String,

    /// Selected HTML, one value per range. Read from stdin when omitted.
    #[arg(long)]
    selection: Vec<String>,

    /// Print the `javascript:` bookmarklet instead of a launch URL.
    #[arg(long)]
    script: bool,
}

fn parse_tier(s: &str) -> Result<RatingTier, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_entry_rating_value(s: &str) -> Result<EntryRating, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_entry_rating(s: &str) -> Result<(String, EntryRating), String> {
    let (entry, rating) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected ENTRY=RATING, got '{s}'"))?;
    Ok((entry.to_string(), parse_entry_rating_value(rating)?))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_cookie_jar() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("controversy").join("cookies.json"))
        .unwrap_or_else(|| PathBuf::from(".controversy-cookies.json"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("controversy v{}", env!("CARGO_PKG_VERSION"));

    let jar_path = cli.cookie_jar.clone().unwrap_or_else(default_cookie_jar);
    let jar = CookieJar::open(&jar_path)
        .with_context(|| format!("opening cookie jar {}", jar_path.display()))?;
    let mut identity = IdentityStore::new(jar).with_legacy_expires_cookie(cli.legacy_expires_cookie);

    match cli.command {
        Command::Detect(args) => run_detect(&mut identity, args).await,
        Command::RateUrl(args) => run_rate_url(&mut identity, args).await,
        Command::RateEntry(args) => run_rate_entry(&mut identity, args).await,
        Command::Bookmarklet(args) => run_bookmarklet(args),
        Command::Whoami { reset } => run_whoami(&mut identity, reset),
    }
}

fn load_context(identity: &mut IdentityStore, args: PageArgs) -> anyhow::Result<PageContext> {
    let userid = identity
        .get_or_create_user_id()
        .context("reading anonymous user id")?;
    let mut ctx = PageContext::from_location(&args.page, userid)
        .with_context(|| format!("parsing client page location '{}'", args.page))?;
    if let Some(url) = args.url {
        ctx.url = url;
    }
    if let Some(text) = args.text {
        ctx.text = text;
    }
    Ok(ctx)
}

/// Client that carries the jar's cookies, as the page's own requests do.
fn score_client(identity: &IdentityStore) -> anyhow::Result<ScoreClient> {
    ScoreClient::with_cookie_header(&identity.cookie_header()).context("building HTTP client")
}

async fn run_detect(identity: &mut IdentityStore, args: DetectArgs) -> anyhow::Result<()> {
    let ctx = load_context(identity, args.page)?;
    let mut page = Page::new(score_client(identity)?, ctx);

    let patch = page.request_controversy_score(&mut rand::rng()).await;
    print!("{}", display::format_detect(&patch, args.diagnostics));
    if let Some(err) = &patch.network_error {
        bail!("score request failed: {err}");
    }

    let mut tasks = Vec::new();
    if let Some(rating) = args.rate {
        if patch.url_rating.is_none() {
            warn!("server did not offer a url rating; submitting anyway");
        }
        tasks.push(page.submit_url_rating(rating));
    }
    let rows = patch
        .entry_rating
        .as_ref()
        .map(|f| f.rows.as_slice())
        .unwrap_or_default();
    for (entry, rating) in args.rate_entries {
        let Some(row) = rows
            .iter()
            .find(|r| r.entry == entry || r.link.label == entry)
        else {
            warn!(entry = %entry, "entry was not offered for rating; skipping");
            continue;
        };
        let control_id = entry_control_id(&row.element_id, rating);
        tasks.push(page.submit_entry_rating(&row.entry, &control_id, rating));
    }

    let mut failed = false;
    for result in futures::future::join_all(tasks).await {
        let patch = result.context("rating task panicked")?;
        failed |= patch.network_error.is_some();
        print!("{}", display::format_rating(&patch));
    }
    if failed {
        bail!("one or more rating submissions failed");
    }
    Ok(())
}

async fn run_rate_url(identity: &mut IdentityStore, args: RateUrlArgs) -> anyhow::Result<()> {
    let mut ctx = load_context(identity, args.page)?;
    ctx.request_id = Some(RequestId::new(args.request_id));
    let page = Page::new(score_client(identity)?, ctx);
    let patch = page.submit_url_rating(args.rating).await?;
    print!("{}", display::format_rating(&patch));
    if let Some(err) = patch.network_error {
        bail!("rating submission failed: {err}");
    }
    Ok(())
}

async fn run_rate_entry(identity: &mut IdentityStore, args: RateEntryArgs) -> anyhow::Result<()> {
    let mut ctx = load_context(identity, args.page)?;
    ctx.request_id = Some(RequestId::new(args.request_id));
    let page = Page::new(score_client(identity)?, ctx);
    // No rendered row here, so report under the entry name.
    let target = StatusTarget::Entry(args.entry.clone());
    let patch = page
        .submit_entry_rating_into(&args.entry, target, args.rating)
        .await?;
    print!("{}", display::format_rating(&patch));
    if let Some(err) = patch.network_error {
        bail!("rating submission failed: {err}");
    }
    Ok(())
}

fn run_bookmarklet(args: BookmarkletArgs) -> anyhow::Result<()> {
    if args.script {
        println!("{}", controversy_core::bookmarklet_source(&args.page));
        return Ok(());
    }
    let ranges = if args.selection.is_empty() {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("reading selection from stdin")?;
        vec![html]
    } else {
        args.selection
    };
    let selection = Selection::capture(&args.location, ranges.iter().map(String::as_str));
    println!("{}", selection.launch_url(&args.page));
    Ok(())
}

fn run_whoami(identity: &mut IdentityStore, reset: bool) -> anyhow::Result<()> {
    if reset {
        identity.clear().context("clearing cookie jar")?;
    }
    let userid = identity.get_or_create_user_id()?;
    println!("{userid}");
    Ok(())
}
