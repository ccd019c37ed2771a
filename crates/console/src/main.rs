//! Daily Papers console
//!
//! Terminal front end for the Daily Papers platform:
//! - Browse and filter the paper listing
//! - Submit batches of paper identifiers
//! - Trigger crawls and follow task status
//! - Ask questions about the library

mod render;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dailypapers_client::config::ObservabilityConfig;
use dailypapers_client::conversation::ConversationSession;
use dailypapers_client::detail::PaperDetailView;
use dailypapers_client::listing::{PaperListing, CATEGORY_OPTIONS};
use dailypapers_client::metrics;
use dailypapers_client::models::{PaperSource, TaskStatus};
use dailypapers_client::overview::LibraryOverview;
use dailypapers_client::submission::SubmissionForm;
use dailypapers_client::tasks::{self, CrawlTracker, PollPolicy, TaskPoller};
use dailypapers_client::{ClientConfig, HttpPaperApi, PaperApi};

fn cli() -> Command {
    Command::new("papers")
        .version(dailypapers_client::VERSION)
        .about("Daily Papers console")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print raw JSON instead of text"),
        )
        .subcommand(
            Command::new("list")
                .about("List papers")
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Page number, starting at 1"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help(format!("Category filter, e.g. {}", CATEGORY_OPTIONS.join(", "))),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Status filter: pending, crawled, parsed, analyzed, ready"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Filter the fetched page by title or abstract"),
                ),
        )
        .subcommand(
            Command::new("show").about("Show one paper").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(value_parser!(i64))
                    .help("Paper id"),
            ),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit paper identifiers for ingestion")
                .arg(
                    Arg::new("source")
                        .long("source")
                        .default_value("arxiv")
                        .value_parser(|s: &str| s.parse::<PaperSource>())
                        .help("arxiv or semantic_scholar"),
                )
                .arg(
                    Arg::new("ids")
                        .num_args(0..)
                        .help("Identifiers; read from stdin when omitted"),
                ),
        )
        .subcommand(
            Command::new("crawl").about("Trigger a crawl").arg(
                Arg::new("wait")
                    .long("wait")
                    .action(ArgAction::SetTrue)
                    .help("Poll until the crawl task finishes"),
            ),
        )
        .subcommand(
            Command::new("task")
                .about("Show a task's status")
                .arg(Arg::new("task_id").required(true).help("Task id"))
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .action(ArgAction::SetTrue)
                        .help("Poll until the task finishes"),
                ),
        )
        .subcommand(
            Command::new("chat").about("Ask questions, one per line on stdin").arg(
                Arg::new("paper")
                    .long("paper")
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(i64))
                    .help("Restrict answers to this paper id (repeatable)"),
            ),
        )
        .subcommand(
            Command::new("overview").about("Newest papers and library stats").arg(
                Arg::new("crawl")
                    .long("crawl")
                    .action(ArgAction::SetTrue)
                    .help("Also trigger a crawl"),
            ),
        )
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so stdout stays pipeable
    if config.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let matches = cli().get_matches();

    let config = ClientConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.observability);
    metrics::register_metrics();

    debug!(
        api_root = %config.api_root(),
        "Starting Daily Papers console v{}",
        dailypapers_client::VERSION
    );

    let api = HttpPaperApi::from_config(&config)?;
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("list", args)) => list(&api, &config, args, json).await,
        Some(("show", args)) => show(&api, args, json).await,
        Some(("submit", args)) => submit(&api, args, json).await,
        Some(("crawl", args)) => crawl(&api, &config, args, json).await,
        Some(("task", args)) => task(&api, &config, args, json).await,
        Some(("chat", args)) => chat(&api, args).await,
        Some(("overview", args)) => overview(&api, &config, args, json).await,
        _ => bail!("Unknown command"),
    }
}

async fn list(
    api: &dyn PaperApi,
    config: &ClientConfig,
    args: &ArgMatches,
    json: bool,
) -> Result<()> {
    let mut listing = PaperListing::from_config(&config.listing);
    if let Some(category) = args.get_one::<String>("category") {
        listing.set_category(category.as_str());
    }
    if let Some(status) = args.get_one::<String>("status") {
        listing.set_status_filter(status.as_str());
    }
    if let Some(page) = args.get_one::<u32>("page") {
        listing.set_page(*page);
    }
    if let Some(search) = args.get_one::<String>("search") {
        listing.set_search_query(search.as_str());
    }

    listing.load(api).await;

    let visible = listing.visible();
    if json {
        return print_json(&visible);
    }
    println!(
        "{}",
        render::paper_list(&visible, listing.page(), listing.has_next_page())
    );
    Ok(())
}

async fn show(api: &dyn PaperApi, args: &ArgMatches, json: bool) -> Result<()> {
    let id = *args.get_one::<i64>("id").context("missing paper id")?;
    let mut view = PaperDetailView::new();
    view.load(api, id).await;

    if let Some(error) = view.error() {
        bail!("Failed to load paper {id}: {error}");
    }
    let Some(paper) = view.paper() else {
        bail!("Paper {id} was not loaded");
    };
    if json {
        return print_json(paper);
    }
    println!("{}", render::paper_detail(paper));
    Ok(())
}

async fn submit(api: &dyn PaperApi, args: &ArgMatches, json: bool) -> Result<()> {
    let source = args
        .get_one::<PaperSource>("source")
        .copied()
        .unwrap_or_default();
    let raw = match args.get_many::<String>("ids") {
        Some(ids) => ids.cloned().collect::<Vec<_>>().join("\n"),
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            input
        }
    };

    let mut form = SubmissionForm::new(source);
    let Some(batch) = form.submit(api, &raw).await? else {
        bail!("A submission is already in flight");
    };

    if json {
        let results: Vec<_> = batch.rows().iter().map(|row| &row.result).collect();
        return print_json(&results);
    }
    println!("{}", render::submission(batch));
    Ok(())
}

async fn crawl(
    api: &dyn PaperApi,
    config: &ClientConfig,
    args: &ArgMatches,
    json: bool,
) -> Result<()> {
    let mut tracker = CrawlTracker::new();
    let Some(accepted) = tracker.trigger(api).await? else {
        bail!("A crawl trigger is already in flight");
    };

    if json {
        print_json(&accepted)?;
    } else {
        let mut line = format!("Crawl {}", accepted.status);
        if let Some(task_id) = &accepted.task_id {
            line.push_str(&format!(" (task {task_id})"));
        }
        if let Some(message) = &accepted.message {
            line.push_str(&format!(": {message}"));
        }
        println!("{line}");
    }

    if args.get_flag("wait") {
        match &accepted.task_id {
            Some(task_id) => wait_for(api, config, task_id, json).await?,
            None => info!("Backend returned no task id, nothing to wait for"),
        }
    }
    Ok(())
}

async fn task(
    api: &dyn PaperApi,
    config: &ClientConfig,
    args: &ArgMatches,
    json: bool,
) -> Result<()> {
    let task_id = args.get_one::<String>("task_id").context("missing task id")?;
    if args.get_flag("wait") {
        return wait_for(api, config, task_id, json).await;
    }
    let status = tasks::query_status(api, task_id).await?;
    print_task(&status, json)
}

async fn wait_for(
    api: &dyn PaperApi,
    config: &ClientConfig,
    task_id: &str,
    json: bool,
) -> Result<()> {
    let poller = TaskPoller::new(api, PollPolicy::from_config(&config.polling));
    let finished = poller
        .wait_with(task_id, |status| {
            if !json {
                println!("{}", render::task(status));
            }
        })
        .await?;
    print_task(&finished, json)?;
    if !finished.is_success() {
        bail!("Task {task_id} ended as {}", finished.status);
    }
    Ok(())
}

fn print_task(status: &TaskStatus, json: bool) -> Result<()> {
    if json {
        return print_json(status);
    }
    println!("{}", render::task(status));
    Ok(())
}

async fn chat(api: &dyn PaperApi, args: &ArgMatches) -> Result<()> {
    let mut session = match args.get_many::<i64>("paper") {
        Some(ids) => ConversationSession::scoped(ids.copied().collect()),
        None => ConversationSession::new(),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = session.submit(api, &line).await {
            println!("{}", render::reply(reply));
        }
    }
    Ok(())
}

async fn overview(
    api: &dyn PaperApi,
    config: &ClientConfig,
    args: &ArgMatches,
    json: bool,
) -> Result<()> {
    let mut overview = LibraryOverview::from_config(&config.listing);
    overview.load(api).await;

    if args.get_flag("crawl") && overview.trigger_crawl(api).await {
        info!("Crawl triggered");
    }

    if json {
        return print_json(overview.papers());
    }
    println!("{}", render::stats(&overview.stats()));
    let papers: Vec<_> = overview.papers().iter().collect();
    println!("{}", render::paper_list(&papers, 1, false));
    Ok(())
}
