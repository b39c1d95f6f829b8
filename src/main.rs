use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use routine_advisor::catalog::ProductId;
use routine_advisor::chat::TurnOutcome;
use routine_advisor::filter::FilterCriteria;
use routine_advisor::{Advisor, AdvisorConfig, AdvisorError, ErrorCode, PendingTurn, render};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "routine-advisor", about = "Browse products, keep a selection, and chat with the routine advisor")]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Command,
}

/// Flags that take precedence over `ADVISOR_*` environment variables.
#[derive(Args, Debug)]
struct ConfigOverrides {
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[arg(long, global = true)]
    model: Option<String>,

    #[arg(long, global = true, help = "Catalog URL or file path")]
    catalog: Option<String>,

    #[arg(long, global = true, help = "Selection storage file")]
    store: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog categories.
    Categories,
    /// Filter products by category and/or search text.
    Browse {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Show one product's details.
    Show { id: ProductId },
    /// Add a product to the selection.
    Select { id: ProductId },
    /// Remove a product from the selection.
    Remove { id: ProductId },
    /// List selected products.
    Selected,
    /// Empty the selection.
    Clear,
    /// Send one chat message.
    Chat { text: Vec<String> },
    /// Ask for a routine built from the selection.
    Routine,
    /// Interactive session sharing one conversation.
    Session,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let code = match &e {
            CliError::Advisor(inner) => inner.error_code(),
            CliError::Stdin(_) => "E_STDIN",
        };
        eprintln!("error [{code}]: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_config(cli.overrides)?;
    let mut advisor = Advisor::from_config(&config).await?;

    match cli.command {
        Command::Categories => {
            for category in advisor.catalog().categories() {
                println!("{category}");
            }
        }
        Command::Browse { category, query } => {
            let criteria = FilterCriteria::new(category, &query);
            println!("{}", render::product_list(&advisor.filter(&criteria), advisor.selection()));
        }
        Command::Show { id } => show(&advisor, id)?,
        Command::Select { id } => select(&mut advisor, id)?,
        Command::Remove { id } => remove(&mut advisor, id)?,
        Command::Selected => println!("{}", render::selected_list(&advisor.selected_products())),
        Command::Clear => {
            advisor.clear_selection()?;
            println!("{}", render::EMPTY_SELECTION);
        }
        Command::Chat { text } => chat(&mut advisor, &text.join(" ")).await,
        Command::Routine => routine(&mut advisor).await,
        Command::Session => session(&mut advisor).await?,
    }
    Ok(())
}

fn build_config(overrides: ConfigOverrides) -> Result<AdvisorConfig, AdvisorError> {
    let mut config = AdvisorConfig::from_env()?;
    if let Some(endpoint) = overrides.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(model) = overrides.model {
        config.model = model;
    }
    if let Some(catalog) = overrides.catalog {
        config.catalog_source = catalog;
    }
    if let Some(store) = overrides.store {
        config.store_path = store;
    }
    config.validate()?;
    Ok(config)
}

// =============================================================================
// ACTIONS
// =============================================================================

fn show(advisor: &Advisor, id: ProductId) -> Result<(), AdvisorError> {
    let product = advisor.catalog().get(id).ok_or(AdvisorError::UnknownProduct(id))?;
    println!("{}", render::product_detail(product));
    Ok(())
}

fn select(advisor: &mut Advisor, id: ProductId) -> Result<(), AdvisorError> {
    if !advisor.select(id)? {
        println!("{id} is already selected");
    }
    println!("{}", render::selected_list(&advisor.selected_products()));
    Ok(())
}

fn remove(advisor: &mut Advisor, id: ProductId) -> Result<(), AdvisorError> {
    if !advisor.deselect(id)? {
        println!("{id} was not selected");
    }
    println!("{}", render::selected_list(&advisor.selected_products()));
    Ok(())
}

async fn chat(advisor: &mut Advisor, text: &str) {
    let before = advisor.conversation().transcript().len();
    let Some(turn) = advisor.begin_chat(text) else {
        return;
    };
    run_turn(advisor, turn).await;
    print_since(advisor, before);
}

async fn routine(advisor: &mut Advisor) {
    let before = advisor.conversation().transcript().len();
    let turn = advisor.begin_routine();
    let outcome = run_turn(advisor, turn).await;
    print_since(advisor, before);
    if let Some(TurnOutcome::Failed(e)) = outcome {
        tracing::debug!(error = %e, "routine request failed");
    }
}

/// Await the proxy; Ctrl-C abandons the turn. `None` when cancelled.
async fn run_turn(advisor: &mut Advisor, turn: PendingTurn) -> Option<TurnOutcome> {
    tokio::select! {
        finished = turn.send() => Some(advisor.finish(finished)),
        _ = tokio::signal::ctrl_c() => {
            advisor.cancel_pending();
            println!("request cancelled");
            None
        }
    }
}

fn print_since(advisor: &Advisor, start: usize) {
    for entry in advisor.conversation().transcript().iter().skip(start) {
        println!("{}\n", render::transcript_entry(entry));
    }
}

// =============================================================================
// INTERACTIVE SESSION
// =============================================================================

const SESSION_HELP: &str = "\
/category [name]   set or clear the category filter
/search [text]     set or clear the search text
/show <id>         product details
/select <id>       add to selection
/remove <id>       remove from selection
/selected          list selection
/clear             empty the selection
/routine           generate a routine from the selection
/categories        list categories
/help              this text
/quit              leave
anything else is sent to the advisor";

async fn session(advisor: &mut Advisor) -> Result<(), CliError> {
    println!("{SESSION_HELP}\n");
    println!("{}", render::selected_list(&advisor.selected_products()));

    let mut category = String::new();
    let mut query = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').map_or((line, ""), |(c, a)| (c, a.trim()));

        let result = match cmd {
            "/quit" | "/exit" => break,
            "/help" => {
                println!("{SESSION_HELP}");
                Ok(())
            }
            "/categories" => {
                println!("{}", advisor.catalog().categories().join("\n"));
                Ok(())
            }
            "/category" | "/search" => {
                if cmd == "/category" {
                    category = arg.to_string();
                } else {
                    query = arg.to_string();
                }
                let criteria = FilterCriteria::new(category.clone(), &query);
                println!("{}", render::product_list(&advisor.filter(&criteria), advisor.selection()));
                Ok(())
            }
            "/show" => with_id(arg, |id| show(advisor, id)),
            "/select" => with_id(arg, |id| select(advisor, id)),
            "/remove" => with_id(arg, |id| remove(advisor, id)),
            "/selected" => {
                println!("{}", render::selected_list(&advisor.selected_products()));
                Ok(())
            }
            "/clear" => advisor.clear_selection().map(|()| println!("{}", render::EMPTY_SELECTION)),
            "/routine" => {
                routine(advisor).await;
                Ok(())
            }
            _ => {
                chat(advisor, line).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error [{}]: {e}", e.error_code());
        }
    }
    Ok(())
}

fn with_id(arg: &str, f: impl FnOnce(ProductId) -> Result<(), AdvisorError>) -> Result<(), AdvisorError> {
    match arg.parse::<ProductId>() {
        Ok(id) => f(id),
        Err(_) => {
            println!("expected a numeric product id");
            Ok(())
        }
    }
}
