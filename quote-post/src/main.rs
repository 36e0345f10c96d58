//! quote-post - Post one random quote to Twitter/X

use clap::Parser;
use libquotebot::logging::{LogFormat, LoggingConfig};
use libquotebot::platforms::twitter::{TwitterClient, TWITTER_CHARACTER_LIMIT};
use libquotebot::{store, Config, QuotePoster, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "quote-post")]
#[command(version, about = "Post a random quote from the quote store to Twitter/X")]
#[command(long_about = r#"Post a random quote from the quote store to Twitter/X.

Runs once and exits; schedule it with cron or a similar trigger.

ENVIRONMENT:
    DATABASE_URL          Quote store URL (mongodb://, mongodb+srv:// or sqlite:)
                          Falls back to MONGO_DB_URL
    CONSUMER_KEY          Twitter API consumer key
    CONSUMER_SECRET       Twitter API consumer secret
    ACCESS_TOKEN          Twitter API access token
    ACCESS_TOKEN_SECRET   Twitter API access token secret
    QUOTEBOT_CONFIG       Optional settings file

EXIT CODES:
    0 - Quote posted
    1 - Configuration, store or posting failure
    2 - Authentication failure
    3 - Invalid input (blank quote)
"#)]
struct Cli {
    /// Settings file (defaults to $QUOTEBOT_CONFIG or ~/.config/quotebot/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the composed status instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Log output format (text, json or pretty)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    // A missing .env is normal; real environment variables always win.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    LoggingConfig::from_env(cli.log_format, cli.verbose).init();

    if let Err(e) = run(cli).await {
        error!(exit_code = e.exit_code(), "{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting quote-post v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let store = store::connect(&config.database, &config.timeouts).await?;
    let poster = QuotePoster::new(store.as_ref(), &config.message);
    let mut rng = StdRng::from_entropy();

    if cli.dry_run {
        let (_, status) = poster.preview(&mut rng, Some(TWITTER_CHARACTER_LIMIT)).await?;
        println!("{}", status);
        return Ok(());
    }

    let mut platform = TwitterClient::new(&config.twitter, &config.timeouts)?;
    let outcome = poster.publish(&mut platform, &mut rng).await?;

    info!(
        platform = %outcome.platform,
        account = %outcome.account.username,
        post_id = %outcome.post_id,
        "Quote successfully posted"
    );
    println!("{}", outcome.post_id);

    Ok(())
}
