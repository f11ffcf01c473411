use anyhow::{Context, Result};
use qb_consensus::config::{Config, CONFIG_FILE};
use qb_consensus::feed::the_odds_api::TheOddsApi;
use qb_consensus::feed::ScanWindow;
use qb_consensus::{pipeline, report};
use std::path::PathBuf;

struct Args {
    team: Option<String>,
    config: PathBuf,
}

/// `--team` is passed through verbatim; `teams::lookup` decides what is valid.
fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Args> {
    let mut args = Args {
        team: None,
        config: PathBuf::from(CONFIG_FILE),
    };
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--team" => {
                let abbr = it.next().context("--team requires a team abbreviation")?;
                args.team = Some(abbr);
            }
            "--config" => {
                let path = it.next().context("--config requires a path")?;
                args.config = PathBuf::from(path);
            }
            other => anyhow::bail!("unknown argument: {} (usage: qb-consensus [--team <abbr>] [--config <path>])", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qb_consensus=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::load_or_default(&args.config)?;
    let api_key = config.odds_api_key()?;
    let mut feed = TheOddsApi::new(api_key, &config.odds_api)?;
    let now = chrono::Utc::now();

    let lines = match args.team {
        Some(abbr) => {
            let window = ScanWindow::around(now, config.window.lookback_hours, config.window.team_days);
            let game = pipeline::team_report(&mut feed, &window, &abbr, &config.odds_api.market).await?;
            report::render_team(game.as_ref())
        }
        None => {
            let window = ScanWindow::around(now, config.window.lookback_hours, config.window.league_days);
            let scan = pipeline::scan_league(&mut feed, &window, &config.odds_api.market).await?;
            report::render_league(&scan)?
        }
    };

    for line in lines {
        println!("{}", line);
    }

    tracing::debug!("done");
    Ok(())
}
