use clap::Parser;
use docsearch::build::build_site_index;
use docsearch::cli::{Cli, Commands};
use docsearch::config::SiteConfig;
use docsearch::navigation::{NavKey, Selection};
use docsearch::session::{Listing, SearchSession};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsearch::tracing::init(cli.verbose);

    let mut config = SiteConfig::load(&cli.site, cli.config.as_deref())?;
    cli.overrides.apply(&mut config);
    config.validate()?;

    match &cli.command {
        Commands::BuildIndex { sphinx } => {
            let summary = build_site_index(&cli.site, &config, sphinx.as_deref()).await?;
            if let Some(path) = &summary.documents_path {
                println!("Wrote {} documents to {}", summary.documents, path.display());
            }
            println!(
                "Indexed {} documents ({} terms) into {}",
                summary.documents,
                summary.terms,
                summary.artifact_path.display()
            );
            Ok(())
        }
        Commands::Search { query, json } => {
            let (mut session, _) = SearchSession::open(&cli.site, &config).await?;
            session.set_query(query);
            if *json {
                println!("{}", serde_json::to_string_pretty(session.listing().suggestions())?);
            } else {
                print_listing(&session);
            }
            Ok(())
        }
        Commands::Interactive => interactive(&cli.site, &config).await,
    }
}

async fn interactive(site: &Path, config: &SiteConfig) -> anyhow::Result<()> {
    let (mut session, origin) = SearchSession::open(site, config).await?;
    eprintln!(
        "{} documents ready ({:?} index). Type to search; :down :up :enter :clear :quit",
        session.store().len(),
        origin
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim_end() {
            ":quit" | ":q" => break,
            ":down" | ":j" => {
                session.press(NavKey::Next);
            }
            ":up" | ":k" => {
                session.press(NavKey::Prev);
            }
            ":enter" => {
                if let Some(href) = session.activate() {
                    println!("-> {}", href);
                }
                continue;
            }
            ":clear" => {
                session.set_query("");
            }
            text => {
                session.set_query(text);
            }
        }
        print_listing(&session);
    }
    Ok(())
}

fn print_listing(session: &SearchSession) {
    match session.listing() {
        Listing::Cleared => {}
        Listing::NoResults => println!("  No results found"),
        Listing::Suggestions(items) => {
            let active = match session.selection() {
                Selection::Active(i) => Some(i),
                Selection::Idle => None,
            };
            for (i, item) in items.iter().enumerate() {
                let marker = if active == Some(i) { '>' } else { ' ' };
                println!("{} {}\t{}", marker, item.displayname, item.href);
            }
        }
    }
}
