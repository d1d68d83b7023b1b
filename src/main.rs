//! Browse Gitea-compatible repositories from the terminal.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gitscope::fetch::Gateway;
use gitscope::nav::NavState;
use gitscope::{RepoLocator, ResolveError, Session};

mod app_config;
mod output;
mod trc;

use crate::app_config::{Config, ConfigError};
use crate::trc::Trc;

#[derive(Parser)]
#[command(version, about = "Browse Gitea-compatible repositories from the terminal.")]
struct Args {
    #[arg(
        short,
        long,
        value_parser,
        help = "Optional path to a gitscope config TOML."
    )]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve and print one repository page.
    View {
        /// Repository to browse, as owner/repo.
        repo: RepoLocator,

        /// Branch or tag; defaults to the repository's default branch.
        #[arg(long = "ref")]
        reference: Option<String>,

        /// Directory path within the repository.
        #[arg(long, default_value = "")]
        path: String,

        /// File within the directory to display.
        #[arg(long)]
        file: Option<String>,

        /// Raw query string (`ref=…&path=…&file=…`) instead of the flags
        /// above.
        #[arg(long, conflicts_with_all = ["reference", "path", "file"])]
        query: Option<String>,

        /// Render markdown through the remote endpoint instead of printing
        /// it raw.
        #[arg(long)]
        html: bool,
    },

    /// List every branch of a repository.
    Branches {
        /// Repository to inspect, as owner/repo.
        repo: RepoLocator,
    },

    /// Show recent commits of a repository.
    Log {
        /// Repository to inspect, as owner/repo.
        repo: RepoLocator,

        /// Branch or tag to walk back from.
        #[arg(long = "ref")]
        reference: Option<String>,

        /// Number of commits to show.
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();

    // Load config first so the host and deadlines are settled before any
    // request. Errors use eprintln since tracing isn't initialized yet.
    let config = match Config::load_or_default(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(ConfigError::ValidationErrors(errors)) => {
            eprintln!("Configuration is invalid.");
            for msg in &errors {
                eprintln!(" - {msg}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    Trc::default().init().unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    });

    // One page view is one logical thread of control; fetches suspend, they
    // never need parallelism.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        });

    let code = runtime.block_on(run(args.command, &config));
    std::process::exit(code);
}

async fn run(command: Command, config: &Config) -> i32 {
    match command {
        Command::View {
            repo,
            reference,
            path,
            file,
            query,
            html,
        } => {
            let nav = match query {
                Some(query) => NavState::from_query(&query),
                None => NavState {
                    reference,
                    path,
                    file,
                },
            };
            view(config, repo, &nav, html).await
        }
        Command::Branches { repo } => branches(config, repo).await,
        Command::Log {
            repo,
            reference,
            limit,
        } => log(config, repo, reference.as_deref(), limit).await,
    }
}

/// Resolve one repository page and print it: header, latest commit,
/// breadcrumbs, listing, then the selected file or the README.
async fn view(config: &Config, repo: RepoLocator, nav: &NavState, html: bool) -> i32 {
    let session = Session::new(Gateway::new(config.client()), repo)
        .with_classify_table(config.classify_table());

    let resolution = match session.resolve(nav).await {
        Ok(resolution) => resolution,
        Err(ResolveError::NotFound(error)) => {
            eprint!("{}", output::not_found(&error));
            return 1;
        }
    };

    let file_selected = {
        let store = session.store();

        if let Some(repository) = store.repository() {
            print!("{}", output::repo_header(repository));
            println!();
            print!(
                "{}",
                output::breadcrumbs(&repository.name, store.current_ref(), store.current_path())
            );
        }

        match store.latest_commit() {
            Some(commit) => print!("{}", output::latest_commit(commit)),
            None => {
                if let Some(error) = &resolution.commit_error {
                    println!("Latest commit unavailable: {error}");
                }
            }
        }
        println!();

        match &resolution.contents_error {
            Some(error) => println!("Listing unavailable: {error}"),
            None => print!("{}", output::listing(store.contents(), store.current_path())),
        }

        if let Some(file) = store.file() {
            println!();
            print!("{}", output::file_view(file));
        } else if let Some(error) = &resolution.file_error {
            println!();
            println!("Failed to load file content: {error}");
        }

        store.selected_file().is_some()
    };

    // The README renders under the listing the way the page does, skipped
    // only while a file view already fills that spot.
    if !file_selected {
        match session.load_readme(html).await {
            Ok(Some(readme)) => {
                println!();
                print!("{}", output::readme(&readme));
            }
            Ok(None) => {}
            Err(error) => {
                println!();
                println!("Error loading README: {error}");
            }
        }
    }

    0
}

async fn branches(config: &Config, repo: RepoLocator) -> i32 {
    let session = Session::new(Gateway::new(config.client()), repo);
    match session.load_branches().await {
        Ok(()) => {
            print!("{}", output::branch_list(session.store().branches()));
            0
        }
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}

async fn log(config: &Config, repo: RepoLocator, reference: Option<&str>, limit: u32) -> i32 {
    let gateway = Gateway::new(config.client());
    match gateway
        .fetch_commits(&repo.owner, &repo.repo, Some(limit), reference)
        .await
    {
        Ok(commits) => {
            print!("{}", output::commit_log(&commits));
            0
        }
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}
