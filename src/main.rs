use clap::{Parser, Subcommand};
use repo_deck::core::{
    error::{RepoDeckError, Result},
    print_error, print_info, print_success, ActionOutcome, HostingCli, Settings, TerminalPrompter,
    TerminalView, Visibility,
};
use repo_deck::AppContext;
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repo-deck")]
#[command(about = "Browse a folder of Git repositories and manage them with git and gh")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Folder containing the repositories (remembered for next time)
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Visibility cache file to use instead of the default
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List repositories with their cached visibility
    List,
    /// Show branch, changes and last commit of a repository
    Show { name: String },
    /// Query visibility for repositories missing from the cache
    Refresh,
    /// Discard the cache and query every repository again
    Rebuild,
    /// Run git init in a new folder
    Init,
    /// Create a local repository and its GitHub counterpart
    New,
    /// Clone a GitHub repository into the base folder
    Clone,
    /// Stage, commit and push the current branch
    Push { name: String },
    /// Switch to another local branch
    Checkout { name: String },
    /// Create, switch to and publish a new branch
    Branch { name: String },
    /// Delete a branch locally and on the remote
    DropBranch { name: String },
    /// Replace the work tree with the files of another branch
    Rollback { name: String },
    /// Rename the folder and the GitHub repository
    Rename { name: String },
    /// Delete the GitHub repository and the local folder
    Delete { name: String },
    /// Make the GitHub repository public or private
    Visibility {
        name: String,
        #[arg(value_enum)]
        visibility: Visibility,
    },
    /// Publish the current branch as a new repository
    ToRepo { name: String },
    /// Archive the current branch into <name>_<branch>.zip
    Zip { name: String },
    /// Print the GitHub URL of a repository
    Link { name: String },
    /// Open the repository folder in the file manager
    Open { name: String },
    /// Show which GitHub account is logged in
    Auth,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Command-line base, then the remembered one, then the working directory
fn resolve_base(cli_base: Option<PathBuf>, settings: &mut Settings) -> Result<PathBuf> {
    let remember = cli_base.is_some();
    let base = match cli_base.or_else(|| settings.base_path.clone()) {
        Some(base) => base,
        None => env::current_dir()?,
    };
    let base = base
        .canonicalize()
        .ok()
        .filter(|b| b.is_dir())
        .ok_or_else(|| RepoDeckError::invalid_base_path(&base))?;

    if remember && settings.base_path.as_ref() != Some(&base) {
        settings.base_path = Some(base.clone());
        if let Err(e) = settings.save() {
            log::warn!("Could not remember base folder: {e}");
        }
    }
    Ok(base)
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load();
    let base = resolve_base(cli.base, &mut settings)?;
    if let Some(cache_file) = cli.cache_file {
        settings.cache_file = Some(cache_file);
    }
    log::debug!("Base folder {}", base.display());

    let mut app = AppContext::new(settings, base, Box::new(TerminalPrompter::stdin()));
    let mut view = TerminalView::new();

    let outcome = match cli.command {
        Commands::List => {
            app.refresh_listing(&mut view)?;
            return Ok(());
        }
        Commands::Show { name } => {
            app.show(&name, &mut view)?;
            return Ok(());
        }
        Commands::Refresh => {
            let added = app.refresh_missing()?;
            app.refresh_listing(&mut view)?;
            print_success(&format!("Cached visibility for {added} new repositories"));
            return Ok(());
        }
        Commands::Rebuild => {
            let mut view = TerminalView::incremental();
            let listing = app.rebuild(&mut view).await?;
            print_success(&format!(
                "Rebuilt visibility for {} repositories",
                listing.entries.len()
            ));
            return Ok(());
        }
        Commands::Auth => {
            let user = app
                .hosting()
                .authenticated_user()
                .ok_or(RepoDeckError::NotAuthenticated)?;
            print_info(&format!("Logged in to GitHub as {user}"));
            return Ok(());
        }
        Commands::Init => app.orchestrator().init()?,
        Commands::New => app.orchestrator().create_repo()?,
        Commands::Clone => app.orchestrator().clone_repo()?,
        Commands::Push { name } => app.orchestrator().push(&name)?,
        Commands::Checkout { name } => app.orchestrator().checkout(&name)?,
        Commands::Branch { name } => app.orchestrator().new_branch(&name)?,
        Commands::DropBranch { name } => app.orchestrator().delete_branch(&name)?,
        Commands::Rollback { name } => app.orchestrator().rollback(&name)?,
        Commands::Rename { name } => app.orchestrator().rename(&name)?,
        Commands::Delete { name } => app.orchestrator().delete(&name)?,
        Commands::Visibility { name, visibility } => {
            app.orchestrator().set_visibility(&name, visibility)?
        }
        Commands::ToRepo { name } => app.orchestrator().branch_to_repo(&name)?,
        Commands::Zip { name } => app.orchestrator().zip(&name)?,
        Commands::Link { name } => app.orchestrator().repo_link(&name)?,
        Commands::Open { name } => app.orchestrator().open_dir(&name)?,
    };

    if let ActionOutcome::Declined = outcome {
        print_info("Cancelled, nothing was run");
        return Ok(());
    }
    let applied = app.settle(&mut view).await;
    log::debug!("Applied {applied} deferred refreshes");
    Ok(())
}
