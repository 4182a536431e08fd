use anyhow::Result;
use clap::{Parser, Subcommand};

use pkg_release::build::ScriptRunner;
use pkg_release::clean;
use pkg_release::config::{self, Config, PackageManager};
use pkg_release::project::Project;
use pkg_release::publish::{NodePublisher, Publisher};
use pkg_release::release::ReleaseWorkflow;
use pkg_release::ui;
use pkg_release::vcs::GitCli;

#[derive(Parser)]
#[command(
    name = "pkg-release",
    about = "Semantic-version release and hotfix orchestration for npm-style packages"
)]
struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Show detailed error messages with the full cause chain"
    )]
    verbose: bool,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        global = true,
        help = "Package manager to use (npm, yarn or pnpm)"
    )]
    package_manager: Option<PackageManager>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Display the current package version
    Version,
    /// Print the next release version
    ReleaseVersion,
    /// Verify that the project is releaseable
    VerifyRelease,
    /// Execute the full release workflow
    Release,
    /// Start a hotfix line for a released major.minor tag
    StartHotfix {
        /// The release line to patch, e.g. "2.1"
        tag: String,
    },
    /// Publish the current checkout to the registry
    Publish,
    /// Remove the build directory
    Clean,
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli) {
        if verbose {
            ui::display_error(&format!("{:#}", e));
        } else {
            ui::display_error(&format!("{}", e));
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?.with_env_overrides()?;

    let vcs = GitCli::open(".")?;
    let mut project = Project::open(".", &vcs)?;

    match cli.command {
        Command::Version => {
            println!("{}", project.version());
            Ok(())
        }
        Command::ReleaseVersion => {
            println!("{}", project.next_release_version());
            Ok(())
        }
        Command::VerifyRelease => {
            let build = ScriptRunner::new(resolve_manager(&config, cli.package_manager)?);
            let publisher = publisher_for(&config, cli.package_manager)?;
            let workflow = ReleaseWorkflow::new(&mut project, &vcs, &build, &publisher);
            let report = workflow.verify_release();
            if !report.is_releaseable() {
                println!("{}", report);
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Release => {
            let build = ScriptRunner::new(resolve_manager(&config, cli.package_manager)?);
            let publisher = publisher_for(&config, cli.package_manager)?;
            let mut workflow = ReleaseWorkflow::new(&mut project, &vcs, &build, &publisher);
            let released = workflow.release()?;
            ui::display_success(&format!("Released version {}", released));
            Ok(())
        }
        Command::StartHotfix { tag } => {
            let build = ScriptRunner::new(resolve_manager(&config, cli.package_manager)?);
            let publisher = publisher_for(&config, cli.package_manager)?;
            let mut workflow = ReleaseWorkflow::new(&mut project, &vcs, &build, &publisher);
            let snapshot = workflow.start_hotfix(&tag)?;
            ui::display_success(&format!("Started hotfix on version {}", snapshot));
            Ok(())
        }
        Command::Publish => {
            let publisher = publisher_for(&config, cli.package_manager)?;
            publisher.publish(&mut project, &vcs)?;
            Ok(())
        }
        Command::Clean => {
            clean::clean(&project)?;
            Ok(())
        }
    }
}

fn resolve_manager(config: &Config, cli_choice: Option<PackageManager>) -> Result<PackageManager> {
    Ok(config.require_package_manager(cli_choice)?)
}

fn publisher_for(config: &Config, cli_choice: Option<PackageManager>) -> Result<NodePublisher> {
    Ok(NodePublisher::new(
        resolve_manager(config, cli_choice)?,
        config.release_registry.clone(),
        config.snapshot_registry.clone(),
    ))
}
