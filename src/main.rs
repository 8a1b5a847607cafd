use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use curriculum_splitter::config::{
    self, Branches, CURRICULUM_BRANCH, DEFAULT_JUPYTER, DEFAULT_NOTEBOOK, DEFAULT_README,
    DEFAULT_REMOTE, MAIN_BRANCH, SOLUTION_BRANCH, SyncConfig,
};
use curriculum_splitter::git::GitRepo;
use curriculum_splitter::render::Nbconvert;
use curriculum_splitter::sync;
use curriculum_splitter::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.verbose).and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync(args) => execute_sync(args),
        Command::Split(args) => execute_split(args),
    }
}

fn execute_sync(args: SyncArgs) -> Result<()> {
    let home = dirs::home_dir();
    let ssh_identity = config::resolve_ssh_identity(args.ssh_identity, home.as_deref());
    let repo = GitRepo::open(&args.repo, args.remote.clone())?.with_ssh_identity(ssh_identity);

    let main_exists = args.master_branch.is_none() && repo.branch_exists(MAIN_BRANCH)?;
    let master = config::resolve_master_branch(args.master_branch, main_exists);
    tracing::info!(branch = %master, "resolved master branch");

    let config = SyncConfig {
        repo: args.repo,
        notebook: args.notebook,
        readme: args.readme,
        branches: Branches {
            curriculum: args.curriculum_branch,
            master,
            solution: args.solution_branch,
        },
        remote: args.remote,
        message: args.message,
        push: !args.no_push,
    };

    let renderer = Nbconvert::new(args.jupyter);
    sync::sync_curriculum(&config, &repo, &renderer)?;
    Ok(())
}

fn execute_split(args: SplitArgs) -> Result<()> {
    sync::split_files(&args.input, &args.master_output, &args.solution_output)?;
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Split a curriculum notebook into master and solution branches."
)]
struct Cli {
    /// Increase log output (-v for info, -vv for debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish the curriculum notebook to the master and solution branches.
    Sync(SyncArgs),
    /// Write the master and solution notebooks to local files.
    Split(SplitArgs),
}

#[derive(clap::Args)]
struct SyncArgs {
    /// Repository working tree.
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Notebook path, relative to the repository.
    #[arg(long, default_value = DEFAULT_NOTEBOOK)]
    notebook: PathBuf,

    /// Rendered markdown path, relative to the repository.
    #[arg(long, default_value = DEFAULT_README)]
    readme: PathBuf,

    /// Branch the notebook is authored on.
    #[arg(long, default_value = CURRICULUM_BRANCH)]
    curriculum_branch: String,

    /// Branch receiving the notebook without solutions. Defaults to `main`
    /// when that branch exists, `master` otherwise.
    #[arg(long)]
    master_branch: Option<String>,

    /// Branch receiving the notebook with solutions.
    #[arg(long, default_value = SOLUTION_BRANCH)]
    solution_branch: String,

    /// Remote the branches are pushed to.
    #[arg(long, default_value = DEFAULT_REMOTE)]
    remote: String,

    /// Commit message. Defaults to the message of the curriculum HEAD commit.
    #[arg(short = 'm', long)]
    message: Option<String>,

    /// Commit locally but do not push.
    #[arg(long)]
    no_push: bool,

    /// SSH key for git. Defaults to ~/.ssh/id_rsa when present.
    #[arg(long)]
    ssh_identity: Option<PathBuf>,

    /// Jupyter executable used to render markdown.
    #[arg(long, default_value = DEFAULT_JUPYTER)]
    jupyter: PathBuf,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Authoring notebook.
    #[arg(long)]
    input: PathBuf,

    /// Output path for the notebook without solutions.
    #[arg(long)]
    master_output: PathBuf,

    /// Output path for the notebook with solutions.
    #[arg(long)]
    solution_output: PathBuf,
}
