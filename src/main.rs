#![allow(dead_code)]

use crate::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A compact git-style version control engine",
    long_about = "kit records snapshots of a working directory as an immutable \
    content-addressed object graph and exposes branch-based navigation over it.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "ls-tree", about = "List the entries of a tree object")]
    LsTree {
        #[arg(index = 1, help = "The tree (or commit) SHA to list")]
        sha: String,
    },
    #[command(name = "add", about = "Stage files or directories")]
    Add {
        #[arg(index = 1, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Unstage files")]
    Rm {
        #[arg(index = 1, help = "The files to unstage")]
        paths: Vec<String>,
    },
    #[command(name = "commit", about = "Record the staged snapshot as a commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(name = "branch", about = "List, create, or delete branches")]
    Branch {
        #[arg(index = 1, help = "The branch name to create or delete")]
        name: Option<String>,
        #[arg(short, long, help = "Delete the named branch")]
        delete: bool,
    },
    #[command(name = "checkout", about = "Switch to a branch or commit")]
    Checkout {
        #[arg(index = 1, help = "The branch name or commit SHA to check out")]
        target: String,
    },
    #[command(name = "merge", about = "Merge a branch or commit into the current branch")]
    Merge {
        #[arg(index = 1, help = "The branch name or commit SHA to merge")]
        target: String,
        #[arg(short, long, help = "The merge commit message")]
        message: Option<String>,
    },
    #[command(name = "log", about = "Show the commit history from HEAD")]
    Log,
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::discover(&pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path.into(), Box::new(std::io::stdout()))?,
                None => {
                    Repository::new(std::env::current_dir()?, Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::CatFile { sha } => open_repository()?.cat_file(sha)?,
        Commands::HashObject { write, file } => open_repository()?.hash_object(file, *write)?,
        Commands::LsTree { sha } => open_repository()?.ls_tree(sha)?,
        Commands::Add { paths } => open_repository()?.add(paths)?,
        Commands::Rm { paths } => open_repository()?.rm(paths)?,
        Commands::Commit { message } => open_repository()?.commit(message)?,
        Commands::Status => open_repository()?.status()?,
        Commands::Branch { name, delete } => {
            open_repository()?.branch(name.as_deref(), *delete)?
        }
        Commands::Checkout { target } => open_repository()?.checkout(target)?,
        Commands::Merge { target, message } => {
            open_repository()?.merge(target, message.as_deref())?
        }
        Commands::Log => open_repository()?.log()?,
    }

    Ok(())
}
