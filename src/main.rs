use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use gel::areas::repository::Repository;
use gel::artifacts::tree::walker::WalkOptions;
use gel::commands::plumbing::cat_file::CatFileMode;
use gel::commands::porcelain::log::LogOptions;
use gel::config::RepositoryConfig;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "GEL_LOG";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(
    name = "gel",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressed version control engine",
    long_about = "Gel stores snapshots of a working directory as SHA-256 addressed objects. \
    It keeps a Git-style staging index, builds trees and commits from it, \
    and moves the working directory between branches.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .gel directory in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content, type or size of an object",
        group(ArgGroup::new("mode").required(true).args(["pretty", "object_type", "size"]))
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object type")]
        object_type: bool,
        #[arg(short = 's', help = "Print the object size")]
        size: bool,
        #[arg(index = 1, help = "The object to show")]
        object: String,
    },
    #[command(name = "ls-files", about = "List the paths in the index")]
    LsFiles {
        #[arg(short, long, help = "Show mode, object id and stage number")]
        stage: bool,
    },
    #[command(name = "add", about = "Add file contents to the index")]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Remove files from the index")]
    Rm {
        #[arg(long, help = "Only unstage, keep the working directory files")]
        cached: bool,
        #[arg(required = true, help = "Files, directories or glob patterns")]
        paths: Vec<String>,
    },
    #[command(name = "write-tree", about = "Create a tree object from the index")]
    WriteTree,
    #[command(name = "read-tree", about = "Replace the index with the content of a tree")]
    ReadTree {
        #[arg(index = 1)]
        tree_ish: String,
    },
    #[command(name = "ls-tree", about = "List the content of a tree object")]
    LsTree {
        #[arg(short = 'r', help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(short = 't', help = "Show trees even when recursing")]
        show_trees: bool,
        #[arg(short = 'd', help = "Show only trees")]
        only_trees: bool,
        #[arg(index = 1)]
        tree_ish: String,
    },
    #[command(name = "commit-tree", about = "Create a commit object for a tree")]
    CommitTree {
        #[arg(index = 1)]
        tree: String,
        #[arg(short = 'p', help = "Parent commit, may be repeated")]
        parents: Vec<String>,
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "symbolic-ref", about = "Read or change a symbolic ref")]
    SymbolicRef {
        #[arg(index = 1, default_value = "HEAD")]
        name: String,
        #[arg(index = 2, help = "New target, such as refs/heads/main")]
        target: Option<String>,
    },
    #[command(name = "update-ref", about = "Point a ref at an object")]
    UpdateRef {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2)]
        revision: String,
    },
    #[command(name = "rev-parse", about = "Resolve a revision to an object id")]
    RevParse {
        #[arg(index = 1)]
        revision: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command snapshots the index into a new commit and advances the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the commit history")]
    Log {
        #[arg(long, help = "One line per commit")]
        oneline: bool,
        #[arg(help = "Revisions to start from (defaults to HEAD)")]
        revisions: Vec<String>,
    },
    #[command(name = "branch", about = "List, create or delete branches")]
    Branch {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, help = "Revision the new branch starts at")]
        start: Option<String>,
        #[arg(short, long, conflicts_with = "name", help = "Delete a branch")]
        delete: Option<String>,
    },
    #[command(name = "switch", about = "Switch to another branch")]
    Switch {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine-readable output")]
        porcelain: bool,
    },
    #[command(name = "diff", about = "Show unstaged or staged changes")]
    Diff {
        #[arg(long, help = "Compare HEAD with the index")]
        cached: bool,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_repository(root: Option<PathBuf>) -> Result<Repository> {
    let root = match root {
        Some(root) => {
            std::fs::create_dir_all(&root)
                .with_context(|| format!("failed to create {}", root.display()))?;
            root
        }
        None => std::env::current_dir()?,
    };
    let root = root.canonicalize()?;

    Ok(Repository::new(RepositoryConfig::new(root), Box::new(std::io::stdout())))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let root = match &cli.command {
        Commands::Init { path } => path.clone(),
        _ => None,
    };
    let repository = open_repository(root)?;

    match cli.command {
        Commands::Init { .. } => repository.init()?,
        Commands::HashObject { write, file } => repository.hash_object(&file, write)?,
        Commands::CatFile {
            pretty,
            object_type,
            size,
            object,
        } => {
            let mode = match (pretty, object_type, size) {
                (_, true, _) => CatFileMode::Type,
                (_, _, true) => CatFileMode::Size,
                _ => CatFileMode::Pretty,
            };
            repository.cat_file(&object, mode)?
        }
        Commands::LsFiles { stage } => repository.ls_files(stage)?,
        Commands::Add { paths } => repository.add(&paths)?,
        Commands::Rm { cached, paths } => repository.rm(&paths, cached)?,
        Commands::WriteTree => repository.write_tree()?,
        Commands::ReadTree { tree_ish } => repository.read_tree(&tree_ish)?,
        Commands::LsTree {
            recursive,
            show_trees,
            only_trees,
            tree_ish,
        } => {
            let options = WalkOptions {
                recursive,
                // one level lists subtrees too, as `git ls-tree` does
                include_trees: show_trees || !recursive,
                only_trees,
            };
            repository.ls_tree(&tree_ish, options)?
        }
        Commands::CommitTree {
            tree,
            parents,
            message,
        } => repository.commit_tree(&tree, &parents, &message)?,
        Commands::SymbolicRef { name, target } => {
            repository.symbolic_ref(&name, target.as_deref())?
        }
        Commands::UpdateRef { name, revision } => repository.update_ref(&name, &revision)?,
        Commands::RevParse { revision } => repository.rev_parse(&revision)?,
        Commands::Commit { message } => repository.commit(&message)?,
        Commands::Log { oneline, revisions } => {
            repository.log(&LogOptions { oneline, revisions })?
        }
        Commands::Branch {
            name,
            start,
            delete,
        } => match (delete, name) {
            (Some(branch), _) => repository.delete_branch(&branch)?,
            (None, Some(name)) => repository.branch(&name, start.as_deref())?,
            (None, None) => repository.list_branches()?,
        },
        Commands::Switch { branch } => repository.switch(&branch)?,
        Commands::Status { porcelain } => repository.status(porcelain)?,
        Commands::Diff { cached } => repository.diff(cached)?,
    }

    repository.writer().flush()?;

    Ok(())
}
