use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = concat!("folio v", env!("CARGO_PKG_VERSION"), " - notes and checklists as plain files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workspace in the current directory
    Init(InitArgs),
    /// Print the navigation tree
    Tree(TreeArgs),
    /// Add a section, folder, note or task list
    Add(AddArgs),
    /// Delete a node and everything under it
    Rm(RmArgs),
    /// Change a node's title
    Rename(RenameArgs),
    /// Print a document with its location
    Show(ShowArgs),
    /// Replace a document's content
    Write(WriteArgs),
    /// Work with the checklist of a task list
    Task(TaskCmd),
    /// Validate workspace integrity
    Check,
    /// View or clear the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Workspace name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Start without the sample tree and documents
    #[arg(long)]
    pub empty: bool,
    /// Reinitialize even if folio/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Only show nodes whose title contains this text (and their ancestors)
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Node kind: section, folder, note, task
    pub kind: String,
    /// Title (default depends on kind)
    pub title: Option<String>,
    /// Parent container id (default: root)
    #[arg(long)]
    pub parent: Option<String>,
    /// Icon tag
    #[arg(long)]
    pub icon: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Node id
    pub id: String,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Node id
    pub id: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Node id
    pub id: String,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Node id
    pub id: String,
    /// New content (default: read from stdin)
    #[arg(long)]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Checklists
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Print items with their numbers and progress
    List(TaskListArgs),
    /// Add an item at the end, under an item, or after an item
    Add(TaskAddArgs),
    /// Check or uncheck an item and everything under it
    Toggle(TaskRefArgs),
    /// Change an item's text
    Edit(TaskEditArgs),
    /// Delete an item and everything under it
    Rm(TaskRefArgs),
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Task list node id
    pub doc: String,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Task list node id
    pub doc: String,
    /// Item text (default: placeholder text)
    pub text: Option<String>,
    /// Add as the last child of this item
    #[arg(long, conflicts_with = "after")]
    pub under: Option<String>,
    /// Add right after this item
    #[arg(long)]
    pub after: Option<String>,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Task list node id
    pub doc: String,
    /// Item number, as shown by `task list`
    pub item: String,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Task list node id
    pub doc: String,
    /// Item number, as shown by `task list`
    pub item: String,
    /// New text
    pub text: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Remove all entries
    #[arg(long)]
    pub prune: bool,
}
