mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::fs_store::{FsDocumentStore, FsNavigationStore};
use crate::io::lock::FileLock;
use crate::io::recovery;
use crate::io::workspace_io::{self, Workspace};
use crate::model::document::placeholder_content;
use crate::model::nav::NodeKind;
use crate::ops::ids::RandomIds;
use crate::ops::nav_ops::{self, AddOutcome};
use crate::ops::{check, task_ops};
use crate::session::Session;

type Result<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

type FsSession = Session<FsDocumentStore, FsNavigationStore>;

/// Flags shared by every command
pub struct Context {
    pub json: bool,
    pub workspace_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result {
    let workspace_dir = match &cli.workspace_dir {
        Some(dir) => Some(
            std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Context {
        json: cli.json,
        workspace_dir,
    };

    match cli.command {
        Commands::Init(args) => cmd_init(args, &ctx),

        // Read commands
        Commands::Tree(args) => cmd_tree(args, &ctx),
        Commands::Show(args) => cmd_show(args, &ctx),
        Commands::Check => cmd_check(&ctx),

        // Write commands
        Commands::Add(args) => cmd_add(args, &ctx),
        Commands::Rm(args) => cmd_rm(args, &ctx),
        Commands::Rename(args) => cmd_rename(args, &ctx),
        Commands::Write(args) => cmd_write(args, &ctx),
        Commands::Task(cmd) => match cmd.action {
            TaskAction::List(args) => cmd_task_list(args, &ctx),
            TaskAction::Add(args) => cmd_task_add(args, &ctx),
            TaskAction::Toggle(args) => cmd_task_toggle(args, &ctx),
            TaskAction::Edit(args) => cmd_task_edit(args, &ctx),
            TaskAction::Rm(args) => cmd_task_rm(args, &ctx),
        },

        Commands::Recovery(args) => cmd_recovery(args, &ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_workspace(ctx: &Context) -> Result<Workspace> {
    let start = match &ctx.workspace_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = workspace_io::discover_workspace(&start)?;
    Ok(workspace_io::load_workspace(&root)?)
}

fn open_session(workspace: &Workspace) -> Result<FsSession> {
    let ids = RandomIds::new(workspace.config.ids.length);
    let session = Session::open(
        workspace.document_store(),
        workspace.navigation_store(),
        Box::new(ids),
        workspace.config.clone(),
    )?
    .with_recovery_dir(&workspace.folio_dir);
    Ok(session)
}

/// Item texts and titles are written as one markdown line each.
fn require_single_line(what: &str, text: &str) -> Result {
    if text.contains(['\n', '\r']) {
        return Err(format!("{} must be a single line", what).into());
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_tree(args: TreeArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let session = open_session(&workspace)?;

    let filtered;
    let nodes = match &args.filter {
        Some(query) => {
            filtered = nav_ops::filter_tree(session.tree(), query);
            &filtered[..]
        }
        None => session.tree(),
    };

    if ctx.json {
        return print_json(&nodes);
    }
    if nodes.is_empty() {
        match &args.filter {
            Some(query) => println!("no titles match \"{}\"", query),
            None => println!("(empty)"),
        }
        return Ok(());
    }
    for line in format_nav_tree(nodes) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let session = open_session(&workspace)?;

    let path = nav_ops::breadcrumb(session.tree(), &args.id)
        .ok_or_else(|| format!("node not found: {}", args.id))?;
    let Some(node) = path.last() else {
        return Err(format!("node not found: {}", args.id).into());
    };
    let content = session.document(&args.id);

    if ctx.json {
        return print_json(&ShowJson {
            id: &node.id,
            title: &node.title,
            kind: node.kind(),
            path: path.iter().map(|n| n.title.as_str()).collect(),
            content,
        });
    }

    println!("{}", format_breadcrumb(&path));
    println!();
    if node.is_container() {
        println!("({}, {} items)", node.kind(), node.children().len());
    } else {
        match content {
            Some(text) => print!("{}", text),
            None => print!("{}", placeholder_content(&node.title)),
        }
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let session = open_session(&workspace)?;
    let result = check::check_workspace(session.tree(), session.documents());

    if ctx.json {
        return print_json(&result);
    }

    if !result.errors.is_empty() {
        println!("Errors:");
        for err in &result.errors {
            match err {
                check::CheckError::DuplicateId { id, count } => {
                    println!("  {} is used by {} nodes", id, count);
                }
                check::CheckError::InvalidId { id } => {
                    println!("  {:?} cannot be used as a document id", id);
                }
            }
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            println!();
        }
        println!("Warnings:");
        for warn in &result.warnings {
            match warn {
                check::CheckWarning::OrphanDocument { id } => {
                    println!("  document {} has no node", id);
                }
                check::CheckWarning::ContainerDocument { id } => {
                    println!("  document {} belongs to a folder or section", id);
                }
            }
        }
    }
    if result.valid {
        println!("✓ workspace is valid");
    } else {
        println!("✗ workspace has errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, ctx: &Context) -> Result {
    let kind = NodeKind::parse(&args.kind).ok_or_else(|| {
        format!(
            "unknown kind '{}' (expected: section, folder, note, task)",
            args.kind
        )
    })?;

    if let Some(title) = &args.title {
        require_single_line("title", title)?;
    }

    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;

    let parent = args.parent.as_deref();
    let result =
        session.add_node_with_icon(parent, kind, args.title.as_deref(), args.icon.as_deref())?;
    match result.outcome {
        AddOutcome::Added => {}
        AddOutcome::ParentNotFound => {
            return Err(format!("parent not found: {}", parent.unwrap_or_default()).into());
        }
        AddOutcome::ParentNotContainer => {
            return Err(format!(
                "{} is not a folder or section and cannot contain nodes",
                parent.unwrap_or_default()
            )
            .into());
        }
    }

    if ctx.json {
        return print_json(&AddedJson {
            id: result.node.id,
            title: result.node.title,
            kind,
            parent: args.parent,
        });
    }
    println!("{}", result.node.id);
    Ok(())
}

fn cmd_rm(args: RmArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;

    let report = session.delete_node(&args.id)?;
    if report.deleted_ids.is_empty() {
        return Err(format!("node not found: {}", args.id).into());
    }
    let next = nav_ops::find_first_leaf(session.tree()).map(str::to_string);

    for failure in &report.failures {
        eprintln!(
            "warning: document {} was not deleted: {}",
            failure.id, failure.error
        );
    }

    if ctx.json {
        print_json(&DeletedJson {
            deleted_ids: report.deleted_ids.clone(),
            failed_ids: report.failures.iter().map(|f| f.id.clone()).collect(),
            next_selection: next,
        })?;
    } else {
        println!("deleted: {}", report.deleted_ids.join(", "));
        match next {
            Some(id) => println!("next: {}", id),
            None => println!("next: (none)"),
        }
    }

    if !report.is_complete() {
        return Err(format!(
            "{} document(s) could not be deleted (see `folio recovery`)",
            report.failures.len()
        )
        .into());
    }
    Ok(())
}

fn cmd_rename(args: RenameArgs, ctx: &Context) -> Result {
    require_single_line("title", &args.title)?;
    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;

    if !session.rename_node(&args.id, &args.title)? {
        return Err(format!("node not found: {}", args.id).into());
    }
    println!("{} renamed", args.id);
    Ok(())
}

fn cmd_write(args: WriteArgs, ctx: &Context) -> Result {
    let content = match args.text {
        Some(text) => text,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;

    let node = session
        .node(&args.id)
        .ok_or_else(|| format!("node not found: {}", args.id))?;
    if node.is_container() {
        return Err(format!("{} is a {} and has no document", args.id, node.kind()).into());
    }

    session.save_document(&args.id, &content)?;
    println!("{} saved", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Checklist handlers
// ---------------------------------------------------------------------------

fn cmd_task_list(args: TaskListArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let session = open_session(&workspace)?;
    let tasks = session.tasks(&args.doc)?;
    let title = nav_ops::find_title(session.tree(), &args.doc).unwrap_or_default();

    if ctx.json {
        return print_json(&TaskListJson {
            doc: args.doc.clone(),
            title: title.to_string(),
            progress: task_ops::progress(&tasks),
            tasks: tasks.iter().map(task_to_json).collect(),
        });
    }
    for line in format_task_listing(title, &tasks) {
        println!("{}", line);
    }
    Ok(())
}

/// Fail unless `item` numbers an existing item, before anything is rewritten.
fn require_item(session: &FsSession, doc: &str, item: &str) -> Result {
    let tasks = session.tasks(doc)?;
    if task_ops::find_task(&tasks, item).is_none() {
        return Err(format!("item not found: {} in {}", item, doc).into());
    }
    Ok(())
}

fn cmd_task_add(args: TaskAddArgs, ctx: &Context) -> Result {
    if let Some(text) = &args.text {
        require_single_line("item text", text)?;
    }
    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;

    if let Some(anchor) = args.under.as_deref().or(args.after.as_deref()) {
        require_item(&session, &args.doc, anchor)?;
    }

    let placeholders = session.config().tasks.clone();
    let number = session.edit_tasks(&args.doc, |tasks, ids| {
        let id = if let Some(parent) = &args.under {
            let text = args.text.as_deref().unwrap_or(&placeholders.child_placeholder);
            task_ops::add_child(tasks, parent, ids, text)
        } else if let Some(after) = &args.after {
            let id = task_ops::add_sibling(tasks, after, ids);
            if let Some(id) = &id {
                let text = args.text.as_deref().unwrap_or(&placeholders.root_placeholder);
                task_ops::update_text(tasks, id, text);
            }
            id
        } else {
            let text = args.text.as_deref().unwrap_or(&placeholders.root_placeholder);
            Some(task_ops::add_root(tasks, ids, text))
        };
        match id {
            Some(id) => task_ops::position(tasks, &id),
            None => None,
        }
    })?;

    match number {
        Some(n) => println!("{}", n),
        None => return Err("item was not added".into()),
    }
    Ok(())
}

fn cmd_task_toggle(args: TaskRefArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;
    require_item(&session, &args.doc, &args.item)?;

    let completed = session.edit_tasks(&args.doc, |tasks, _| task_ops::toggle(tasks, &args.item))?;
    let mark = if completed == Some(true) { "done" } else { "open" };
    println!("{} {}", args.item, mark);
    Ok(())
}

fn cmd_task_edit(args: TaskEditArgs, ctx: &Context) -> Result {
    require_single_line("item text", &args.text)?;
    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;
    require_item(&session, &args.doc, &args.item)?;

    session.edit_tasks(&args.doc, |tasks, _| {
        task_ops::update_text(tasks, &args.item, &args.text)
    })?;
    println!("{} updated", args.item);
    Ok(())
}

fn cmd_task_rm(args: TaskRefArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;
    let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
    let mut session = open_session(&workspace)?;
    require_item(&session, &args.doc, &args.item)?;

    let removed = session.edit_tasks(&args.doc, |tasks, _| task_ops::delete_task(tasks, &args.item))?;
    let nested = removed
        .map(|task| task_ops::count_tasks(&task.children))
        .unwrap_or_default();
    if nested > 0 {
        println!("{} deleted with {} nested item(s)", args.item, nested);
    } else {
        println!("{} deleted", args.item);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryArgs, ctx: &Context) -> Result {
    let workspace = load_workspace(ctx)?;

    if args.prune {
        let _lock = FileLock::acquire_default(&workspace.folio_dir)?;
        let removed = recovery::prune_recovery(&workspace.folio_dir)?;
        println!("removed {} recovery entries", removed);
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&workspace.folio_dir, Some(args.limit.unwrap_or(10)));
    if ctx.json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        return print_json(&values);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}
