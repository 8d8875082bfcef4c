use serde::Serialize;

use crate::cli::commands::InitArgs;
use crate::io::workspace_io::{self, InitOptions};

use super::Context;

#[derive(Serialize)]
struct InitJson {
    name: String,
    path: String,
}

pub fn cmd_init(args: InitArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let root = match &ctx.workspace_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    // Nested workspaces are allowed but easy to create by accident
    if !args.force
        && let Some(parent) = root.parent()
        && let Ok(parent_root) = workspace_io::discover_workspace(parent)
    {
        eprintln!(
            "note: parent workspace found at {}/",
            parent_root.join(workspace_io::FOLIO_DIR).display()
        );
    }

    let workspace = workspace_io::init_workspace(
        &root,
        &InitOptions {
            name: args.name,
            empty: args.empty,
            force: args.force,
        },
    )?;

    let name = workspace.config.workspace.name;
    if ctx.json {
        let out = InitJson {
            name,
            path: workspace.folio_dir.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Initialized folio workspace: {}", name);
    }
    Ok(())
}
