use super::document::Documents;
use super::nav::NavNode;

/// Navigation used when a workspace has no stored tree yet
pub fn default_navigation() -> Vec<NavNode> {
    vec![
        NavNode::folder("intro", "Introduction")
            .with_icon("file")
            .with_children(vec![
                NavNode::note("overview", "Overview"),
                NavNode::note("quickstart", "Quick start"),
            ]),
        NavNode::folder("terminal", "Terminal & CLI")
            .with_icon("terminal")
            .with_children(vec![
                NavNode::note("tmux", "Using tmux"),
                NavNode::note("ssh", "SSH & connections"),
            ]),
        NavNode::folder("code", "Code")
            .with_icon("code")
            .with_children(vec![
                NavNode::note("structure", "Project structure"),
                NavNode::note("components", "Components"),
            ]),
    ]
}

const OVERVIEW: &str = "\
# Overview

Welcome to your documentation! This is a place to organize the documents, code
snippets and guides for your project.

> [!TIP] Use `folio write <id>` to replace this page with your own content.

## How to use

- **Edit pages**: `folio write overview < page.md`
- **Add pages**: `folio add note \"My page\" --parent intro`
- **Checklists**: `folio add task \"Release\"`, then `folio task add <id> \"First step\"`
- **Markdown**: pages are plain markdown files under `folio/docs/`
";

const QUICKSTART: &str = "\
# Quick start

Follow these steps to set up the environment.

## 1. Clone the repository

```bash
git clone https://example.com/your-project.git
cd your-project
```

## 2. Install dependencies

```bash
npm install
```

## 3. Configure variables

```bash
cp .env.example .env.local
```
";

const TMUX: &str = "\
# Using tmux

tmux is a terminal multiplexer: several sessions in a single window.

> [!TIP] tmux keeps sessions alive after an SSH disconnect.

## Basic commands

```bash
# New named session
tmux new -s my-session

# List sessions
tmux ls

# Attach to a session
tmux attach -t my-session
```

## Key bindings

All bindings start with `Ctrl+B`:

- `Ctrl+B D` - detach
- `Ctrl+B C` - new window
- `Ctrl+B %` - split vertically
- `Ctrl+B \"` - split horizontally
";

/// Documents written when a workspace is initialised with seed content
pub fn default_documents() -> Documents {
    let mut docs = Documents::new();
    docs.insert("overview".to_string(), OVERVIEW.to_string());
    docs.insert("quickstart".to_string(), QUICKSTART.to_string());
    docs.insert("tmux".to_string(), TMUX.to_string());
    docs
}
