//! # CLI Dispatch
//!
//! - `run()`: Parses arguments, builds the session and runs one command or the
//!   interactive loop (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` from the data dir and configuration
//! - `execute()`: Per-command handling against the session
//! - `split_line()`: Tokenizes one interactive line, honouring quotes

use super::render::{
    print_lines, print_selected, print_toasts, render_form, render_table,
    render_validation_errors,
};
use super::setup::{Cli, Command, FormArgs, ReplLine};
use super::init_logging;
use clap::Parser;
use directories::ProjectDirs;
use paydash::api::CustomerApi;
use paydash::config::{ConfigAction, DashConfig};
use paydash::customers::CustomerQueries;
use paydash::dashboard::Dashboard;
use paydash::error::{DashError, Result};
use paydash::form::CustomerForm;
use paydash::model::CustomerId;
use paydash::state::UiAction;
use paydash::store::fs::FileStore;
use paydash::toast::Toast;
use paydash::view::HeaderAction;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

struct AppContext {
    dashboard: Dashboard<FileStore>,
    data_dir: PathBuf,
    /// Values typed into the open form so far.
    form: Option<CustomerForm>,
}

/// What to show once a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Table,
    Form,
    Nothing,
    Quit,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(command) => run_once(&mut ctx, command).await,
        None => run_interactive(&mut ctx).await,
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let config = DashConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        DashConfig::default()
    });
    debug!(data_dir = %data_dir.display(), ?config, "starting session");

    let api = CustomerApi::new(FileStore::new(data_dir.clone()))
        .with_latency(config.latency())
        .with_seed_count(config.seed_count);
    let dashboard = Dashboard::new(CustomerQueries::new(api), config.rows_per_page);

    Ok(AppContext {
        dashboard,
        data_dir,
        form: None,
    })
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    ProjectDirs::from("com", "paydash", "paydash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DashError::Api("Could not determine data directory".to_string()))
}

async fn run_once(ctx: &mut AppContext, command: Command) -> Result<()> {
    let result = execute(ctx, command).await;
    print_toasts(&ctx.dashboard.drain_toasts());
    let outcome = result.map_err(|e| {
        if let DashError::Validation(errors) = &e {
            eprint!("{}", render_validation_errors(errors));
        }
        e
    })?;
    show(ctx, outcome).await
}

async fn run_interactive(ctx: &mut AppContext) -> Result<()> {
    let prompt = std::io::stdin().is_terminal();
    show(ctx, Outcome::Table).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if prompt {
            print!("paydash> ");
            let _ = std::io::stdout().flush();
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let words = match split_line(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        let command = match ReplLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        let result = execute(ctx, command).await;
        print_toasts(&ctx.dashboard.drain_toasts());
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(DashError::Validation(errors)) => {
                eprint!("{}", render_validation_errors(&errors));
                continue;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        if outcome == Outcome::Quit {
            break;
        }
        if let Err(e) = show(ctx, outcome).await {
            eprintln!("Error: {}", e);
        }
    }
    Ok(())
}

async fn show(ctx: &mut AppContext, outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Table => {
            let view = ctx.dashboard.table().await?;
            print!("{}", render_table(&view));
        }
        Outcome::Form => {
            let form = current_form(ctx).await?;
            print!("{}", render_form(&form, &ctx.dashboard.state().modal));
        }
        Outcome::Nothing | Outcome::Quit => {}
    }
    Ok(())
}

async fn execute(ctx: &mut AppContext, command: Command) -> Result<Outcome> {
    let dash = &mut ctx.dashboard;
    match command {
        Command::List { search, page, rows } => {
            if let Some(query) = search {
                dash.dispatch(UiAction::SetSearchQuery(query));
            }
            if let Some(rows) = rows {
                dash.dispatch(UiAction::SetRowsPerPage(rows));
            }
            if let Some(page) = page {
                dash.dispatch(UiAction::SetCurrentPage(page));
            }
            Ok(Outcome::Table)
        }
        Command::Search { text } => {
            dash.dispatch(UiAction::SetSearchQuery(text.join(" ")));
            Ok(Outcome::Table)
        }
        Command::Page { page } => {
            dash.dispatch(UiAction::SetCurrentPage(page));
            Ok(Outcome::Table)
        }
        Command::Next => {
            if !dash.next_page().await? {
                print_toasts(&[Toast::info("Already on the last page")]);
            }
            Ok(Outcome::Table)
        }
        Command::Prev => {
            if !dash.previous_page() {
                print_toasts(&[Toast::info("Already on the first page")]);
            }
            Ok(Outcome::Table)
        }
        Command::Rows { rows } => {
            dash.dispatch(UiAction::SetRowsPerPage(rows));
            Ok(Outcome::Table)
        }
        Command::Select { rows } => {
            dash.toggle_rows(&rows).await?;
            Ok(Outcome::Table)
        }
        Command::SelectPage => {
            dash.toggle_page().await?;
            Ok(Outcome::Table)
        }
        Command::Clear => {
            dash.dispatch(UiAction::ClearSelection);
            Ok(Outcome::Table)
        }
        Command::New => {
            open_form(ctx, UiAction::OpenAddModal).await?;
            Ok(Outcome::Form)
        }
        Command::Edit { row } => {
            let id = resolve_one(&ctx.dashboard, &row).await?;
            open_form(ctx, UiAction::OpenEditModal(id)).await?;
            Ok(Outcome::Form)
        }
        Command::Action => match dash.activate_primary().await? {
            HeaderAction::Delete(_) => Ok(Outcome::Table),
            HeaderAction::Add | HeaderAction::Update(_) => {
                ctx.form = ctx.dashboard.form_for_modal().await?;
                Ok(Outcome::Form)
            }
        },
        Command::Save { fields } => {
            save_form(ctx, fields).await?;
            Ok(Outcome::Table)
        }
        Command::Cancel => {
            dash.dispatch(UiAction::CloseModal);
            ctx.form = None;
            Ok(Outcome::Table)
        }
        Command::Add { fields } => {
            open_form(ctx, UiAction::OpenAddModal).await?;
            save_form(ctx, fields).await?;
            Ok(Outcome::Table)
        }
        Command::Update { row, fields } => {
            let id = resolve_one(&ctx.dashboard, &row).await?;
            open_form(ctx, UiAction::OpenEditModal(id)).await?;
            save_form(ctx, fields).await?;
            Ok(Outcome::Table)
        }
        Command::Delete { rows } => {
            if rows.is_empty() {
                let selected: Vec<CustomerId> = dash.state().selected.iter().cloned().collect();
                if selected.is_empty() {
                    return Err(DashError::Api(
                        "No customers selected; pass rows to delete".to_string(),
                    ));
                }
                print_selected(&selected);
                dash.delete_selected().await?;
            } else {
                let ids = dash.resolve_rows(&rows).await?;
                dash.delete_rows(ids).await?;
            }
            Ok(Outcome::Table)
        }
        Command::Config { key, value } => {
            let lines = DashConfig::apply(&ctx.data_dir, ConfigAction::from_args(key, value))?;
            print_lines(&lines);
            Ok(Outcome::Nothing)
        }
        Command::Quit => Ok(Outcome::Quit),
    }
}

async fn resolve_one(dash: &Dashboard<FileStore>, row: &str) -> Result<CustomerId> {
    dash.resolve_rows(&[row])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DashError::Api(format!("Row {} not found", row)))
}

async fn open_form(ctx: &mut AppContext, action: UiAction) -> Result<()> {
    ctx.dashboard.dispatch(action);
    ctx.form = ctx.dashboard.form_for_modal().await?;
    Ok(())
}

async fn current_form(ctx: &mut AppContext) -> Result<CustomerForm> {
    if let Some(form) = &ctx.form {
        return Ok(form.clone());
    }
    ctx.form = ctx.dashboard.form_for_modal().await?;
    ctx.form
        .clone()
        .ok_or_else(|| DashError::Api("No customer form is open; use new or edit ROW".to_string()))
}

/// Merges the given fields into the open form and submits it. The typed
/// values are kept while the form stays open.
async fn save_form(ctx: &mut AppContext, fields: FormArgs) -> Result<()> {
    let form = current_form(ctx).await?.merge(fields.patch());
    ctx.form = Some(form.clone());
    ctx.dashboard.submit_form(&form).await?;
    ctx.form = None;
    Ok(())
}

/// Splits an interactive line into words. Single or double quotes group
/// words; a backslash escapes the next character.
pub(super) fn split_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "Trailing backslash".to_string())?;
                current.push(escaped);
                in_word = true;
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unclosed quote {}", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_words() {
        assert_eq!(
            split_line("  select 1  3-5 ").unwrap(),
            vec!["select", "1", "3-5"]
        );
        assert!(split_line("   ").unwrap().is_empty());
    }

    #[test]
    fn split_honours_quotes() {
        assert_eq!(
            split_line(r#"add --name "Maria Garcia" --description 'Net 30, monthly'"#).unwrap(),
            vec![
                "add",
                "--name",
                "Maria Garcia",
                "--description",
                "Net 30, monthly"
            ]
        );
        assert_eq!(split_line(r#"search """#).unwrap(), vec!["search", ""]);
    }

    #[test]
    fn split_escapes_and_errors() {
        assert_eq!(split_line(r"search O\'Brien").unwrap(), vec!["search", "O'Brien"]);
        assert!(split_line(r#"add --name "Maria"#).is_err());
        assert!(split_line("search \\").is_err());
    }
}
