//! Command dispatch: seeds a session, applies actions, prints results.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tokio::runtime::Runtime;
use tracing::{debug, instrument};

use crate::application::defaults::{demo_board, demo_forest};
use crate::application::services::{LazyLoader, LoadStatus, TreeEffect, TreeSession};
use crate::application::{KanbanAction, TreeAction};
use crate::cli::args::{Cli, Commands, ConfigCommands, KanbanCommands, TreeCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{board_lines, board_summary, RenderOptions, TreeRender};
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::{Board, Forest};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `boardtree --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config_path = cli.config.as_deref().map(expand_path);
    let settings = Settings::load(config_path.as_deref())?;
    if !settings.display.color {
        colored::control::set_override(false);
    }
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Kanban { command } => execute_kanban(&container, command),
        Commands::Tree { command } => execute_tree(&container, command),
        Commands::Config { command } => execute_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn render_options(container: &ServiceContainer, all: bool) -> RenderOptions {
    RenderOptions {
        show_ids: container.settings.display.show_ids,
        all,
    }
}

fn load_board(container: &ServiceContainer, seed: Option<&Path>) -> CliResult<Board> {
    let board = match seed {
        Some(path) => container.seed_service().load_board(&expand_path(path))?,
        None => demo_board().map_err(crate::application::ApplicationError::from)?,
    };
    Ok(board)
}

fn load_forest(container: &ServiceContainer, seed: Option<&Path>) -> CliResult<Forest> {
    let forest = match seed {
        Some(path) => container.seed_service().load_forest(&expand_path(path))?,
        None => demo_forest().map_err(crate::application::ApplicationError::from)?,
    };
    Ok(forest)
}

fn print_board(board: &Board, options: RenderOptions) {
    for line in board_lines(board, options) {
        output::info(&line);
    }
}

#[instrument(skip(container))]
fn execute_kanban(container: &ServiceContainer, command: &KanbanCommands) -> CliResult<()> {
    match command {
        KanbanCommands::Show { seed } => {
            let board = load_board(container, seed.as_deref())?;
            print_board(&board, render_options(container, false));
            Ok(())
        }
        KanbanCommands::Apply { script, seed } => {
            let board = load_board(container, seed.as_deref())?;
            let actions: Vec<KanbanAction> =
                container.seed_service().load_script(&expand_path(script))?;
            debug!("applying {} kanban actions", actions.len());

            let mut session = container.kanban_session(board);
            output::header(&format!("Applying {} actions", actions.len()));
            for (n, action) in actions.into_iter().enumerate() {
                let label = format!("{}. {}", n + 1, action);
                match session.apply(action) {
                    Ok(true) => output::success_detail(&label),
                    Ok(false) => output::skipped(&format!("{} (no change)", label)),
                    Err(e) => output::failure(&format!("{}: {}", label, e)),
                }
            }
            output::info("");
            print_board(session.board(), render_options(container, false));
            output::detail(&board_summary(session.board()));
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn execute_tree(container: &ServiceContainer, command: &TreeCommands) -> CliResult<()> {
    match command {
        TreeCommands::Show { seed, all } => {
            let forest = load_forest(container, seed.as_deref())?;
            output::info(&forest.to_tree(render_options(container, *all)));
            Ok(())
        }
        TreeCommands::Apply { script, seed, all } => {
            let forest = load_forest(container, seed.as_deref())?;
            let actions: Vec<TreeAction> =
                container.seed_service().load_script(&expand_path(script))?;
            debug!("applying {} tree actions", actions.len());

            let runtime = Runtime::new().map_err(|e| InfraError::Runtime {
                message: e.to_string(),
            })?;
            let mut loader = LazyLoader::new(container.children.clone(), runtime.handle().clone());
            let mut session = container.tree_session(forest);

            output::header(&format!("Applying {} actions", actions.len()));
            for (n, action) in actions.into_iter().enumerate() {
                let label = format!("{}. {}", n + 1, action);
                match session.apply(action) {
                    Ok(TreeEffect::Load(ticket)) => {
                        output::success_detail(&format!("{} (loading {})", label, ticket.node));
                        loader.request(ticket);
                        settle_loads(&runtime, &mut session, &mut loader);
                    }
                    Ok(TreeEffect::Changed) => output::success_detail(&label),
                    Ok(TreeEffect::Unchanged) => {
                        output::skipped(&format!("{} (no change)", label))
                    }
                    Err(e) => output::failure(&format!("{}: {}", label, e)),
                }
            }
            output::info("");
            output::info(&session.forest().to_tree(render_options(container, *all)));
            Ok(())
        }
    }
}

/// Block until every requested load has been fetched and reconciled.
fn settle_loads(runtime: &Runtime, session: &mut TreeSession, loader: &mut LazyLoader) {
    for status in runtime.block_on(session.settle(loader)) {
        match status {
            LoadStatus::Applied => output::success_detail("children loaded"),
            LoadStatus::Failed(cause) => output::failure(&format!("loading failed: {}", cause)),
            LoadStatus::Discarded(reason) => {
                output::warning(&format!("load response discarded: {:?}", reason))
            }
        }
    }
}

fn execute_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            output::detail(&format!("local: {}", LOCAL_CONFIG_FILE));
        }
    }
    Ok(())
}
