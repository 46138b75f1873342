use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::HierarchyService;
use crate::application::ApplicationResult;
use crate::cli::args::{Cli, Commands, ConfigCommands, TokenCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{config_template, global_config_path, local_config_path, Settings};
use crate::domain::{flatten, forest_to_tree, render_lines, Node};
use crate::infrastructure::traits::ACCESS_TOKEN_KEY;
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => _completion(*shell),
        Some(Commands::Config { command }) => _config(command),
        Some(command) => {
            let container = build_container(cli)?;
            dispatch(cli, command, &container)
        }
        None => Err(CliError::Usage(
            "no command given, run with --help".to_string(),
        )),
    }
}

fn dispatch(cli: &Cli, command: &Commands, container: &ServiceContainer) -> CliResult<()> {
    let service = container.hierarchy_service();
    match command {
        Commands::Tree { category } => _tree(&service, category.as_deref(), cli.json),
        Commands::Flatten {
            category,
            start_depth,
            indent,
        } => {
            let unit = indent
                .as_deref()
                .unwrap_or(container.settings.indent_unit.as_str());
            _flatten(&service, category.as_deref(), *start_depth, unit, cli.json)
        }
        Commands::Parents { category, current } => {
            _parents(&service, category, current.as_deref(), cli.json)
        }
        Commands::Build { category } => _build(&service, category.as_deref()),
        Commands::Path { category, id } => _path(&service, category, id, cli.json),
        Commands::Get { id } => _get(&service, id, cli.json),
        Commands::Reparent {
            category,
            id,
            parent,
        } => _reparent(&service, category, id, parent.as_deref(), cli.json),
        Commands::Token { command } => _token(container, command),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let cwd = std::env::current_dir().ok();
    let mut settings = Settings::load(cwd.as_deref())?;
    if let Some(policy) = cli.orphans {
        settings.orphan_policy = policy;
    }
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings, cli.file.as_deref())?)
}

/// Service failures were already surfaced by the notifier.
fn reported<T>(result: ApplicationResult<T>) -> CliResult<T> {
    result.map_err(CliError::Reported)
}

fn print_json(value: &impl Serialize) -> CliResult<()> {
    output::info(&serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Forest for a category, or for all sub-categories when none is given.
fn load_forest(service: &HierarchyService, category: Option<&str>) -> CliResult<Vec<Node>> {
    match category {
        Some(id) => reported(service.hierarchy(id)),
        None => {
            let flat = reported(service.flat_list(None))?;
            reported(service.build_tree(&flat))
        }
    }
}

#[instrument(skip(service))]
fn _tree(service: &HierarchyService, category: Option<&str>, json: bool) -> CliResult<()> {
    let forest = load_forest(service, category)?;
    if json {
        return print_json(&forest);
    }
    let label = category.unwrap_or("sub-categories");
    output::info(&forest_to_tree(label, &forest));
    Ok(())
}

#[instrument(skip(service))]
fn _flatten(
    service: &HierarchyService,
    category: Option<&str>,
    start_depth: usize,
    unit: &str,
    json: bool,
) -> CliResult<()> {
    let forest = load_forest(service, category)?;
    let entries = flatten(&forest, start_depth);
    if json {
        return print_json(&entries);
    }
    for line in render_lines(&entries, unit) {
        output::info(&line);
    }
    Ok(())
}

#[instrument(skip(service))]
fn _parents(
    service: &HierarchyService,
    category: &str,
    current: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let parents = reported(service.available_parents(category, current))?;
    if json {
        return print_json(&parents);
    }
    if parents.is_empty() {
        output::warning("no valid parents");
        return Ok(());
    }
    for node in &parents {
        output::info(&format!("{} {}", node.name, output::dim(&node.id)));
    }
    Ok(())
}

#[instrument(skip(service))]
fn _build(service: &HierarchyService, category: Option<&str>) -> CliResult<()> {
    let flat = reported(service.flat_list(category))?;
    let forest = reported(service.build_tree(&flat))?;
    print_json(&forest)
}

#[instrument(skip(service))]
fn _path(service: &HierarchyService, category: &str, id: &str, json: bool) -> CliResult<()> {
    let path = reported(service.breadcrumb(category, id))?;
    if json {
        return print_json(&path);
    }
    output::info(&path.iter().map(|n| n.name.as_str()).join(" > "));
    Ok(())
}

#[instrument(skip(service))]
fn _get(service: &HierarchyService, id: &str, json: bool) -> CliResult<()> {
    let node = reported(service.get(id))?;
    if json {
        return print_json(&node);
    }
    output::header(format!("{} {}", node.name, output::dim(&node.id)));
    if let Some(category) = &node.category {
        output::detail(format!("category: {} ({})", category.name, category.id));
    }
    match (&node.parent, node.parent_id()) {
        (Some(parent), _) => output::detail(format!("parent:   {} ({})", parent.name, parent.id)),
        (None, Some(id)) => output::detail(format!("parent:   {}", id)),
        (None, None) => output::detail("parent:   -"),
    }
    if !node.children.is_empty() {
        output::detail(format!(
            "children: {}",
            node.children.iter().map(|c| c.name.as_str()).join(", ")
        ));
    }
    for property in &node.asset_properties {
        output::detail(format!(
            "property: {} ({:?})",
            property.name, property.data_type
        ));
    }
    Ok(())
}

#[instrument(skip(service))]
fn _reparent(
    service: &HierarchyService,
    category: &str,
    id: &str,
    parent: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let moved = reported(service.reparent(category, id, parent))?;
    if json {
        return print_json(&moved);
    }
    let target = moved
        .parent
        .as_ref()
        .map_or("root level".to_string(), |p| format!("{} ({})", p.name, p.id));
    output::action("Moved", format!("{} -> {}", moved.name, target));
    Ok(())
}

#[instrument(skip(container, command))]
fn _token(container: &ServiceContainer, command: &TokenCommands) -> CliResult<()> {
    let store = &container.store;
    match command {
        TokenCommands::Set { token } => {
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::InvalidArgs("token must not be empty".to_string()));
            }
            store
                .set(ACCESS_TOKEN_KEY, token)
                .map_err(|e| InfraError::io("store token", e))?;
            container.notifier.success("Token", "saved");
        }
        TokenCommands::Show => {
            let token = store
                .get(ACCESS_TOKEN_KEY)
                .map_err(|e| InfraError::io("read token", e))?;
            match token {
                Some(t) => output::action("Token", &mask(&t)),
                None => output::warning("no token stored"),
            }
        }
        TokenCommands::Clear => {
            store
                .remove(ACCESS_TOKEN_KEY)
                .map_err(|e| InfraError::io("remove token", e))?;
            container.notifier.success("Token", "cleared");
        }
    }
    Ok(())
}

/// Show only the last four characters.
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    let cwd = std::env::current_dir().ok();
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cwd.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::detail(&"global: <no home directory>"),
            }
            if let Some(dir) = &cwd {
                output::detail(&format!("local:  {}", local_config_path(dir).display()));
            }
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&cwd.unwrap_or_else(|| PathBuf::from(".")))
            };
            init_config(&path)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn init_config(path: &std::path::Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
        }
    }
    std::fs::write(path, config_template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
