//! CLI Tooling
//!
//! Command-line front end for agentbook. `CliContext` owns the in-memory
//! store for the lifetime of one invocation and calls the core the same way
//! any other front end would; every agent mutation is followed by a full
//! save, which auto-backs-up the previous file first.

use crate::agent::{
    AgentCommandService, AgentForm, AgentListResult, AgentRecord, AgentStore, ImportPolicy,
    SaveOutcome,
};
use crate::backup::{BackupManager, RetentionReport, SnapshotId};
use crate::config::{AppConfig, ConfigLoader};
use crate::error::ApiError;
use crate::knowledge::transcript::{render_entry, Speaker};
use crate::knowledge::{ChatSession, HttpKnowledgeClient, KnowledgeService};
use clap::{Args, Parser, Subcommand};
use parking_lot::RwLock;
use serde_json::json;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// agentbook - author and back up agent configurations
#[derive(Parser)]
#[command(name = "agentbook")]
#[command(about = "Maintain a JSON list of agent configurations with automatic backups")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage agents
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Manage backup snapshots
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
    /// Import agents from a JSON file
    Import {
        /// File holding a JSON array of agents
        path: PathBuf,
        /// replace or append (prompted when omitted)
        #[arg(long)]
        mode: Option<String>,
    },
    /// Export all agents to a JSON file
    Export {
        path: PathBuf,
    },
    /// Ask the knowledge service (interactive when no message is given)
    Chat {
        message: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List agents
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one agent
    Show {
        /// 1-based position in the list
        position: usize,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Append a new agent with placeholder values
    Create {
        #[command(flatten)]
        fields: AgentFieldArgs,
    },
    /// Edit an agent (prompts for every field when no field flag is given)
    Edit {
        /// 1-based position in the list
        position: usize,
        #[command(flatten)]
        fields: AgentFieldArgs,
    },
    /// Append a copy of an agent
    Duplicate {
        /// 1-based position in the list
        position: usize,
    },
    /// Remove an agent
    Remove {
        /// 1-based position in the list
        position: usize,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the current agents
    Create,
    /// List snapshots, newest first
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the content of a snapshot
    Show {
        id: String,
    },
    /// Replace all agents with a snapshot's content
    Restore {
        id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Delete a snapshot
    Remove {
        id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Delete the oldest snapshots beyond the cap
    Prune {
        /// Snapshots to keep (defaults to storage.max_backups)
        #[arg(long)]
        max: Option<usize>,
    },
}

/// Form field overrides. Numeric fields stay text so validation reports them.
#[derive(Args, Debug, Clone, Default)]
pub struct AgentFieldArgs {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub api_key_variable_name: Option<String>,
    #[arg(long)]
    pub api_url: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub system_prompt: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub max_tokens: Option<String>,
    #[arg(long)]
    pub welcome_message: Option<String>,
}

impl AgentFieldArgs {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.api_key_variable_name.is_none()
            && self.api_url.is_none()
            && self.model.is_none()
            && self.system_prompt.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.welcome_message.is_none()
    }

    /// Overlay the given flags on a prefilled form.
    pub fn apply_to(&self, form: &mut AgentForm) {
        let pairs = [
            (&self.id, &mut form.id),
            (&self.name, &mut form.name),
            (&self.api_key_variable_name, &mut form.api_key_variable_name),
            (&self.api_url, &mut form.api_url),
            (&self.model, &mut form.model),
            (&self.system_prompt, &mut form.system_prompt),
            (&self.temperature, &mut form.temperature),
            (&self.max_tokens, &mut form.max_tokens),
            (&self.welcome_message, &mut form.welcome_message),
        ];
        for (flag, slot) in pairs {
            if let Some(value) = flag {
                *slot = value.clone();
            }
        }
    }
}

/// CLI context for one invocation
pub struct CliContext {
    workspace_root: PathBuf,
    config: AppConfig,
    agents_path: PathBuf,
    store: RwLock<AgentStore>,
    backups: BackupManager,
    knowledge: Arc<dyn KnowledgeService>,
    color: bool,
}

impl CliContext {
    /// Create a new CLI context from the layered configuration.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create a context from an already loaded configuration.
    ///
    /// Opens the backup directory, prunes it to `storage.max_backups` and
    /// loads the primary file. A primary file that cannot be parsed is
    /// reported and the session starts empty; the file itself is left in
    /// place and will be auto-backed-up before the first save.
    pub fn with_config(workspace_root: PathBuf, config: AppConfig) -> Result<Self, ApiError> {
        let paths = config.storage.resolve_paths(&workspace_root)?;
        let backups = BackupManager::open(&paths.backup_dir)?;

        let report = backups.enforce_retention(config.storage.max_backups);
        if !report.deleted.is_empty() {
            tracing::info!("Pruned {} old snapshot(s) at startup", report.deleted.len());
        }

        let store = match AgentCommandService::load(&paths.agents_file) {
            Ok(store) => store,
            Err(e @ ApiError::ParseError { .. }) => {
                tracing::warn!("{}; starting with no agents", e);
                AgentStore::new()
            }
            Err(e) => return Err(e),
        };

        let knowledge: Arc<dyn KnowledgeService> =
            Arc::new(HttpKnowledgeClient::new(config.knowledge.clone())?);

        Ok(Self {
            workspace_root,
            config,
            agents_path: paths.agents_file,
            store: RwLock::new(store),
            backups,
            knowledge,
            color: std::io::stdout().is_terminal(),
        })
    }

    /// Replace the knowledge service used by `chat`.
    pub fn with_knowledge_service(mut self, service: Arc<dyn KnowledgeService>) -> Self {
        self.knowledge = service;
        self
    }

    /// Force colored chat output on or off.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Snapshot of the current in-memory store.
    pub fn store(&self) -> AgentStore {
        self.store.read().clone()
    }

    pub fn agents_path(&self) -> &Path {
        &self.agents_path
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Agent { command } => self.handle_agent_command(command),
            Commands::Backup { command } => self.handle_backup_command(command),
            Commands::Import { path, mode } => self.handle_import(path, mode.as_deref()),
            Commands::Export { path } => self.handle_export(path),
            Commands::Chat { message } => self.handle_chat(message.as_deref()),
        }
    }

    /// Apply `mutation` to a copy of the store, save it, then commit.
    ///
    /// A failed mutation or a failed save leaves both the store and the
    /// primary file as they were.
    fn mutate_and_save<T>(
        &self,
        mutation: impl FnOnce(&mut AgentStore) -> Result<T, ApiError>,
    ) -> Result<(T, SaveOutcome), ApiError> {
        let mut store = self.store.write();
        let mut draft = store.clone();
        let value = mutation(&mut draft)?;
        let outcome = AgentCommandService::save(&draft, &self.agents_path, &self.backups)?;
        *store = draft;
        Ok((value, outcome))
    }

    fn resolve_user_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    /// Handle agent management commands
    fn handle_agent_command(&self, command: &AgentCommands) -> Result<String, ApiError> {
        match command {
            AgentCommands::List { format } => {
                let result = AgentCommandService::list(&self.store.read());
                match format.as_str() {
                    "json" => format_json(&result),
                    _ => Ok(format_agent_list_text(&result)),
                }
            }
            AgentCommands::Show { position, format } => {
                let index = position_to_index(*position)?;
                let store = self.store.read();
                let record = store.get_or_error(index)?;
                match format.as_str() {
                    "json" => format_json(record),
                    _ => Ok(format_agent_show_text(*position, record)),
                }
            }
            AgentCommands::Create { fields } => self.handle_agent_create(fields),
            AgentCommands::Edit { position, fields } => self.handle_agent_edit(*position, fields),
            AgentCommands::Duplicate { position } => {
                let index = position_to_index(*position)?;
                let (new_index, outcome) =
                    self.mutate_and_save(|store| store.duplicate(index))?;
                let store = self.store.read();
                let copy = store.get_or_error(new_index)?;
                Ok(format!(
                    "Agent duplicated: {}. {} (id {})\n{}",
                    new_index + 1,
                    copy.display_name(),
                    copy.id,
                    describe_save(&outcome)
                ))
            }
            AgentCommands::Remove { position, force } => {
                let index = position_to_index(*position)?;
                let name = self.store.read().get_or_error(index)?.display_name().to_string();
                if !force && !confirm(&format!("Remove agent {}. {}?", position, name))? {
                    return Ok("Removal cancelled".to_string());
                }
                let (removed, outcome) = self.mutate_and_save(|store| store.delete(index))?;
                Ok(format!(
                    "Removed agent: {}\n{}",
                    removed.display_name(),
                    describe_save(&outcome)
                ))
            }
        }
    }

    fn handle_agent_create(&self, fields: &AgentFieldArgs) -> Result<String, ApiError> {
        let (record, outcome) = self.mutate_and_save(|store| {
            let index = store.create();
            if !fields.is_empty() {
                let mut form = AgentForm::from(store.get_or_error(index)?);
                fields.apply_to(&mut form);
                AgentCommandService::apply_form(store, index, &form)?;
            }
            Ok(store.get_or_error(index)?.clone())
        })?;
        Ok(format!(
            "Agent created: {}. {} (id {})\n{}",
            outcome.count,
            record.display_name(),
            record.id,
            describe_save(&outcome)
        ))
    }

    fn handle_agent_edit(&self, position: usize, fields: &AgentFieldArgs) -> Result<String, ApiError> {
        let index = position_to_index(position)?;
        let mut form = AgentForm::from(self.store.read().get_or_error(index)?);
        if fields.is_empty() {
            prompt_form(&mut form)?;
        } else {
            fields.apply_to(&mut form);
        }
        let (record, outcome) = self.mutate_and_save(|store| {
            let record = AgentCommandService::apply_form(store, index, &form)?;
            store.select(index)?;
            Ok(record)
        })?;
        Ok(format!(
            "Agent updated: {}. {}\n{}",
            position,
            record.display_name(),
            describe_save(&outcome)
        ))
    }

    /// Handle backup commands
    fn handle_backup_command(&self, command: &BackupCommands) -> Result<String, ApiError> {
        match command {
            BackupCommands::Create => {
                let id = AgentCommandService::create_backup(&self.store.read(), &self.backups)?;
                Ok(format!("Backup created: {}", id))
            }
            BackupCommands::List { format } => {
                let ids = self.backups.list()?;
                match format.as_str() {
                    "json" => format_snapshot_list_json(&ids),
                    _ => Ok(format_snapshot_list_text(&ids)),
                }
            }
            BackupCommands::Show { id } => {
                let id = SnapshotId::parse(id)?;
                let content = self.backups.read(&id)?;
                format_json(&content)
            }
            BackupCommands::Restore { id, force } => {
                let id = SnapshotId::parse(id)?;
                if !force
                    && !confirm(&format!(
                        "Replace all agents with the content of {}?",
                        id
                    ))?
                {
                    return Ok("Restore cancelled".to_string());
                }
                let (result, outcome) = self.mutate_and_save(|store| {
                    AgentCommandService::restore(store, &self.backups, &id)
                })?;
                Ok(format!(
                    "Restored {} agent(s) from {}\n{}",
                    result.count,
                    result.snapshot,
                    describe_save(&outcome)
                ))
            }
            BackupCommands::Remove { id, force } => {
                let id = SnapshotId::parse(id)?;
                if !force && !confirm(&format!("Delete snapshot {}?", id))? {
                    return Ok("Deletion cancelled".to_string());
                }
                self.backups.delete(&id)?;
                Ok(format!("Deleted snapshot: {}", id))
            }
            BackupCommands::Prune { max } => {
                let max = max.unwrap_or(self.config.storage.max_backups);
                let report = self.backups.enforce_retention(max);
                Ok(format_retention_report(&report))
            }
        }
    }

    fn handle_import(&self, path: &Path, mode: Option<&str>) -> Result<String, ApiError> {
        let path = self.resolve_user_path(path);
        let records = AgentCommandService::read_import(&path)?;
        let policy = match mode {
            Some(mode) => parse_import_mode(mode)?,
            None => select_import_policy(records.len())?,
        };
        let (result, outcome) =
            self.mutate_and_save(|store| Ok(AgentCommandService::import(store, records, policy)))?;
        let verb = match result.policy {
            ImportPolicy::Replace => "replaced the list with",
            ImportPolicy::Append => "appended",
        };
        Ok(format!(
            "Imported from {}: {} {} agent(s); {} total\n{}",
            path.display(),
            verb,
            result.imported,
            result.total,
            describe_save(&outcome)
        ))
    }

    fn handle_export(&self, path: &Path) -> Result<String, ApiError> {
        let path = self.resolve_user_path(path);
        let count = AgentCommandService::export(&self.store.read(), &path)?;
        Ok(format!("Exported {} agent(s) to {}", count, path.display()))
    }

    fn handle_chat(&self, message: Option<&str>) -> Result<String, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))?;
        let color = self.color;
        let mut session = ChatSession::new(Arc::clone(&self.knowledge));

        if let Some(message) = message {
            return match runtime.block_on(session.send(message)) {
                Some(_) => Ok(session.transcript().render(color)),
                None => Ok("Nothing to send.".to_string()),
            };
        }

        loop {
            let line: String = dialoguer::Input::new()
                .with_prompt(Speaker::User.label())
                .allow_empty(true)
                .interact_text()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            match runtime.block_on(session.send(&line)) {
                Some(reply) => println!("{}\n", render_entry(Speaker::Assistant, &reply, color)),
                None => break,
            }
        }
        let exchanged = session.transcript().entries().len() / 2;
        Ok(format!("Chat ended after {} message(s).", exchanged))
    }
}

/// Convert a 1-based command-line position to a store index.
fn position_to_index(position: usize) -> Result<usize, ApiError> {
    position
        .checked_sub(1)
        .ok_or(ApiError::InvalidPosition(position))
}

fn parse_import_mode(mode: &str) -> Result<ImportPolicy, ApiError> {
    match mode {
        "replace" => Ok(ImportPolicy::Replace),
        "append" => Ok(ImportPolicy::Append),
        other => Err(ApiError::ConfigError(format!(
            "Invalid import mode: {} (must be 'replace' or 'append')",
            other
        ))),
    }
}

fn confirm(prompt: &str) -> Result<bool, ApiError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

fn select_import_policy(count: usize) -> Result<ImportPolicy, ApiError> {
    let selection = dialoguer::Select::new()
        .with_prompt(format!("Import {} agent(s)", count))
        .items(&["Replace current agents", "Append to current agents"])
        .default(0)
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
    Ok(if selection == 0 {
        ImportPolicy::Replace
    } else {
        ImportPolicy::Append
    })
}

/// Prompt for every form field, prefilled with the current values.
fn prompt_form(form: &mut AgentForm) -> Result<(), ApiError> {
    let fields = [
        ("ID", &mut form.id),
        ("Name", &mut form.name),
        ("API key variable", &mut form.api_key_variable_name),
        ("API URL", &mut form.api_url),
        ("Model", &mut form.model),
        ("System prompt", &mut form.system_prompt),
        ("Temperature", &mut form.temperature),
        ("Max tokens", &mut form.max_tokens),
        ("Welcome message", &mut form.welcome_message),
    ];
    for (label, slot) in fields {
        let value: String = dialoguer::Input::new()
            .with_prompt(label)
            .with_initial_text(slot.as_str())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
        *slot = value;
    }
    Ok(())
}

fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::SerializeError(e.to_string()))
}

fn describe_save(outcome: &SaveOutcome) -> String {
    match &outcome.auto_backup {
        Some(id) => format!(
            "Saved {} agent(s) to {} (previous version in {})",
            outcome.count,
            outcome.path.display(),
            id
        ),
        None => format!(
            "Saved {} agent(s) to {}",
            outcome.count,
            outcome.path.display()
        ),
    }
}

/// Format agent list result as text
fn format_agent_list_text(result: &AgentListResult) -> String {
    if result.agents.is_empty() {
        return "No agents found.\n\nUse 'agentbook agent create' or 'agentbook import <file>'."
            .to_string();
    }
    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["#", "ID", "Name", "Model", ""]);
    for item in &result.agents {
        let marker = if item.selected { "*" } else { "" };
        table.add_row(vec![
            item.position.to_string(),
            item.id.clone(),
            item.name.clone(),
            item.model.clone(),
            marker.to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} agent(s)", table, result.total)
}

fn format_agent_show_text(position: usize, record: &AgentRecord) -> String {
    let mut output = format!("Agent {}: {}\n", position, record.display_name());
    output.push_str(&format!("ID: {}\n", record.id));
    output.push_str(&format!("API key variable: {}\n", record.api_key_variable_name));
    output.push_str(&format!("API URL: {}\n", record.api_url));
    output.push_str(&format!("Model: {}\n", record.model));
    output.push_str(&format!("Temperature: {}\n", record.temperature));
    output.push_str(&format!("Max tokens: {}\n", record.max_tokens));
    output.push_str(&format!("Welcome message: {}\n", record.welcome_message));
    if !record.extra.is_empty() {
        let keys: Vec<&str> = record.extra.keys().map(String::as_str).collect();
        output.push_str(&format!("Other keys: {}\n", keys.join(", ")));
    }
    output.push_str("\nSystem prompt:\n");
    output.push_str(&record.system_prompt);
    output
}

fn format_snapshot_list_text(ids: &[SnapshotId]) -> String {
    if ids.is_empty() {
        return "No backups found.".to_string();
    }
    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Snapshot", "Kind", "Taken At"]);
    for id in ids {
        let kind = id.kind().map(|k| k.to_string()).unwrap_or_else(|| "-".to_string());
        let taken_at = id
            .timestamp()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![id.to_string(), kind, taken_at]);
    }
    format!("{}\n\nTotal: {} snapshot(s)", table, ids.len())
}

fn format_snapshot_list_json(ids: &[SnapshotId]) -> Result<String, ApiError> {
    let snapshots: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "kind": id.kind(),
                "taken_at": id.timestamp().map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            })
        })
        .collect();
    format_json(&json!({ "snapshots": snapshots, "total": ids.len() }))
}

fn format_retention_report(report: &RetentionReport) -> String {
    let mut output = format!(
        "Kept {} snapshot(s), deleted {}",
        report.kept,
        report.deleted.len()
    );
    for id in &report.deleted {
        output.push_str(&format!("\n  - {}", id));
    }
    for (id, reason) in &report.failed {
        output.push_str(&format!("\nFailed to delete {}: {}", id, reason));
    }
    output
}
