//! Interactive composer REPL.
//!
//! Plain lines are sent through the agent pipeline; lines starting with `/`
//! are commands that operate on the mock tools and SDK directly.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::display::{print_message, print_report};
use crate::activity_layer::ActivityEvent;
use composer_application::ComposerUseCase;
use composer_core::config::ComposerConfig;
use composer_infrastructure::{
    Credentials, DeploymentRequest, EndpointConfig, EntryKind, HttpMethod, Permission, ValidationKind,
};
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ACTIVITY_CAPACITY: usize = 200;
const ACTIVITY_SHOWN: usize = 20;

const COMMANDS: &[(&str, &str)] = &[
    ("/spec", "show the current specification"),
    ("/history", "show the whole conversation"),
    ("/files", "[path] list generated files"),
    ("/cat", "<path> print a generated file"),
    ("/ask", "<prompt> ask the SDK directly (streamed)"),
    ("/analyze", "<path> analyze a generated file"),
    ("/validate", "<kind> <path> validate a generated file"),
    ("/deploy", "<project> run a simulated deployment"),
    ("/db", "[collection [json]] list collections, list records or insert one"),
    ("/api", "[add <method> <path> | test <id> | remove <id>] manage mock endpoints"),
    ("/login", "<user> <password> start a session"),
    ("/logout", "end the session"),
    ("/activity", "show recent tool activity"),
    ("/reset", "clear conversation and specification"),
    ("/help", "show this help"),
];

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Submit(String),
    Spec,
    History,
    Files(Option<String>),
    Cat(String),
    Ask(String),
    Analyze(String),
    Validate { kind: ValidationKind, path: String },
    Deploy(String),
    Db(DbAction),
    Api(ApiAction),
    Login { username: String, password: String },
    Logout,
    Activity,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DbAction {
    Collections,
    List(String),
    Create { collection: String, record: Value },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAction {
    List,
    Add { method: HttpMethod, path: String },
    Test(String),
    Remove(String),
}

impl ReplCommand {
    /// Parses a trimmed, non-empty line. Errors are usage messages.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        if line == "quit" || line == "exit" {
            return Ok(Self::Quit);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Submit(line.to_string()));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        let required = |usage: &str| {
            if args.is_empty() {
                Err(format!("Usage: /{} {}", name, usage))
            } else {
                Ok(args.to_string())
            }
        };

        match name {
            "spec" => Ok(Self::Spec),
            "history" => Ok(Self::History),
            "files" => Ok(Self::Files((!args.is_empty()).then(|| args.to_string()))),
            "cat" => required("<path>").map(Self::Cat),
            "ask" => required("<prompt>").map(Self::Ask),
            "analyze" => required("<path>").map(Self::Analyze),
            "validate" => {
                let usage = "Usage: /validate <code|schema|security|performance|accessibility> <path>";
                let (kind, path) = args.split_once(char::is_whitespace).ok_or(usage)?;
                let kind = kind
                    .parse::<ValidationKind>()
                    .map_err(|_| format!("Unknown validation kind: {}", kind))?;
                Ok(Self::Validate {
                    kind,
                    path: path.trim().to_string(),
                })
            }
            "deploy" => required("<project>").map(Self::Deploy),
            "db" => match args.split_once(char::is_whitespace) {
                None if args.is_empty() => Ok(Self::Db(DbAction::Collections)),
                None => Ok(Self::Db(DbAction::List(args.to_string()))),
                Some((collection, json)) => {
                    let record = serde_json::from_str(json.trim())
                        .map_err(|e| format!("Invalid JSON record: {}", e))?;
                    Ok(Self::Db(DbAction::Create {
                        collection: collection.to_string(),
                        record,
                    }))
                }
            },
            "api" => {
                let usage = "Usage: /api [add <method> <path> | test <id> | remove <id>]";
                match args.split_whitespace().collect::<Vec<_>>().as_slice() {
                    [] => Ok(Self::Api(ApiAction::List)),
                    ["add", method, path] => {
                        let method = method
                            .parse::<HttpMethod>()
                            .map_err(|_| format!("Unknown HTTP method: {}", method))?;
                        Ok(Self::Api(ApiAction::Add {
                            method,
                            path: path.to_string(),
                        }))
                    }
                    ["test", id] => Ok(Self::Api(ApiAction::Test(id.to_string()))),
                    ["remove", id] => Ok(Self::Api(ApiAction::Remove(id.to_string()))),
                    _ => Err(usage.to_string()),
                }
            }
            "login" => match args.split_whitespace().collect::<Vec<_>>().as_slice() {
                [username, password] => Ok(Self::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                }),
                _ => Err("Usage: /login <user> <password>".to_string()),
            },
            "logout" => Ok(Self::Logout),
            "activity" => Ok(Self::Activity),
            "reset" => Ok(Self::Reset),
            "help" => Ok(Self::Help),
            other => Err(format!("Unknown command: /{} (try /help)", other)),
        }
    }

    /// Time limit for executing the command. `None` for deployments, which
    /// always run to a terminal status.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Deploy(_) => None,
            _ => Some(REQUEST_TIMEOUT),
        }
    }
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| name.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

struct Repl {
    composer: ComposerUseCase,
    activity_rx: mpsc::UnboundedReceiver<ActivityEvent>,
    activity: VecDeque<ActivityEvent>,
}

impl Repl {
    fn new(config: &ComposerConfig, activity_rx: mpsc::UnboundedReceiver<ActivityEvent>) -> Self {
        Self {
            composer: ComposerUseCase::new(config),
            activity_rx,
            activity: VecDeque::with_capacity(ACTIVITY_CAPACITY),
        }
    }

    async fn execute(&mut self, command: ReplCommand) -> Result<()> {
        match command {
            ReplCommand::Submit(input) => {
                for message in self.composer.submit(&input).await.iter().skip(1) {
                    print_message(message);
                }
            }
            ReplCommand::Spec => match self.composer.specification().await {
                Some(spec) => println!("{}", serde_json::to_string_pretty(&spec)?),
                None => println!("{}", "No specification yet. Describe an app first.".bright_black()),
            },
            ReplCommand::History => {
                for message in self.composer.history().await {
                    print_message(&message);
                }
            }
            ReplCommand::Files(path) => self.list_files(path.as_deref().unwrap_or("")).await,
            ReplCommand::Cat(path) => {
                let result = self.composer.tools().filesystem.read_file(&path).await;
                match result.into_result() {
                    Ok(content) => println!("{}", content),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            ReplCommand::Ask(prompt) => {
                let on_chunk = |chunk: &str| {
                    print!("{}", chunk.bright_blue());
                    let _ = std::io::stdout().flush();
                };
                let response = self.composer.ask(&prompt, Some(&on_chunk)).await?;
                println!();
                println!(
                    "{}",
                    format!(
                        "{} | {} tokens",
                        response.model, response.usage.total_tokens
                    )
                    .bright_black()
                );
            }
            ReplCommand::Analyze(path) => {
                let analysis = self.composer.analyze_file(&path).await?;
                let metrics = &analysis.metrics;
                println!(
                    "{} {}",
                    "component:".bright_black(),
                    metrics.component_name.as_deref().unwrap_or("-")
                );
                println!("{} {}", "lines:".bright_black(), metrics.lines);
                println!(
                    "{} {} ({})",
                    "complexity:".bright_black(),
                    metrics.complexity,
                    metrics.level
                );
                println!("{} {}", "hooks:".bright_black(), metrics.hooks.join(", "));
                println!("{}", analysis.insights.bright_blue());
            }
            ReplCommand::Validate { kind, path } => {
                print_report(&self.composer.validate_file(kind, &path).await?);
            }
            ReplCommand::Deploy(project) => self.deploy(project).await,
            ReplCommand::Db(action) => self.database(action).await?,
            ReplCommand::Api(action) => self.api(action).await?,
            ReplCommand::Login { username, password } => {
                let result = self
                    .composer
                    .tools()
                    .auth
                    .authenticate(&Credentials::new(username, password))
                    .await;
                match (result.data, result.error) {
                    (Some(session), _) => println!(
                        "{}",
                        format!(
                            "{} as {} ({})",
                            result.message.as_deref().unwrap_or("Logged in"),
                            session.user.username,
                            session.user.role
                        )
                        .bright_green()
                    ),
                    (None, error) => println!("{}", error.unwrap_or_default().red()),
                }
            }
            ReplCommand::Logout => {
                let result = self.composer.tools().auth.logout().await;
                match result.error {
                    None => println!("{}", result.message.unwrap_or_default().bright_green()),
                    Some(error) => println!("{}", error.red()),
                }
            }
            ReplCommand::Activity => self.show_activity(),
            ReplCommand::Reset => {
                self.composer.reset().await;
                println!("{}", "Conversation cleared.".bright_green());
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => {}
        }
        Ok(())
    }

    async fn list_files(&self, path: &str) {
        let result = self.composer.tools().filesystem.list(path, true).await;
        match result.into_result() {
            Ok(entries) if entries.is_empty() => {
                println!("{}", "No files yet.".bright_black())
            }
            Ok(entries) => {
                for entry in entries {
                    match (entry.kind, entry.size) {
                        (EntryKind::Directory, _) => println!("{}/", entry.path.bright_cyan()),
                        (EntryKind::File, size) => println!(
                            "{} {}",
                            entry.path,
                            format!("({} bytes)", size.unwrap_or(0)).bright_black()
                        ),
                    }
                }
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    async fn deploy(&self, project: String) {
        let auth = &self.composer.tools().auth;
        if !auth.has_permission(Permission::Write).await.data.unwrap_or(false) {
            println!("{}", "Login with write permission required (/login).".yellow());
            return;
        }

        println!("{}", format!("Deploying {}...", project).bright_black());
        let result = self
            .composer
            .tools()
            .deployment
            .deploy(DeploymentRequest::new(project))
            .await;
        match result.into_result() {
            Ok(deployment) => {
                for line in &deployment.logs {
                    println!("  {}", line.bright_black());
                }
                println!(
                    "{}",
                    format!(
                        "{} {}",
                        deployment.status,
                        deployment.url.unwrap_or_default()
                    )
                    .bright_green()
                );
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    async fn database(&self, action: DbAction) -> Result<()> {
        let database = &self.composer.tools().database;
        match action {
            DbAction::Collections => {
                for info in database.collections().await {
                    println!(
                        "{} {}",
                        info.name.bright_cyan(),
                        format!("({} records)", info.records).bright_black()
                    );
                }
            }
            DbAction::List(collection) => match database.list(&collection).await.into_result() {
                Ok(records) if records.is_empty() => {
                    println!("{}", format!("No records in {}.", collection).bright_black())
                }
                Ok(records) => {
                    for record in records {
                        println!("{}", serde_json::to_string(&record)?);
                    }
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            DbAction::Create { collection, record } => {
                match database.create(&collection, record).await.into_result() {
                    Ok(created) => println!(
                        "{} {}",
                        "Created".bright_green(),
                        serde_json::to_string(&created)?
                    ),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
        }
        Ok(())
    }

    async fn api(&self, action: ApiAction) -> Result<()> {
        let api = &self.composer.tools().api_test;
        match action {
            ApiAction::List => match api.list_endpoints().await.into_result() {
                Ok(endpoints) if endpoints.is_empty() => {
                    println!("{}", "No endpoints registered.".bright_black())
                }
                Ok(endpoints) => {
                    for endpoint in endpoints {
                        println!(
                            "{} {} {} {}",
                            endpoint.id.bright_cyan(),
                            endpoint.config.method,
                            endpoint.config.path,
                            format!("-> {}", endpoint.config.expected_status).bright_black()
                        );
                    }
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            ApiAction::Add { method, path } => {
                match api.add_endpoint(EndpointConfig::new(method, path)).await.into_result() {
                    Ok(endpoint) => println!(
                        "{}",
                        format!("Registered {}", endpoint.id).bright_green()
                    ),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            ApiAction::Test(id) => match api.test_endpoint(&id).await.into_result() {
                Ok(result) => {
                    let verdict = if result.passed {
                        "passed".bright_green()
                    } else {
                        "failed".red()
                    };
                    println!(
                        "{} {} {} {} {}",
                        result.method,
                        result.path,
                        result.status,
                        verdict,
                        format!("({} ms)", result.latency_ms).bright_black()
                    );
                    println!("{}", serde_json::to_string_pretty(&result.body)?);
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            ApiAction::Remove(id) => match api.remove_endpoint(&id).await.into_result() {
                Ok(()) => println!("{}", format!("Removed {}", id).bright_green()),
                Err(e) => println!("{}", e.to_string().red()),
            },
        }
        Ok(())
    }

    /// Moves pending events from the channel into the bounded buffer.
    fn collect_activity(&mut self) {
        while let Ok(event) = self.activity_rx.try_recv() {
            if self.activity.len() == ACTIVITY_CAPACITY {
                self.activity.pop_front();
            }
            self.activity.push_back(event);
        }
    }

    fn show_activity(&mut self) {
        self.collect_activity();
        if self.activity.is_empty() {
            println!("{}", "No activity yet.".bright_black());
            return;
        }

        let skip = self.activity.len().saturating_sub(ACTIVITY_SHOWN);
        for event in self.activity.iter().skip(skip) {
            let fields: Vec<String> = event
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            println!(
                "{} {:5} {} {} {}",
                event.timestamp.format("%H:%M:%S").to_string().bright_black(),
                event.level,
                event.target.bright_cyan(),
                event.message,
                fields.join(" ").bright_black()
            );
        }
    }
}

fn print_help() {
    println!("{}", "Describe an app in plain words to run the agent pipeline.".bright_black());
    for (name, description) in COMMANDS {
        println!("  {:<10} {}", name.bright_cyan(), description);
    }
    println!("  {:<10} {}", "quit".bright_cyan(), "exit the REPL");
}

/// Runs the REPL until `quit`, `exit` or EOF.
pub async fn run(
    config: ComposerConfig,
    activity_rx: mpsc::UnboundedReceiver<ActivityEvent>,
) -> Result<()> {
    let mut repl = Repl::new(&config, activity_rx);

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Composer REPL ===".bright_magenta().bold());
    println!(
        "{}",
        "Describe the app you want, type '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match ReplCommand::parse(trimmed) {
                    Ok(ReplCommand::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => command,
                    Err(usage) => {
                        println!("{}", usage.yellow());
                        continue;
                    }
                };

                let outcome = match command.timeout() {
                    Some(limit) => timeout(limit, repl.execute(command)).await,
                    None => Ok(repl.execute(command).await),
                };
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => eprintln!("{}", format!("Error: {:#}", e).red()),
                    Err(_) => eprintln!("{}", "Error: Request timed out.".red()),
                }
                repl.collect_activity();
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
