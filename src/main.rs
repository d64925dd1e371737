use std::{fs, io::Write, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use dynamodb_item::{
    common::item::ItemFormat,
    config::{self, ConnectionArgs},
    params::{ModuleArgs, Request, State},
    reconcile,
};
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Reconcile one DynamoDB item against a desired state
#[derive(Debug, Parser)]
#[command(name = "dynamodb-item")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON file with the module arguments; when given, the other flags only fill in
    /// connection settings it leaves unset
    #[arg(value_name = "ARGS_FILE")]
    args_file: Option<PathBuf>,

    /// Desired state of the item
    #[arg(long, default_value_t = State::Present)]
    state: State,

    /// Name of the table
    #[arg(long, required_unless_present = "args_file")]
    table: Option<String>,

    /// Item to put, as JSON
    #[arg(long)]
    item: Option<String>,

    /// Key of the item to delete, as JSON
    #[arg(long)]
    key: Option<String>,

    /// Encoding of items and keys: `typed` or `plain`
    #[arg(long, default_value = "typed")]
    format: ItemFormat,

    /// Report what would change without changing anything
    #[arg(long)]
    check: bool,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom endpoint URL (for local DynamoDB)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// AWS profile to use for credentials
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// AWS access key ID
    #[arg(long)]
    access_key: Option<String>,

    /// AWS secret access key
    #[arg(long)]
    secret_key: Option<String>,

    /// AWS session token
    #[arg(long)]
    session_token: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn connection(&self) -> ConnectionArgs {
        ConnectionArgs {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            profile: self.profile.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            session_token: self.session_token.clone(),
        }
    }

    fn module_args(&self) -> anyhow::Result<ModuleArgs> {
        let Some(path) = &self.args_file else {
            return Ok(ModuleArgs {
                state: self.state,
                table: self.table.clone().unwrap_or_default(),
                item: self.item.clone().map(Value::String),
                key: self.key.clone().map(Value::String),
                format: self.format,
                check_mode: self.check,
                connection: self.connection(),
            });
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read module arguments from {}", path.display()))?;
        let mut args: ModuleArgs = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse module arguments in {}", path.display()))?;
        args.connection = args.connection.or(self.connection());
        Ok(args)
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "dynamodb_item=debug"
    } else {
        "dynamodb_item=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prepare(cli: &Cli) -> anyhow::Result<(ModuleArgs, Request)> {
    let args = cli.module_args()?;
    let request = Request::from_args(&args)?;
    Ok((args, request))
}

async fn run(cli: &Cli) -> anyhow::Result<Value> {
    let (args, request) = prepare(cli)?;
    let client = config::connect(&args.connection).await?;
    tracing::info!(
        table_name = %request.table_name,
        state = %request.state(),
        dry_run = request.dry_run,
        target = %args.connection.target_display(),
        "reconciling item"
    );
    let result = reconcile::reconcile(&client, &request).await?;
    Ok(result.render(request.format))
}

/// The record to print: the result, or `{"failed": true, "msg": ...}` as the error.
fn outcome(result: anyhow::Result<Value>) -> Result<Value, Value> {
    result.map_err(|error| {
        tracing::debug!(?error, "reconciliation failed");
        json!({"failed": true, "msg": format!("{error:#}")})
    })
}

fn emit(record: &Value) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    match writeln!(stdout, "{record}") {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "failed to write result");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match outcome(run(&cli).await) {
        Ok(record) => emit(&record),
        Err(record) => {
            emit(&record);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dynamodb_item::params::Desired;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dynamodb-item").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_success_record() {
        let record = json!({"changed": false, "old_item": {}});
        assert_eq!(outcome(Ok(record.clone())), Ok(record));
    }

    #[test]
    fn test_missing_item_fails() {
        let actual = outcome(prepare(&cli(&["--table", "test-table"])).map(|_| Value::Null));
        assert_eq!(
            actual,
            Err(json!({"failed": true, "msg": "To put an item, it must be specified"}))
        );
    }

    #[test]
    fn test_flags() {
        let (args, request) = prepare(&cli(&[
            "--table",
            "test-table",
            "--state",
            "absent",
            "--key",
            r#"{"key": {"S": "aaaaa"}}"#,
            "--check",
            "--region",
            "eu-west-1",
        ]))
        .unwrap();
        assert_eq!(args.connection.region.as_deref(), Some("eu-west-1"));
        assert_eq!(request.table_name, "test-table");
        assert!(request.dry_run);
        assert!(matches!(request.desired, Desired::Absent(ref key) if key.len() == 1));
    }

    #[test]
    fn test_args_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({
                "table": "test-table",
                "state": "absent",
                "key": {"key": {"S": "aaaaa"}},
                "region": "eu-west-1",
                "_ansible_check_mode": true,
            })
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let (args, request) =
            prepare(&cli(&[path, "--region", "us-east-2", "--profile", "dev"])).unwrap();

        assert_eq!(args.connection.region.as_deref(), Some("eu-west-1"));
        assert_eq!(args.connection.profile.as_deref(), Some("dev"));
        assert_eq!(args.state, State::Absent);
        assert!(request.dry_run);
        assert!(matches!(request.desired, Desired::Absent(_)));
    }

    #[test]
    fn test_unreadable_args_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let actual = outcome(prepare(&cli(&[path.to_str().unwrap()])).map(|_| Value::Null))
            .unwrap_err();
        assert_eq!(actual["failed"], json!(true));
        assert!(
            actual["msg"]
                .as_str()
                .unwrap()
                .starts_with("failed to read module arguments from ")
        );
    }
}
