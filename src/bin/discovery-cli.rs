use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use discovery_client::catalog::{self, API_VERSION, DEFAULT_SERVICE_URL};
use discovery_client::{
    ClientConfig, DiscoveryClient, FileUpload, MultipartBody, OperationArgs, RequestBody,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "discovery-cli",
    version,
    about = "Small async CLI for calling the Discovery document-search API"
)]
struct Cli {
    /// Service root URL.
    #[arg(long, env = "DISCOVERY_URL", default_value = DEFAULT_SERVICE_URL)]
    base_url: String,

    /// Raw access token value sent as a bearer token.
    #[arg(long, env = "DISCOVERY_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// API version date sent as the `version` query parameter.
    #[arg(long = "api-version", env = "DISCOVERY_VERSION", default_value = API_VERSION)]
    api_version: String,

    /// Emit compact JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog operation ids.
    Operations {
        /// Filter operations by substring match on operation id (case-insensitive).
        #[arg(long)]
        filter: Option<String>,

        /// Print full descriptors as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Call an endpoint by operation id.
    Call(CallArgs),
}

#[derive(Debug, Args)]
struct CallArgs {
    /// Operation id (for example: listEnvironments).
    operation_id: String,

    /// Path parameter in form key=value. Repeat as needed.
    #[arg(long = "path-param", value_name = "KEY=VALUE")]
    path_param: Vec<String>,

    /// Query parameter in form key=value. Repeat as needed.
    #[arg(long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,

    /// Extra request header in form name=value. Repeat as needed.
    #[arg(long = "header", value_name = "NAME=VALUE")]
    header: Vec<String>,

    #[command(flatten)]
    body: BodyInput,
}

#[derive(Debug, Args)]
struct BodyInput {
    /// JSON request body literal.
    #[arg(long, conflicts_with = "body_file")]
    body_json: Option<String>,

    /// Path to a file containing a JSON request body.
    #[arg(long, value_name = "PATH", conflicts_with = "body_json")]
    body_file: Option<PathBuf>,

    /// Multipart file part in form part=path. Repeat as needed.
    #[arg(long = "file", value_name = "PART=PATH")]
    file: Vec<String>,

    /// Multipart text part in form name=text. Repeat as needed.
    #[arg(long = "part", value_name = "NAME=TEXT")]
    part: Vec<String>,
}

/// Entry point for the async CLI.
///
/// Logs go to stderr (filtered by `RUST_LOG`) so stdout only ever carries JSON.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Operations { filter, json } => {
            print_operations(filter.as_deref(), *json, cli.compact)
        }
        Command::Call(args) => {
            let client = build_client(&cli)?;
            let output = call_operation(&client, args)
                .await
                .with_context(|| format!("operation call failed: '{}'", args.operation_id))?;
            print_json(&output, cli.compact).context("failed to print JSON output")
        }
    }
}

fn build_client(cli: &Cli) -> Result<DiscoveryClient> {
    let mut config = ClientConfig::new(&cli.base_url)
        .with_context(|| format!("invalid base URL '{}'", cli.base_url))?
        .with_default_query("version", cli.api_version.clone());

    if let Some(token) = &cli.access_token {
        config = config.with_authorization_token(token.clone());
    }

    DiscoveryClient::new(config)
        .with_context(|| format!("failed to create client with base URL '{}'", cli.base_url))
}

/// Prints the operation catalog.
///
/// When `filter` is provided, only operation ids containing that substring are shown.
fn print_operations(filter: Option<&str>, json: bool, compact: bool) -> Result<()> {
    let filter = filter.map(str::to_ascii_lowercase);

    let operations: Vec<_> = catalog::operations()
        .iter()
        .filter(|operation| {
            filter
                .as_ref()
                .is_none_or(|needle| operation.operation_id.to_ascii_lowercase().contains(needle))
        })
        .collect();

    if json {
        let value = serde_json::to_value(&operations).context("failed to serialize catalog")?;
        return print_json(&value, compact);
    }

    let (operation_id_width, method_width) =
        operations
            .iter()
            .fold((0usize, 0usize), |(id_max, method_max), operation| {
                (
                    id_max.max(operation.operation_id.len()),
                    method_max.max(operation.method.as_str().len()),
                )
            });

    for operation in operations {
        println!(
            "{:<operation_id_width$}  {:<method_width$}  {}",
            operation.operation_id,
            operation.method.as_str(),
            operation.path_template
        );
    }
    Ok(())
}

async fn call_operation(client: &DiscoveryClient, args: &CallArgs) -> Result<Value> {
    let path_params = parse_pairs(&args.path_param, "--path-param")?;
    let query = parse_pairs(&args.query, "--query")?;
    let headers = parse_pairs(&args.header, "--header")?;
    let body = parse_body(&args.body).context("failed to parse request body input")?;

    let mut operation_args = OperationArgs::new().body(body);
    for (name, value) in path_params {
        operation_args = operation_args.path_param(name, value);
    }
    for (name, value) in query {
        operation_args = operation_args.query(name, value);
    }
    for (name, value) in headers {
        operation_args = operation_args.header(name, value);
    }

    let response = client
        .call_operation(&args.operation_id, operation_args)
        .await
        .with_context(|| format!("operation '{}' returned an error", args.operation_id))?;
    tracing::info!(status = %response.status, "call completed");
    Ok(response.into_result())
}

/// Parses repeated `key=value` arguments into owned key/value pairs.
///
/// Returns an error when a value does not include `=` or has an empty key.
fn parse_pairs(values: &[String], flag_name: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(values.len());
    for item in values {
        let Some((key, value)) = item.split_once('=') else {
            bail!("invalid {flag_name} value '{item}': expected key=value");
        };
        if key.is_empty() {
            bail!("invalid {flag_name} value '{item}': empty key");
        }
        pairs.push((key.to_owned(), value.to_owned()));
    }
    Ok(pairs)
}

/// Builds the request body from JSON input or multipart parts.
///
/// JSON and multipart inputs are mutually exclusive.
fn parse_body(body: &BodyInput) -> Result<RequestBody> {
    let multipart = !body.file.is_empty() || !body.part.is_empty();

    let json = match (&body.body_json, &body.body_file) {
        (Some(raw), None) => Some(
            serde_json::from_str::<Value>(raw).context("failed to parse JSON from --body-json")?,
        ),
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read --body-file '{}'", path.display()))?;
            Some(serde_json::from_str::<Value>(&raw).with_context(|| {
                format!("failed to parse JSON in --body-file '{}'", path.display())
            })?)
        }
        (None, None) => None,
        (Some(_), Some(_)) => bail!("use only one of --body-json or --body-file"),
    };

    match (json, multipart) {
        (Some(_), true) => bail!("a JSON body cannot be combined with --file or --part"),
        (Some(value), false) => Ok(RequestBody::Json(value)),
        (None, true) => multipart_body(body).map(RequestBody::Multipart),
        (None, false) => Ok(RequestBody::None),
    }
}

fn multipart_body(body: &BodyInput) -> Result<MultipartBody> {
    let mut form = MultipartBody::new();
    for (part, path) in parse_pairs(&body.file, "--file")? {
        let upload = open_upload(Path::new(&path))?;
        form = form
            .file(part.clone(), upload)
            .with_context(|| format!("failed to read file for part '{part}'"))?;
    }
    for (name, text) in parse_pairs(&body.part, "--part")? {
        form = form.text(name, text);
    }
    Ok(form)
}

fn open_upload(path: &Path) -> Result<FileUpload> {
    let file =
        File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let upload = FileUpload::new(file);
    Ok(match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => upload.with_filename(name),
        None => upload,
    })
}

/// Prints a JSON value either compact or pretty-formatted.
fn print_json(value: &Value, compact: bool) -> Result<()> {
    if compact {
        println!(
            "{}",
            serde_json::to_string(value).context("Failed to render JSON")?
        );
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("Failed to render JSON")?
        );
    }
    Ok(())
}
