//! sqlreq — The sqlreq CLI
//!
//! Compile SQL-like queries into HTTP requests and run them.
//!
//! # Usage
//!
//! ```bash
//! # Run a query
//! sqlreq "from https://httpbin.org/get"
//!
//! # Dry run (show the compiled request only)
//! sqlreq "from https://httpbin.org/post where name = %s with post" --arg bob --dry-run
//!
//! # Show tokens, parsed fields and the request as JSON
//! sqlreq explain "from %s where payload = ? with put" -a http://localhost -p '{"id": 1}' -f json
//!
//! # Pick response headers
//! sqlreq --headers-mode "content-type, server from https://httpbin.org/get"
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use reqwest::StatusCode;
use sqlreq::parser::Parser as QueryParser;
use sqlreq::parser::graph::Graph;
use sqlreq::parser::tokens::{KEYWORDS, TokenKind, tokenize};
use sqlreq::prelude::*;

#[derive(Parser)]
#[command(name = "sqlreq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SQL-like queries for HTTP", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlreq 'from https://httpbin.org/get where header accept = application/json'
    sqlreq 'from https://httpbin.org/post where payload = ? with post' -p '{\"id\": 1}'
    sqlreq 'from %s with timeout 5' --arg https://httpbin.org/delay/1 --dry-run
    sqlreq --headers-mode 'content-type, date from https://httpbin.org/get'")]
struct Cli {
    /// The query to run
    query: Option<String>,

    /// String arguments for %s placeholders, in order
    #[arg(short, long)]
    arg: Vec<String>,

    /// JSON payload for `payload = ?`
    #[arg(short, long)]
    payload: Option<String>,

    /// Query starts with a list of response headers to extract
    #[arg(long)]
    headers_mode: bool,

    /// Don't send, just show the compiled request
    #[arg(short, long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// What to print from the response
    #[arg(short, long, value_enum, default_value = "response")]
    output: OutputKind,

    /// Config file path
    #[arg(long, env = "SQLREQ_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputKind {
    /// Status, headers and body
    Response,
    /// Status and headers
    Headers,
    /// Body only
    Body,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize and compile a query without sending it
    Explain {
        /// The query to explain
        query: String,

        /// String arguments for %s placeholders, in order
        #[arg(short, long)]
        arg: Vec<String>,

        /// JSON payload for `payload = ?`
        #[arg(short, long)]
        payload: Option<String>,

        /// Query starts with a list of response headers to extract
        #[arg(long)]
        headers_mode: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Print the grammar graph as Graphviz DOT
    Graph {
        /// Graph for header-selection mode
        #[arg(long)]
        headers_mode: bool,
    },
    /// Show the keyword reference
    Keywords,
}

fn mode(headers_mode: bool) -> Mode {
    if headers_mode {
        Mode::HeaderSelection
    } else {
        Mode::Body
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Explain {
            query,
            arg,
            payload,
            headers_mode,
            format,
        }) => {
            let result = collect_args(arg, payload.as_deref())
                .and_then(|args| explain_query(query, mode(*headers_mode), &args, *format));
            if let Err(e) = result {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        }
        Some(Commands::Graph { headers_mode }) => {
            print!("{}", Graph::for_mode(mode(*headers_mode)).to_dot())
        }
        Some(Commands::Keywords) => show_keywords(),
        None => {
            if let Some(query) = &cli.query {
                if let Err(e) = run_query(query, &cli).await {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(1);
                }
            } else {
                println!("{}", "sqlreq — SQL-like queries for HTTP".cyan().bold());
                println!();
                println!("Usage: sqlreq <QUERY> [OPTIONS]");
                println!();
                println!("Try: sqlreq --help");
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn collect_args(strings: &[String], payload: Option<&str>) -> Result<Vec<Arg>> {
    let mut args: Vec<Arg> = strings.iter().map(|s| Arg::from(s.as_str())).collect();
    if let Some(payload) = payload {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        args.push(Arg::from(value));
    }
    Ok(args)
}

async fn run_query(query: &str, cli: &Cli) -> Result<()> {
    if cli.verbose {
        println!("{} {}", "Input:".dimmed(), query.yellow());
    }

    let mode = mode(cli.headers_mode);
    let args = collect_args(&cli.arg, cli.payload.as_deref())?;

    if cli.dry_run {
        let desc = sqlreq::compile(mode, query, &args)?;
        print_descriptor(&desc, cli.format)?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let client = Client::with_config(&config)?;

    if mode == Mode::HeaderSelection {
        let (headers, status) = client.select_header(query, &args).await?;
        print_status(status);
        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&headers)?),
            OutputFormat::Table => {
                for (name, value) in &headers {
                    println!("{}: {}", name.cyan(), value);
                }
            }
        }
        return Ok(());
    }

    match cli.output {
        OutputKind::Response => {
            let response = client.select_response(query, &args).await?;
            print_status(response.status());
            for (name, value) in response.headers() {
                println!("{}: {}", name.as_str().cyan(), value.to_str().unwrap_or("<binary>"));
            }
            println!();
            println!("{}", response.text().await?);
        }
        OutputKind::Headers => {
            let (headers, status) = client.select_headers(query, &args).await?;
            print_status(status);
            for (name, value) in &headers {
                println!("{}: {}", name.as_str().cyan(), value.to_str().unwrap_or("<binary>"));
            }
        }
        OutputKind::Body => {
            let (body, _) = client.select_body(query, &args).await?;
            let mut stdout = std::io::stdout();
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn print_status(status: StatusCode) {
    let text = status.to_string();
    let text = if status.is_success() {
        text.green()
    } else if status.is_client_error() || status.is_server_error() {
        text.red()
    } else {
        text.yellow()
    };
    println!("{} {}", "Status:".dimmed(), text.bold());
}

fn print_descriptor(desc: &RequestDescriptor, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(desc)?),
        OutputFormat::Table => {
            println!("{}", "Compiled Request:".green().bold());
            println!("  {} {}", "Method:".dimmed(), desc.method.to_string().cyan());
            println!("  {} {}", "URL:".dimmed(), desc.url.white());
            println!("  {} {}s", "Timeout:".dimmed(), desc.timeout);

            if !desc.headers.is_empty() {
                println!("  {}", "Headers:".dimmed());
                for (name, value) in &desc.headers {
                    println!("    {}: {}", name.white(), value.yellow());
                }
            }
            if let Some(auth) = &desc.basic_auth {
                println!("  {} {} / {}", "Basic auth:".dimmed(), auth.login.white(), "****".dimmed());
            }
            if !desc.output_headers.is_empty() {
                println!("  {}", "Extract headers:".dimmed());
                for name in &desc.output_headers {
                    println!("    • {}", name.white());
                }
            }
            println!("  {}", "Body:".dimmed());
            println!("    {}", serde_json::to_string(&desc.body())?.yellow());
        }
    }
    Ok(())
}

fn explain_query(query: &str, mode: Mode, args: &[Arg], format: OutputFormat) -> Result<()> {
    let bound = match bind(query, args) {
        Ok(bound) => bound,
        Err(e) => {
            report_explain_error(&e);
            return Ok(());
        }
    };
    let tokens = tokenize(&bound.query);
    let compiled = QueryParser::new(mode).parse(&tokens).and_then(|fields| {
        let desc = RequestDescriptor::build(fields.clone(), bound.payload)?;
        Ok((fields, desc))
    });

    if let OutputFormat::Json = format {
        let mut out = serde_json::json!({
            "mode": mode,
            "query": bound.query,
            "tokens": tokens,
        });
        match compiled {
            Ok((fields, desc)) => {
                out["fields"] = serde_json::to_value(fields)?;
                out["request"] = serde_json::to_value(desc)?;
            }
            Err(e) => out["error"] = e.to_string().into(),
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "sqlreq Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Query:".dimmed(), bound.query.yellow());
    println!();

    println!("{}", "Tokens:".green().bold());
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Value {
            println!("  {:>3} {:10} {}", i + 1, token.kind.as_str().dimmed(), token.value.white());
        } else {
            println!("  {:>3} {}", i + 1, token.kind.as_str().cyan());
        }
    }
    println!();

    match compiled {
        Ok((_, desc)) => print_descriptor(&desc, OutputFormat::Table)?,
        Err(e) => report_explain_error(&e),
    }
    Ok(())
}

fn report_explain_error(e: &SqlReqError) {
    let label = match e {
        SqlReqError::MissingPayload => {
            println!("{}", "Query expects a payload argument (payload = ?).".yellow());
            return;
        }
        SqlReqError::Substitution { .. } => "Substitution Error:",
        SqlReqError::Parse { .. } | SqlReqError::IncompleteCommand => "Parse Error:",
        _ => "Error:",
    };
    eprintln!("{} {}", label.red().bold(), e);
}

fn show_keywords() {
    println!("{}", "sqlreq Keyword Reference".cyan().bold());
    println!();

    println!(
        "{:12} {}",
        "Keyword".white().bold(),
        "Meaning".white().bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for kind in KEYWORDS {
        let meaning = match kind {
            TokenKind::From => "Target URL follows",
            TokenKind::Where => "Start of clauses",
            TokenKind::And => "Chains another clause",
            TokenKind::Payload => "payload = ? takes the body from an argument",
            TokenKind::Header => "header <name> = <value>",
            TokenKind::With => "Introduces an option",
            TokenKind::Get => "GET (default)",
            TokenKind::Post => "POST",
            TokenKind::Put => "PUT",
            TokenKind::Patch => "PATCH",
            TokenKind::Delete => "DELETE",
            TokenKind::BasicAuth => "basicauth <login>, <password>",
            TokenKind::Timeout => "timeout <seconds> (default 30)",
            TokenKind::Comma => "Separates list items",
            TokenKind::Equal => "Binds a key to a value",
            TokenKind::Question => "Payload placeholder",
            TokenKind::Value | TokenKind::Start | TokenKind::Eof => continue,
        };
        println!("{:12} {}", kind.as_str().cyan().bold(), meaning.dimmed());
    }
}
