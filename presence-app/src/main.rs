use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use presence_client::api::DEFAULT_SERVER_URL;
use presence_client::render::{self, DEFAULT_WIDTH};
use presence_client::session::{Command, parse_command};
use presence_client::{ElderView, Mode, PresenceApi, SearchKind, TeenSession, run_search_flow};
use presence_common::observability::{LogConfig, init_logging};
use presence_config::{PresenceConfig, PresenceConfigLoader};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

const DEFAULT_CONFIG_FILE: &str = "presence.yaml";

#[derive(Parser, Debug)]
#[command(name = "presence", version, about = "Plain-language answers from trusted sources")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the HTTP API.
    Serve {
        /// YAML config file; `presence.yaml` is used when present.
        #[arg(long, env = "PRESENCE_CONFIG")]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ask one question and print the answer.
    Ask {
        #[arg(long, default_value_t = Mode::Elder)]
        mode: Mode,
        #[arg(long, env = "PRESENCE_SERVER", default_value = DEFAULT_SERVER_URL)]
        server: String,
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session that keeps history and counters.
    Session {
        #[arg(long, default_value_t = Mode::Elder)]
        mode: Mode,
        #[arg(long, env = "PRESENCE_SERVER", default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Cmd::Serve { config, host, port } => {
            let mut cfg = load_config(config)?;
            if let Some(host) = host {
                cfg.server.host = host;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            init_logging(LogConfig {
                app_name: "presence",
                log_dir: None,
                emit_stderr: cfg.log.emit_stderr,
                format: cfg.log.format,
                default_filter: cfg.log.filter.clone(),
            })?;
            serve(cfg).await
        }
        Cmd::Ask {
            mode,
            server,
            question,
        } => {
            init_logging(LogConfig::default())?;
            ask(mode, &server, &question.join(" ")).await
        }
        Cmd::Session { mode, server } => {
            init_logging(LogConfig::default())?;
            session(mode, &server).await
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PresenceConfig> {
    let loader = match path {
        Some(path) => PresenceConfigLoader::new().with_file(path),
        None => PresenceConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

async fn serve(cfg: PresenceConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received");
        }
        trigger.cancel();
    });

    presence_api::serve(&cfg, cancel).await?;
    Ok(())
}

async fn ask(mode: Mode, server: &str, question: &str) -> Result<()> {
    let api = PresenceApi::new(server)?;
    let answer = run_search_flow(&api, question).await?;
    let text = match mode {
        Mode::Elder => render::elder_answer(&answer, DEFAULT_WIDTH),
        Mode::Teen => {
            let mut session = TeenSession::new(Utc::now());
            session.record_success(question, SearchKind::Manual, "Custom", answer, Utc::now());
            match session.current() {
                Some(answer) => render::teen_answer(answer, &session, DEFAULT_WIDTH),
                None => String::new(),
            }
        }
    };
    print!("{text}");
    Ok(())
}

async fn session(mode: Mode, server: &str) -> Result<()> {
    let api = PresenceApi::new(server)?;
    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let status = if api.health().await { "online" } else { "offline" };
    out.write_all(format!("Server {server} is {status}.\n").as_bytes())
        .await?;
    out.write_all(render::help(mode).as_bytes()).await?;

    let mut elder = ElderView::new();
    let mut teen = TeenSession::new(Utc::now());

    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        let Some(cmd) = parse_command(mode, &line) else {
            continue;
        };

        let text = match cmd {
            Command::Quit => break,
            Command::Help => render::help(mode),
            Command::History => render::elder_history(&elder, DEFAULT_WIDTH),
            Command::Stats => render::teen_stats(&teen),
            Command::Today => match api.daily_history().await {
                Ok(answer) => render::elder_answer(&answer, DEFAULT_WIDTH),
                Err(e) => format!("Error: {e}\n"),
            },
            Command::Ask {
                query,
                kind,
                category,
            } => match mode {
                Mode::Elder => {
                    elder.begin();
                    match run_search_flow(&api, &query).await {
                        Ok(answer) => {
                            let text = render::elder_answer(&answer, DEFAULT_WIDTH);
                            elder.record_success(&query, answer);
                            text
                        }
                        Err(e) => {
                            elder.record_failure();
                            format!("Error: {e}\n")
                        }
                    }
                }
                Mode::Teen => {
                    teen.begin();
                    match run_search_flow(&api, &query).await {
                        Ok(answer) => {
                            teen.record_success(&query, kind, &category, answer, Utc::now());
                            match teen.current() {
                                Some(answer) => render::teen_answer(answer, &teen, DEFAULT_WIDTH),
                                None => String::new(),
                            }
                        }
                        Err(e) => {
                            teen.record_failure();
                            format!("Error: {e}\n")
                        }
                    }
                }
            },
        };
        out.write_all(text.as_bytes()).await?;
    }
    Ok(())
}
