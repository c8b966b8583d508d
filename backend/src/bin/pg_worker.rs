//! Embedded PostgreSQL worker for the Diesel integration tests.
//!
//! `pg-embed-setup-unpriv` re-executes this binary with reduced privileges
//! when the tests run as root:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload.json>
//! ```
//!
//! The payload is a serialised [`WorkerPayload`].

use std::ffi::OsString;
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{Context, Result, bail, eyre};
use pg_embedded_setup_unpriv::worker::WorkerPayload;
use postgresql_embedded::PostgreSQL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Setup,
    Start,
    Stop,
}

impl FromStr for Command {
    type Err = color_eyre::Report;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(eyre!("unknown command '{other}'; expected setup, start or stop")),
        }
    }
}

/// Parsed command line.
#[derive(Debug)]
struct Invocation {
    command: Command,
    payload: OsString,
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Invocation> {
    let mut rest = args.into_iter().skip(1);
    let (Some(command), Some(payload)) = (rest.next(), rest.next()) else {
        bail!("usage: pg_worker <setup|start|stop> <payload.json>");
    };
    if rest.next().is_some() {
        bail!("usage: pg_worker <setup|start|stop> <payload.json>");
    }
    let command = command.to_string_lossy().parse()?;
    Ok(Invocation { command, payload })
}

fn read_payload(path: &Path) -> Result<WorkerPayload> {
    let bytes = std::fs::read(path)
        .wrap_err_with(|| format!("failed to read worker payload {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .wrap_err_with(|| format!("failed to parse worker payload {}", path.display()))
}

fn run(invocation: Invocation) -> Result<()> {
    let payload = read_payload(Path::new(&invocation.payload))?;
    let settings = payload
        .settings
        .into_settings()
        .wrap_err("failed to rebuild PostgreSQL settings")?;
    for (key, value) in payload.environment {
        // SAFETY: the process is still single-threaded here.
        match value {
            Some(value) => unsafe { std::env::set_var(&key, value.expose()) },
            None => unsafe { std::env::remove_var(&key) },
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build worker runtime")?;
    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async {
            match invocation.command {
                Command::Setup => postgres.setup().await,
                Command::Start => postgres.start().await,
                Command::Stop => postgres.stop().await,
            }
        })
        .wrap_err_with(|| format!("PostgreSQL {:?} failed", invocation.command))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    run(parse_args(std::env::args_os())?)
}
