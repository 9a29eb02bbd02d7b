// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::io;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::Workspace;
use crate::cli::args::{Args, Command};
use crate::domain::Credentials;
use crate::infrastructure::{Config, HttpNotesApi};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notedesk with arguments");

    if let Command::Init { force } = args.command {
        let mut out = io::stdout().lock();
        return cli::commands::init_config(args.config.as_deref(), force, &mut out);
    }

    // Initialize infrastructure
    let config = Config::resolve(args.config.as_deref(), args.api_url.as_deref())?;
    let api = HttpNotesApi::new(&config.api);
    info!(base_url = %api.base_url(), "Using notes API");

    // Initialize application
    let mut workspace = Workspace::new(api);
    workspace.load();

    let credentials = match (args.email, args.password) {
        (Some(email), Some(password)) => Some(Credentials::new(email, password)),
        _ => None,
    };

    // Execute use case
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    cli::commands::execute(
        &mut workspace,
        &args.command,
        credentials.as_ref(),
        &mut input,
        &mut out,
    )
}
