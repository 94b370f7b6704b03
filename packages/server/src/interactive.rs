//! Interactive mode for the server.
//!
//! Prompts for the bind address, port and upstream API URL, starting from
//! the environment's values.

use dialoguer::{Confirm, Input};

use crate::{ServerConfig, run_server};

/// Runs the server in interactive mode, prompting for configuration.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("NC Resilience Dashboard Server");
    println!();

    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let api_url: String = Input::new()
        .with_prompt("Resilience API URL")
        .default(defaults.api_url.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.api_url.clone());

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    run_server(ServerConfig {
        bind_addr,
        port,
        api_url,
    })
    .await
}
