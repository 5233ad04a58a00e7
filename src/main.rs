use shellpad::audit::AuditLogger;
use shellpad::config::Config;
use shellpad::security::DANGEROUS_COMMANDS;
use shellpad::server::{self, AppState};
use shellpad::shell::ShellExecutor;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let executor = match ShellExecutor::new(&config) {
        Ok(executor) => Arc::new(executor),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let audit = if config.behavior.log_commands {
        match AuditLogger::new() {
            Ok(logger) => Some(Arc::new(logger)),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error: failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    let display_addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);

    println!("shellpad listening on http://{}", display_addr);
    println!("  POST /api/execute");
    println!("  GET  /api/current-directory");
    println!("  GET  /api/dangerous-commands");
    println!("  GET  /api/health");
    println!("  working directory: {}", executor.current_dir().await.display());
    println!("  blocked commands: {}", DANGEROUS_COMMANDS.len());
    if let Some(ref logger) = audit {
        println!("  execution log: {}", logger.log_path().display());
    }

    let state = AppState { executor, audit };

    if let Err(e) = server::serve(listener, state).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
