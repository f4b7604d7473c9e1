//! The `twodo_mcp` binary: an MCP server for 2Do on stdin/stdout.

use std::process::ExitCode;
use std::sync::Arc;
use twodo_mcp::config::{self, Invocation};
use twodo_mcp::dispatch::OpenCommand;
use twodo_mcp::mcp::tools::ToolRegistry;
use twodo_mcp::stdio::Server;

fn main() -> ExitCode {
    let config = match Invocation::from_env() {
        Ok(Invocation::Serve(config)) => config,
        Ok(Invocation::Help) => {
            print!("{}", config::usage());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("twodo_mcp {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("twodo_mcp: {e}\n\n{}", config::usage());
            return ExitCode::from(2);
        }
    };
    logwise::info_sync!(
        "starting twodo_mcp with open command {program}",
        program = logwise::privacy::LogIt(&config.open_command)
    );
    let dispatcher = Arc::new(OpenCommand::new(config.open_command));
    let server = Server::new(ToolRegistry::twodo(dispatcher));
    match server.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logwise::error_sync!("transport failed: {e}", e = logwise::privacy::LogIt(&e));
            ExitCode::FAILURE
        }
    }
}
