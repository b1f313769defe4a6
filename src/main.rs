//! `dotsetup` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};

use dotsetup::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = match &args.command {
        cli::Command::Install(_) => "install",
        cli::Command::Check => "check",
        cli::Command::List(_) => "list",
        cli::Command::Completions(opts) => {
            clap_complete::generate(
                opts.shell,
                &mut cli::Cli::command(),
                "dotsetup",
                &mut std::io::stdout(),
            );
            return ExitCode::SUCCESS;
        }
        cli::Command::Version => {
            commands::version::run();
            return ExitCode::SUCCESS;
        }
    };

    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    let result = match &args.command {
        cli::Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        cli::Command::Check => commands::check::run(&args.global, &log),
        cli::Command::List(opts) => commands::list::run(&args.global, opts),
        cli::Command::Completions(_) | cli::Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
