use std::process::ExitCode;

use clap::Parser;
use sqlscope::adapter::inbound::cli::command::Cli;
use sqlscope::adapter::inbound::cli::{self, output};
use sqlscope::config::LoggingConfig;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();

    output::configure(output::OutputConfig::new(cli.quiet), cli.color);
    LoggingConfig::from_verbosity(cli.verbose, cli.log_json).init();
    install_interrupt_handler();

    match cli::execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = %err, "Command failed");
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Exit with status 130 on Ctrl-C.
#[cfg(unix)]
fn install_interrupt_handler() {
    extern "C" fn on_interrupt(_signal: libc::c_int) {
        const MESSAGE: &[u8] = b"\ninterrupted\n";
        // Only async-signal-safe calls here.
        unsafe {
            libc::write(libc::STDERR_FILENO, MESSAGE.as_ptr().cast(), MESSAGE.len());
            libc::_exit(i32::from(sqlscope::error::EXIT_INTERRUPTED));
        }
    }

    let handler = on_interrupt as extern "C" fn(libc::c_int);
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
fn install_interrupt_handler() {}
