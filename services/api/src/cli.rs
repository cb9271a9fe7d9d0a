use crate::check::{run_check, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pawd_forms::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PAWD forms relay",
    about = "Validate and relay PAWD club signup and attendance forms",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a saved form offline and print the row that would be sent
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::FormKind;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["pawd-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "pawd-api",
            "check",
            "signup",
            "--file",
            "form.json",
            "--today",
            "2024-01-10",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.kind, FormKind::Signup);
                assert_eq!(args.file.to_str(), Some("form.json"));
                assert!(args.today.is_some());
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_today() {
        let result = Cli::try_parse_from([
            "pawd-api",
            "check",
            "attendance",
            "--file",
            "form.json",
            "--today",
            "10/01/2024",
        ]);
        assert!(result.is_err());
    }
}
