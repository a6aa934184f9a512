use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::PonderConfig;
use crate::ponder_home::PonderHome;
use crate::replay::ReplayScript;

mod config;
mod config_cmd;
mod ponder_home;
mod replay;

#[derive(Parser, Debug)]
#[command(name = "ponder", version, about = "ReAct agent state machine runner")]
struct Cli {
    #[arg(long, global = true)]
    conf_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: RootCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum RootCommand {
    /// Drive the agent with a recorded model transcript.
    Replay(ReplayArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct ReplayArgs {
    /// Script file; bare names are also looked up in `<conf-dir>/scripts`.
    #[arg(long)]
    script: PathBuf,
    #[arg(long)]
    max_function_calls: Option<usize>,
    message: String,
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigSubcommand {
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let home = PonderHome::resolve(cli.conf_dir.as_deref());
    let result = match cli.command {
        RootCommand::Replay(args) => run_replay(args, &home).await,
        RootCommand::Config(args) => match args.command {
            ConfigSubcommand::Init => {
                config_cmd::init_home(&home).map(|report| println!("{}", report.render()))
            }
        },
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run_replay(args: ReplayArgs, home: &PonderHome) -> Result<(), String> {
    let mut config = PonderConfig::load(home)?;
    config::init_tracing(home, &config.log);

    if let Some(max_function_calls) = args.max_function_calls {
        config.agent.max_function_calls = max_function_calls;
    }

    let script = ReplayScript::load(&home.locate_script(&args.script))?;
    replay::run_replay(script, config.agent, &args.message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_replay_with_script_and_message() {
        let parsed = Cli::try_parse_from(["ponder", "replay", "--script", "demo.toml", "hello"]);
        assert!(parsed.is_ok(), "ponder replay should accept a script and message");
    }

    #[test]
    fn cli_accepts_budget_override() {
        let parsed = Cli::try_parse_from([
            "ponder",
            "replay",
            "--script",
            "demo.toml",
            "--max-function-calls",
            "3",
            "hello",
        ])
        .expect("budget override should parse");
        let RootCommand::Replay(args) = parsed.command else {
            panic!("expected replay command");
        };
        assert_eq!(args.max_function_calls, Some(3));
    }

    #[test]
    fn cli_requires_script_for_replay() {
        let parsed = Cli::try_parse_from(["ponder", "replay", "hello"]);
        assert!(parsed.is_err(), "replay without --script should be rejected");
    }

    #[test]
    fn cli_accepts_conf_dir_global_flag() {
        let parsed =
            Cli::try_parse_from(["ponder", "config", "init", "--conf-dir", "/tmp/ponder-conf"])
                .expect("--conf-dir is accepted after the subcommand");
        assert_eq!(parsed.conf_dir, Some(PathBuf::from("/tmp/ponder-conf")));
    }
}
