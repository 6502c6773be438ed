// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::env;

use crate::core::config::DEFAULT_CONFIG_PATH;
use crate::core::models::{TargetSelection, TestOptions};
use crate::infra::t;

pub mod commands;

/// Name prepended to the trailing arguments; the core drops it again.
pub const COMMAND_NAME: &str = "zendev";

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().skip(1).collect();
    language_from_args(&args)
}

/// Finds `--lang <VALUE>` or `--lang=<VALUE>`. Scanning stops at `--`, since
/// everything after it is forwarded to the test runners.
pub fn language_from_args(args: &[String]) -> Option<String> {
    let mut args = args.iter().take_while(|arg| *arg != "--");
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            return args.next().cloned();
        }
        if let Some(value) = arg.strip_prefix("--lang=") {
            return Some(value.to_string());
        }
    }
    None
}

/// A boolean selection flag of the `test` subcommand.
fn flag(id: &'static str, short: char, long: &'static str, help: String) -> Arg {
    Arg::new(id)
        .short(short)
        .long(long)
        .help(help)
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new(COMMAND_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help(t!("cli.config").to_string())
                .value_name("CONFIG")
                .default_value(DEFAULT_CONFIG_PATH)
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("test")
                .about(t!("cli.test_about").to_string())
                .arg(flag("devimg", 'd', "zenoss-devimg", t!("cli.devimg").to_string()))
                .arg(flag("resmgr", 'r', "zenoss-resmgr", t!("cli.resmgr").to_string()))
                .arg(flag("ucspm", 'p', "zenoss-ucspm", t!("cli.ucspm").to_string()))
                .arg(flag("nfvimon", 'n', "zenoss-nfvimon", t!("cli.nfvimon").to_string()))
                .arg(flag("core", 'c', "zenoss-core", t!("cli.core").to_string()))
                .arg(flag(
                    "zp",
                    'z',
                    "zenoss-zenpack-restore",
                    t!("cli.zenpack_restore").to_string(),
                ))
                .arg(flag("zep_unit", 'e', "zenoss-zep", t!("cli.zep_unit").to_string()))
                .arg(flag(
                    "zep_integration",
                    'i',
                    "zenoss-zep-integration",
                    t!("cli.zep_integration").to_string(),
                ))
                .arg(flag("serviced_unit", 'u', "serviced", t!("cli.serviced_unit").to_string()))
                .arg(flag(
                    "serviced_smoke",
                    's',
                    "serviced-smoke",
                    t!("cli.serviced_smoke").to_string(),
                ))
                .arg(
                    Arg::new("use_existing")
                        .long("use-existing")
                        .help(t!("cli.use_existing").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("interactive")
                        .long("interactive")
                        .help(t!("cli.interactive").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no_tty")
                        .long("no-tty")
                        .help(t!("cli.no_tty").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("arguments")
                        .help(t!("cli.arguments").to_string())
                        .value_name("ARGS")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(Command::new("env").about(t!("cli.env_about").to_string()))
}

/// Reads the `test` subcommand's matches into [`TestOptions`].
pub fn test_options(matches: &ArgMatches) -> TestOptions {
    let selection = TargetSelection {
        devimg: matches.get_flag("devimg"),
        resmgr: matches.get_flag("resmgr"),
        ucspm: matches.get_flag("ucspm"),
        nfvimon: matches.get_flag("nfvimon"),
        core: matches.get_flag("core"),
        zenpack_restore: matches.get_flag("zp"),
        zep_unit: matches.get_flag("zep_unit"),
        zep_integration: matches.get_flag("zep_integration"),
        serviced_unit: matches.get_flag("serviced_unit"),
        serviced_smoke: matches.get_flag("serviced_smoke"),
    };

    let mut arguments = vec![COMMAND_NAME.to_string()];
    if let Some(values) = matches.get_many::<String>("arguments") {
        arguments.extend(values.cloned());
    }

    TestOptions {
        selection,
        use_existing: matches.get_flag("use_existing"),
        interactive: matches.get_flag("interactive"),
        no_tty: matches.get_flag("no_tty"),
        arguments,
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    crate::init(language.as_deref());

    let matches = build_cli().get_matches();
    // `--config` carries a default value, so it is always present.
    let config = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or_default();

    match matches.subcommand() {
        Some(("test", test_matches)) => {
            commands::test::execute(test_options(test_matches), config).await?;
        }
        Some(("env", _)) => {
            commands::env::execute(config)?;
        }
        _ => {
            // Clap has already printed the help for a missing subcommand.
        }
    }
    Ok(())
}
