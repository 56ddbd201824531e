//! Command-line definition

use std::path::PathBuf;

use clap::{builder::PossibleValuesParser, value_parser, Arg, ArgAction, Command};

/// Arguments shared by every subcommand that reads a configuration
fn input_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("path")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file to read (.json, .yaml or .yml)"),
        )
        .arg(
            Arg::new("options")
                .long("options")
                .value_parser(value_parser!(PathBuf))
                .help("JSON option definitions replacing the built-in table"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_parser(value_parser!(usize))
                .help("Reject configurations nested deeper than this"),
        )
}

/// Build the `cfgmig` command
#[must_use]
pub fn command() -> Command {
    Command::new("cfgmig")
        .version(cfgmig_core::VERSION)
        .about("Migrate legacy configuration files to the current schema")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit diagnostics as JSON lines"),
        )
        .subcommand(
            input_args(Command::new("migrate").about("Write the migrated configuration"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write to this file instead of stdout"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(PossibleValuesParser::new(["json", "yaml"]))
                        .help("Output format (defaults to the input's format)"),
                ),
        )
        .subcommand(input_args(
            Command::new("check").about("Exit with status 1 if the configuration uses legacy syntax"),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn migrate_arguments_parse() {
        let matches = command()
            .try_get_matches_from(["cfgmig", "migrate", "renovate.json", "--format", "yaml", "--max-depth", "8"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "migrate");
        assert_eq!(args.get_one::<PathBuf>("path"), Some(&PathBuf::from("renovate.json")));
        assert_eq!(args.get_one::<String>("format").map(String::as_str), Some("yaml"));
        assert_eq!(args.get_one::<usize>("max-depth"), Some(&8));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = command().try_get_matches_from(["cfgmig", "migrate", "a.json", "--format", "toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(command().try_get_matches_from(["cfgmig"]).is_err());
    }
}
