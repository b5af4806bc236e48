use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::application::output::OutputFormat;
use crate::application::studio::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// What the binary should do once configuration has been loaded.
#[derive(Debug, PartialEq, Eq)]
pub enum Run {
    Generate(String),
    Studio(Option<String>),
    Models,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_generate() -> Command {
    return Command::new("generate")
        .about("Generates a complete brand identity for a mission and prints it.")
        .arg(
            Arg::new("mission")
                .help("Mission statement or company description, as free text.")
                .num_args(1)
                .required(true),
        );
}

fn subcommand_studio() -> Command {
    return Command::new("studio")
        .about("Starts an interactive studio to generate, refine and chat about an identity. This is the default command.")
        .arg(
            Arg::new("mission")
                .help("Mission to generate an identity for right away.")
                .num_args(1)
                .required(false),
        );
}

fn global_arg(key: ConfigKey, env: &'static str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
        .global(true);
}

fn with_default(description: &str, key: ConfigKey) -> String {
    return format!("{description} [default: {}]", Config::default(key));
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("STUDIO {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("lumina")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_generate())
        .subcommand(subcommand_studio())
        .subcommand(Command::new("models").about("Lists the models the Gemini API key can use for generation."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            global_arg(
                ConfigKey::ConfigFile,
                "LUMINA_CONFIG_FILE",
                with_default("Path to configuration file.", ConfigKey::ConfigFile),
            )
            .short('c'),
        )
        .arg(global_arg(
            ConfigKey::GeminiToken,
            "LUMINA_GEMINI_TOKEN",
            "Google Gemini API key.".to_string(),
        ))
        .arg(global_arg(
            ConfigKey::GeminiURL,
            "LUMINA_GEMINI_URL",
            with_default("Gemini API URL. Can be swapped to a compatible proxy.", ConfigKey::GeminiURL),
        ))
        .arg(global_arg(
            ConfigKey::StrategyModel,
            "LUMINA_STRATEGY_MODEL",
            with_default("Model used to draft the brand strategy.", ConfigKey::StrategyModel),
        ))
        .arg(global_arg(
            ConfigKey::ImageModel,
            "LUMINA_IMAGE_MODEL",
            with_default("Model used to render logos.", ConfigKey::ImageModel),
        ))
        .arg(global_arg(
            ConfigKey::ChatModel,
            "LUMINA_CHAT_MODEL",
            with_default("Model backing the brand assistant chat.", ConfigKey::ChatModel),
        ))
        .arg(global_arg(
            ConfigKey::StrategyMaxTokens,
            "LUMINA_STRATEGY_MAX_TOKENS",
            with_default("Maximum output tokens for the brand strategy.", ConfigKey::StrategyMaxTokens),
        ))
        .arg(global_arg(
            ConfigKey::StrategyThinkingBudget,
            "LUMINA_STRATEGY_THINKING_BUDGET",
            with_default("Thinking token budget for the brand strategy.", ConfigKey::StrategyThinkingBudget),
        ))
        .arg(global_arg(
            ConfigKey::RequestTimeout,
            "LUMINA_REQUEST_TIMEOUT",
            with_default("Time to wait in milliseconds for a single Gemini request.", ConfigKey::RequestTimeout),
        ))
        .arg(
            global_arg(
                ConfigKey::Output,
                "LUMINA_OUTPUT",
                with_default("Format used to print identities.", ConfigKey::Output),
            )
            .short('o')
            .value_parser(PossibleValuesParser::new(OutputFormat::VARIANTS)),
        );
}

pub async fn parse() -> Result<Option<Run>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("generate", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let mission = subcmd_matches
                .get_one::<String>("mission")
                .cloned()
                .unwrap_or_default();
            return Ok(Some(Run::Generate(mission)));
        }
        Some(("studio", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let mission = subcmd_matches.get_one::<String>("mission").cloned();
            return Ok(Some(Run::Studio(mission)));
        }
        Some(("models", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Some(Run::Models));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(None);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
            return Ok(Some(Run::Studio(None)));
        }
    }
}
