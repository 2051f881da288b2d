use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    // Logging level
    pub log_level: String,

    // Flattened storefront settings
    #[serde(flatten)]
    pub storefront: storefront::config::Config,

    // Product to look up after listing the catalogue
    pub product: Option<String>,

    // Query to type into the search box
    pub query: Option<String>,
}

fn options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "print this help menu")
        .optflag("v", "version", "print the version information")
        .optopt("c", "config", "use a custom configuration file", "FILE")
        .optopt("p", "product", "look up a single product", "ID")
        .optopt("q", "query", "search for QUERY", "QUERY");
    opts
}

pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "Storefront", env!("CARGO_PKG_NAME")).map_or_else(
        || {
            cfg_if::cfg_if! {
                if #[cfg(unix)] {
                    std::path::Path::new("/etc").join(env!("CARGO_PKG_NAME"))
                } else {
                    std::env::temp_dir().join(env!("CARGO_PKG_NAME"))
                }
            }
        },
        |proj_dirs| proj_dirs.config_local_dir().to_path_buf(),
    )
}

const CONFIG_FILE_VAR: &str = "STOREFRONT_CONFIG_FILE";

// Where the configuration file comes from, in order of precedence
#[derive(Debug, PartialEq, Eq)]
enum ConfigFile {
    CommandLine(String),
    Environment(String),
    Default(PathBuf),
}

impl ConfigFile {
    fn locate(cmdline: Option<String>, env: Option<String>) -> Self {
        match (cmdline, env) {
            (Some(path), _) => Self::CommandLine(path),
            (None, Some(path)) => Self::Environment(path),
            (None, None) => {
                Self::Default(config_dir().join(format!("{}.yaml", env!("CARGO_PKG_NAME"))))
            }
        }
    }

    fn add_to(
        &self,
        b: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> ::config::ConfigBuilder<::config::builder::DefaultState> {
        match self {
            Self::CommandLine(path) | Self::Environment(path) => {
                b.add_source(::config::File::with_name(path))
            }
            Self::Default(path) => b.add_source(::config::File::from(path.as_path()).required(false)),
        }
    }
}

impl core::fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CommandLine(path) => {
                write!(f, "Using configuration file '{path}' specified on command line")
            }
            Self::Environment(path) => write!(
                f,
                "Using configuration file '{path}' specified by {CONFIG_FILE_VAR} environment variable"
            ),
            Self::Default(path) => {
                write!(f, "Using optional configuration file '{}'", path.display())
            }
        }
    }
}

// Returns `None` once help or version output has been printed
fn parse_args() -> Option<getopts::Matches> {
    let opts = options();
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let flags = opts
        .parse(args)
        .expect("Failed to parse command line args");

    if flags.opt_present("h") {
        let brief = format!(
            "{} {} - {}\n\nUsage: {program} [options]",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION"),
        );
        print!("{}", opts.usage(&brief));
        None
    } else if flags.opt_present("v") {
        println!("{}", env!("CARGO_PKG_VERSION"));
        None
    } else {
        Some(flags)
    }
}

/// Builds the configuration from, lowest precedence first: the config file,
/// `STOREFRONT_*` environment variables, then `--product` and `--query`.
pub fn init() -> Option<(Config, String)> {
    let flags = parse_args()?;
    let file = ConfigFile::locate(flags.opt_str("config"), std::env::var(CONFIG_FILE_VAR).ok());

    let config = file
        .add_to(::config::Config::builder())
        .add_source(::config::Environment::with_prefix("STOREFRONT").try_parsing(true))
        .set_override_option("product", flags.opt_str("product"))
        .and_then(|b| b.set_override_option("query", flags.opt_str("query")))
        .and_then(|b| b.build())
        .expect("Failed to read configuration")
        .try_deserialize()
        .expect("Failed to parse configuration");

    Some((config, file.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_settings() {
        let config: Config = serde_json::from_str(
            r#"{ "log_level": "debug", "search_debounce_ms": 50, "query": "mouse" }"#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.storefront.search_debounce_ms, 50);
        assert_eq!(config.storefront.network_delay_ms, 300);
        assert_eq!(config.query.as_deref(), Some("mouse"));
        assert!(config.product.is_none());
    }

    #[test]
    fn test_command_line_file_wins() {
        let file = ConfigFile::locate(Some("cli.toml".into()), Some("env.yaml".into()));
        assert_eq!(file, ConfigFile::CommandLine("cli.toml".into()));
        assert!(file.to_string().contains("on command line"));

        let file = ConfigFile::locate(None, Some("env.yaml".into()));
        assert_eq!(file, ConfigFile::Environment("env.yaml".into()));
        assert!(file.to_string().contains(CONFIG_FILE_VAR));
    }

    #[test]
    fn test_default_file_is_optional_yaml() {
        let ConfigFile::Default(path) = ConfigFile::locate(None, None) else {
            panic!("expected the default location");
        };
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("yaml"));
        assert!(path.starts_with(config_dir()));
    }

    #[test]
    fn test_options_parse() {
        let flags = options()
            .parse(["-p", "2", "--query", "keyboard"])
            .unwrap();
        assert_eq!(flags.opt_str("product").as_deref(), Some("2"));
        assert_eq!(flags.opt_str("q").as_deref(), Some("keyboard"));
    }
}
