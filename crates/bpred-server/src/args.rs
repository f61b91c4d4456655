//! Command-line handling for the server binary.

use crate::config::{ConfigError, ServerConfig};

/// Environment variable naming a config file when `--config` is absent
pub const CONFIG_ENV: &str = "BPRED_CONFIG";

/// Usage text printed for `--help`
pub const USAGE: &str = "\
bpred-server - boiling point predictions over HTTP

USAGE:
    bpred-server [--config <file>] [--port <port>]

OPTIONS:
    -c, --config <file>    TOML configuration (falls back to $BPRED_CONFIG)
    -p, --port <port>      Override bind_port from the configuration
    -h, --help             Print this help message

Without a configuration file the server binds 127.0.0.1:5000 and loads
model/full_pipe.json with the H, C, O, N allowlist.
";

/// What the binary was asked to do
#[derive(Debug)]
pub enum Invocation {
    /// Serve with this configuration
    Serve(ServerConfig),
    /// Print usage and exit
    Help,
}

/// Parsed options before the configuration is loaded
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    config: Option<String>,
    port: Option<u16>,
    help: bool,
}

fn parse_options<I>(args: I) -> Result<Options, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        let mut value = |name: &str| {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ConfigError::Invalid(format!("{name} needs a value")))
        };
        match flag.as_str() {
            "-h" | "--help" => options.help = true,
            "-c" | "--config" => options.config = Some(value("--config")?),
            "-p" | "--port" => {
                let raw = value("--port")?;
                let port = raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("invalid port '{raw}'")))?;
                options.port = Some(port);
            }
            other => {
                return Err(ConfigError::Invalid(format!("unknown argument '{other}'")));
            }
        }
    }
    Ok(options)
}

impl Invocation {
    /// Interpret arguments (without the program name).
    ///
    /// `env_config` is the value of [`CONFIG_ENV`], used when no `--config`
    /// is given.
    pub fn from_args<I>(args: I, env_config: Option<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let options = parse_options(args)?;
        if options.help {
            return Ok(Invocation::Help);
        }

        let mut config = match options.config.or(env_config) {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default_test_config(),
        };
        if let Some(port) = options.port {
            config.bind_port = port;
        }
        Ok(Invocation::Serve(config))
    }
}
