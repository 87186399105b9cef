//! Runtime configuration
//!
//! Collected from command-line flags and the environment:
//!
//! | Source | Meaning |
//! |---|---|
//! | `--from`, `--to` | One-shot search instead of the interactive session |
//! | `--lang` | Starting language, `bn` (default) or `en` |
//! | `--mock` | Use the deterministic mock provider |
//! | `--model` | Gemini model name |
//! | `--history-dir` / `BUS_ROUTE_HOME` | Directory holding the history slot |
//! | `GEMINI_API_KEY` / `API_KEY` | Provider credentials |
//! | `--verbose` / `RUST_LOG` | Log verbosity |

use crate::route::Language;
use crate::suggest::{
    DEFAULT_MODEL, GeminiProvider, MockMode, MockProvider, SuggestResult, SuggestionProvider,
};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

const HOME_VAR: &str = "BUS_ROUTE_HOME";
const DEFAULT_HOME: &str = ".bus-route";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub language: Language,
    pub mock: bool,
    pub model: String,
    pub history_dir: PathBuf,
    pub verbose: bool,
    /// `(from, to)` when both were given on the command line
    pub one_shot: Option<(String, String)>,
}

impl AppConfig {
    pub fn command() -> Command {
        Command::new("bus-route")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Bus route suggestions in Bengali and English")
            .arg(
                Arg::new("from")
                    .long("from")
                    .short('f')
                    .help("Origin for a one-shot search")
                    .requires("to"),
            )
            .arg(
                Arg::new("to")
                    .long("to")
                    .short('t')
                    .help("Destination for a one-shot search")
                    .requires("from"),
            )
            .arg(
                Arg::new("lang")
                    .long("lang")
                    .short('l')
                    .help("Starting language")
                    .value_parser(PossibleValuesParser::new(["bn", "en"]))
                    .default_value("bn"),
            )
            .arg(
                Arg::new("mock")
                    .long("mock")
                    .short('m')
                    .help("Use the mock provider instead of Gemini")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("model")
                    .long("model")
                    .help("Gemini model name")
                    .default_value(DEFAULT_MODEL),
            )
            .arg(
                Arg::new("history-dir")
                    .long("history-dir")
                    .help("Directory for the search history (default: $BUS_ROUTE_HOME or ./.bus-route)")
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .help("Show debug logs")
                    .action(ArgAction::SetTrue),
            )
    }

    pub fn from_matches(matches: &ArgMatches) -> Self {
        let language = matches
            .get_one::<String>("lang")
            .and_then(|lang| lang.parse().ok())
            .unwrap_or_default();

        let history_dir = matches
            .get_one::<PathBuf>("history-dir")
            .cloned()
            .or_else(|| std::env::var_os(HOME_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));

        let one_shot = match (
            matches.get_one::<String>("from"),
            matches.get_one::<String>("to"),
        ) {
            (Some(from), Some(to)) => Some((from.clone(), to.clone())),
            _ => None,
        };

        AppConfig {
            language,
            mock: matches.get_flag("mock"),
            model: matches
                .get_one::<String>("model")
                .cloned()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            history_dir,
            verbose: matches.get_flag("verbose"),
            one_shot,
        }
    }

    /// Parse an explicit argument list (program name first)
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    /// Provider selected by this configuration
    pub fn build_provider(&self) -> SuggestResult<Arc<dyn SuggestionProvider>> {
        if self.mock {
            return Ok(Arc::new(MockProvider::with_delay(MockMode::Echo, 300)));
        }
        Ok(Arc::new(GeminiProvider::from_env_with_model(&self.model)?))
    }

    /// Log filter directive for `tracing_subscriber`
    pub fn log_directive(&self) -> &'static str {
        if self.verbose { "bus_route=debug" } else { "warn" }
    }
}
