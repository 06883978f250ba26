mod app;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use usersearch_core::execution::{HttpExecutor, UreqHttpExecutor};
use usersearch_core::logging;
use usersearch_core::orchestration::SearchController;
use usersearch_core::settings::SearchSettings;
use usersearch_core::view::{GENERIC_ERROR_MESSAGE, NO_RESULTS_MESSAGE, SearchView};

const LOG_FILE_NAME: &str = "usersearch.log";

const USAGE: &str = "\
usage: usersearch                      interactive search
       usersearch --once <query> [--json]
       usersearch --help

environment:
  USERSEARCH_API_BASE_URL   directory API base (default https://api.github.com)
  USERSEARCH_DEBOUNCE_MS    quiet period before searching (default 1000)
  USERSEARCH_PAGE_SIZE      results per search, 1-100 (default 5)
  USERSEARCH_SORT           followers | repositories | joined (default followers)
  USERSEARCH_TIMEOUT_SECS   per-request timeout (default 30)
  USERSEARCH_LOG            tracing filter (default info)";

#[derive(Debug, Eq, PartialEq)]
enum Mode {
    Interactive,
    Once { query: String, json: bool },
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Mode, String> {
    let mut once: Option<String> = None;
    let mut json = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Mode::Help),
            "--json" => json = true,
            "--once" => {
                let query = args
                    .next()
                    .ok_or_else(|| "--once requires a query".to_string())?;
                if query.trim().is_empty() {
                    return Err("--once requires a non-blank query".to_string());
                }
                once = Some(query);
            }
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    match once {
        Some(query) => Ok(Mode::Once { query, json }),
        None if json => Err("--json is only valid with --once".to_string()),
        None => Ok(Mode::Interactive),
    }
}

fn main() -> ExitCode {
    let mode = match parse_args(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if mode == Mode::Help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let settings = match SearchSettings::from_env() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("invalid configuration: {}", error.message);
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("failed to create tokio runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let executor: Arc<dyn HttpExecutor> = Arc::new(UreqHttpExecutor::new(&settings.user_agent));
    let controller = SearchController::from_settings(&settings, executor);

    match mode {
        Mode::Interactive => {
            let log_path = std::env::temp_dir().join(LOG_FILE_NAME);
            if let Err(error) = logging::init_file(&log_path) {
                eprintln!("logging disabled: {}", error.message);
            }
            tracing::info!(api = %settings.api_base_url, "starting interactive search");

            match runtime.block_on(app::run(controller)) {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => {
                    eprintln!("terminal error: {error}");
                    ExitCode::FAILURE
                }
            }
        }
        Mode::Once { query, json } => {
            if let Err(error) = logging::init_stderr() {
                eprintln!("logging disabled: {}", error.message);
            }
            runtime.block_on(run_once(&controller, &query, json))
        }
        Mode::Help => ExitCode::SUCCESS,
    }
}

async fn run_once(controller: &SearchController, query: &str, json: bool) -> ExitCode {
    let state = controller.state();
    state.set_query(query).await;
    if controller.orchestrator().run_search(state, query).await.is_err() {
        eprintln!("{GENERIC_ERROR_MESSAGE}");
        return ExitCode::FAILURE;
    }

    let snapshot = controller.snapshot().await;
    if json {
        return match serde_json::to_string_pretty(&snapshot.results) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("failed to encode results: {error}");
                ExitCode::FAILURE
            }
        };
    }

    match SearchView::from_snapshot(&snapshot) {
        SearchView::Results(cards) => {
            for card in cards {
                println!("{}", card.login);
                println!("  {}", card.followers_label);
                println!("  avatar: {}", card.avatar_url);
                println!("  {}: {}", card.profile_link_label, card.profile_url);
            }
        }
        SearchView::NoResults => println!("{NO_RESULTS_MESSAGE}"),
        SearchView::Loading | SearchView::Idle => {}
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::{Mode, parse_args};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_start_interactive_mode() {
        assert_eq!(parse_args(args(&[])), Ok(Mode::Interactive));
    }

    #[test]
    fn once_mode_takes_query_and_optional_json() {
        assert_eq!(
            parse_args(args(&["--once", "octocat"])),
            Ok(Mode::Once {
                query: "octocat".to_string(),
                json: false
            })
        );
        assert_eq!(
            parse_args(args(&["--json", "--once", "octo cat"])),
            Ok(Mode::Once {
                query: "octo cat".to_string(),
                json: true
            })
        );
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(parse_args(args(&["--once"])).is_err());
        assert!(parse_args(args(&["--once", "  "])).is_err());
        assert!(parse_args(args(&["--json"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert_eq!(parse_args(args(&["--once", "x", "-h"])), Ok(Mode::Help));
    }
}
