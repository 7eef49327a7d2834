use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use catalog_core::{
    CatalogController, ControllerSettings, CredentialStore, FileCredentialStore, HttpCatalogApi,
    MissingCredentialStore, StaticCredentialStore,
};
use clap::{Parser, Subcommand};
use shared::{
    domain::{FetchStatus, FilterState, SortOption},
    options::category_by_name,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;

use config::{load_settings, normalize_api_base_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse the product catalog from the terminal")]
struct Cli {
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[arg(long, global = true)]
    token: Option<String>,
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    search_debounce_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one page of products and print it.
    List {
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        rating: Option<String>,
        /// Print the controller snapshot as JSON instead of the text view.
        #[arg(long)]
        json: bool,
    },
    /// Interactive session driven by filter commands on stdin.
    Browse,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(v) = &self.api_base_url {
            settings.api_base_url = v.clone();
        }
        // A credential flag replaces whatever credential configuration supplied.
        if let Some(v) = &self.token {
            settings.token = Some(v.clone());
            settings.token_file = None;
        }
        if let Some(v) = &self.token_file {
            settings.token_file = Some(v.clone());
            settings.token = None;
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = self.search_debounce_ms {
            settings.search_debounce_ms = Some(v);
        }
    }
}

fn credential_store(settings: &Settings) -> Arc<dyn CredentialStore> {
    if let Some(token) = &settings.token {
        Arc::new(StaticCredentialStore::new(token.clone()))
    } else if let Some(path) = &settings.token_file {
        Arc::new(FileCredentialStore::new(path.clone()))
    } else {
        Arc::new(MissingCredentialStore)
    }
}

fn list_filters(
    sort: Option<String>,
    category: Option<String>,
    search: Option<String>,
    rating: Option<String>,
) -> Result<FilterState> {
    let mut filters = FilterState::default();
    if let Some(sort) = sort {
        filters.sort_option = sort.to_ascii_uppercase().parse::<SortOption>()?;
    }
    if let Some(category) = category {
        let listed_id = category_by_name(&category).map(|option| option.category_id.to_string());
        filters.category = listed_id.unwrap_or(category);
    }
    filters.title_search = search.unwrap_or_default();
    filters.rating = rating.unwrap_or_default();
    Ok(filters)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    cli.apply_overrides(&mut settings);

    let api_base_url = normalize_api_base_url(&settings.api_base_url)?;
    let api = HttpCatalogApi::new(&api_base_url)
        .with_context(|| format!("failed to build product api client for {api_base_url}"))?;
    info!(products_url = %api.products_url(), "using product api");

    let controller = CatalogController::new_with_settings(
        Arc::new(api),
        credential_store(&settings),
        ControllerSettings {
            request_timeout: settings.request_timeout(),
            search_debounce: settings.search_debounce(),
        },
    );

    match cli.command {
        Command::List {
            sort,
            category,
            search,
            rating,
            json,
        } => {
            let filters = list_filters(sort, category, search, rating)?;
            controller.replace_filters(filters);
            controller.refresh().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
            } else {
                println!("{}", controller.view());
            }

            if controller.status() == FetchStatus::Failed {
                bail!("product request failed; rerun with RUST_LOG=debug for details");
            }
        }
        Command::Browse => browse::run(controller).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    fn settings_with_env_token() -> Settings {
        Settings {
            token: Some("env-token".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn token_file_flag_overrides_configured_token() {
        let path = std::env::temp_dir().join(format!("catalog-cli-token-{}", std::process::id()));
        std::fs::write(&path, "file-token\n").expect("write token file");
        let cli = Cli::parse_from([
            OsStr::new("catalog"),
            OsStr::new("--token-file"),
            path.as_os_str(),
            OsStr::new("list"),
        ]);

        let mut settings = settings_with_env_token();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.token, None);
        assert_eq!(
            credential_store(&settings).bearer_token().as_deref(),
            Some("file-token")
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn token_flag_overrides_configured_token_file() {
        let cli = Cli::parse_from(["catalog", "--token", "cli-token", "browse"]);
        let mut settings = Settings {
            token_file: Some(PathBuf::from("/nonexistent/token")),
            ..settings_with_env_token()
        };

        cli.apply_overrides(&mut settings);

        assert_eq!(settings.token_file, None);
        assert_eq!(
            credential_store(&settings).bearer_token().as_deref(),
            Some("cli-token")
        );
    }

    #[test]
    fn configured_token_survives_without_credential_flags() {
        let cli = Cli::parse_from(["catalog", "--timeout-secs", "3", "browse"]);
        let mut settings = settings_with_env_token();

        cli.apply_overrides(&mut settings);

        assert_eq!(settings.request_timeout_secs, 3);
        assert_eq!(
            credential_store(&settings).bearer_token().as_deref(),
            Some("env-token")
        );
    }

    #[test]
    fn list_flags_build_one_filter_state() {
        let filters = list_filters(
            Some("price_low".into()),
            Some("Electronics".into()),
            Some(" phone".into()),
            Some("4".into()),
        )
        .expect("filters");

        assert_eq!(
            filters,
            FilterState {
                title_search: " phone".into(),
                category: "2".into(),
                rating: "4".into(),
                sort_option: SortOption::PriceLow,
            }
        );
        assert!(list_filters(None, None, None, None)
            .expect("defaults")
            .is_unconstrained());
    }

    #[test]
    fn list_rejects_unknown_sort() {
        let err = list_filters(Some("cheapest".into()), None, None, None).expect_err("bad sort");
        assert!(err.to_string().contains("CHEAPEST"));
    }
}
