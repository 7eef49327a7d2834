//! Interactive browse session: stdin commands drive the filter panel and sort
//! control exactly as clicks and keystrokes would.

use std::sync::Arc;

use anyhow::Result;
use catalog_core::{CatalogController, CatalogEvent, FilterPanel, SortControl};
use shared::{
    domain::FilterState,
    options::{category_by_id, category_by_name, rating_by_id},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing::debug;

const HELP: &str = "\
Commands:
  search <text>     set the title search (empty clears it)
  category <id|name>
  rating <id>       minimum rating, e.g. 4
  sort <id>         PRICE_HIGH or PRICE_LOW
  clear             clear all filters
  refresh           re-run the current query
  filters           show the filter panel and current filters
  help              show this help
  quit";

const REAUTH_HINT: &str =
    "The product api rejected the bearer token; pass --token or --token-file.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Category(String),
    Rating(String),
    Sort(String),
    Clear,
    Refresh,
    Filters,
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_start_matches([' ', '\t']).trim_end_matches(['\r', '\n']);
        let (verb, arg) = match line.split_once(' ') {
            Some((verb, arg)) => (verb, arg),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => Ok(BrowseCommand::Search(arg.to_string())),
            "category" | "c" => {
                let arg = arg.trim();
                if arg.is_empty() {
                    return Err("usage: category <id|name>".into());
                }
                let id = category_by_name(arg).map_or(arg, |option| option.category_id);
                Ok(BrowseCommand::Category(id.to_string()))
            }
            "rating" | "r" => match arg.trim() {
                "" => Err("usage: rating <id>".into()),
                id => Ok(BrowseCommand::Rating(id.to_string())),
            },
            "sort" => match arg.trim() {
                "" => Err("usage: sort <PRICE_HIGH|PRICE_LOW>".into()),
                id => Ok(BrowseCommand::Sort(id.to_ascii_uppercase())),
            },
            "clear" => Ok(BrowseCommand::Clear),
            "refresh" => Ok(BrowseCommand::Refresh),
            "filters" | "f" => Ok(BrowseCommand::Filters),
            "help" | "?" => Ok(BrowseCommand::Help),
            "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{other}'; type 'help'")),
        }
    }
}

pub async fn run(controller: Arc<CatalogController>) -> Result<()> {
    let mut events = controller.subscribe_events();

    controller.initialize().await;
    println!("{}", controller.view());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    println!("{message}");
                }
                continue;
            }
        };
        debug!(?command, "browse command");

        let issued_before = controller.latest_request_id();
        let filters = controller.filters();
        let panel = FilterPanel::with_default_options(&filters.title_search, &controller);
        let sort_control = SortControl::new(filters.sort_option, &controller);

        match command {
            BrowseCommand::Search(text) => panel.edit_search(&text),
            BrowseCommand::Category(id) => panel.activate_category(&id),
            BrowseCommand::Rating(id) => panel.activate_rating(&id),
            BrowseCommand::Sort(id) => sort_control.select(&id),
            BrowseCommand::Clear => panel.clear(),
            BrowseCommand::Refresh => {
                controller.refresh().await;
                println!("{}", controller.view());
                continue;
            }
            BrowseCommand::Filters => {
                println!("{}", panel.render());
                println!("{}", sort_control.render());
                println!("{}", describe_filters(&filters));
                continue;
            }
            BrowseCommand::Help => {
                println!("{HELP}");
                continue;
            }
            BrowseCommand::Quit => break,
        }

        if wait_for_latest(&controller, &mut events, issued_before).await {
            println!("{}", controller.view());
        }
    }

    Ok(())
}

/// Waits until the most recently issued refresh newer than `issued_before`
/// settles. Returns `false` when the edit was rejected and no refresh was
/// issued.
async fn wait_for_latest(
    controller: &CatalogController,
    events: &mut broadcast::Receiver<CatalogEvent>,
    issued_before: u64,
) -> bool {
    loop {
        match events.recv().await {
            Ok(CatalogEvent::RefreshSettled { request_id, .. })
                if request_id > issued_before && request_id == controller.latest_request_id() =>
            {
                return true;
            }
            Ok(CatalogEvent::FilterRejected { reason }) => {
                println!("{reason}");
                return false;
            }
            Ok(CatalogEvent::FetchFailed {
                reauth_required: true,
                ..
            }) => {
                println!("{REAUTH_HINT}");
            }
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return false,
        }
    }
}

fn describe_filters(filters: &FilterState) -> String {
    let sort = filters.sort_option.display_text();
    if filters.is_unconstrained() {
        return format!("Active: none, sorted by {sort}");
    }

    let category = match filters.category.as_str() {
        "" => "any".to_string(),
        id => match category_by_id(id) {
            Some(option) => format!("{} ({id})", option.name),
            None => format!("unlisted ({id})"),
        },
    };
    let rating = match filters.rating.as_str() {
        "" => "any".to_string(),
        id => match rating_by_id(id) {
            Some(option) => format!("{} & up", option.rating_id),
            None => format!("unlisted ({id})"),
        },
    };
    format!(
        "Active: category={category} rating={rating} search='{}', sorted by {sort}",
        filters.title_search
    )
}

fn print_prompt() {
    use std::io::Write as _;

    print!("catalog> ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use shared::domain::SortOption;

    use super::*;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(
            BrowseCommand::parse("search smart phone"),
            Ok(BrowseCommand::Search("smart phone".into()))
        );
        assert_eq!(
            BrowseCommand::parse("search"),
            Ok(BrowseCommand::Search(String::new()))
        );
        assert_eq!(
            BrowseCommand::parse("rating 3"),
            Ok(BrowseCommand::Rating("3".into()))
        );
        assert_eq!(
            BrowseCommand::parse("sort price_low"),
            Ok(BrowseCommand::Sort("PRICE_LOW".into()))
        );
        assert_eq!(BrowseCommand::parse("q"), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn category_accepts_names_and_raw_ids() {
        assert_eq!(
            BrowseCommand::parse("category Electronics"),
            Ok(BrowseCommand::Category("2".into()))
        );
        assert_eq!(
            BrowseCommand::parse("c 42"),
            Ok(BrowseCommand::Category("42".into()))
        );
    }

    #[test]
    fn rejects_missing_arguments_and_unknown_verbs() {
        assert!(BrowseCommand::parse("category").is_err());
        assert!(BrowseCommand::parse("sort ").is_err());
        assert_eq!(BrowseCommand::parse("   "), Err(String::new()));
        assert!(BrowseCommand::parse("buy 3")
            .unwrap_err()
            .contains("unknown command"));
    }

    #[test]
    fn describes_default_filters_as_unconstrained() {
        assert_eq!(
            describe_filters(&FilterState::default()),
            "Active: none, sorted by Price (High-Low)"
        );
    }

    #[test]
    fn describes_listed_and_unlisted_filter_ids() {
        let filters = FilterState {
            title_search: "tv".into(),
            category: "2".into(),
            rating: "9".into(),
            sort_option: SortOption::PriceLow,
        };
        assert_eq!(
            describe_filters(&filters),
            "Active: category=Electronics (2) rating=unlisted (9) search='tv', sorted by Price (Low-High)"
        );

        let rated = FilterState {
            rating: "3".into(),
            ..FilterState::default()
        };
        assert_eq!(
            describe_filters(&rated),
            "Active: category=any rating=3 & up search='', sorted by Price (High-Low)"
        );
    }
}
