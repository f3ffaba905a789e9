use std::fmt;

use catalog_core::{Browser, CityCatalog, Config, MovieUseCase, Tab, WeatherUseCase};
use inquire::{
    CustomType, CustomUserError, Select, Text,
    autocompletion::{Autocomplete, Replacement},
    error::InquireError,
};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SwitchTab(Tab),
    Search,
    ClearSearch,
    NextPage,
    PrevPage,
    PageSize,
    Retry,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SwitchTab(tab) => write!(f, "Switch to {} tab", tab.label()),
            Action::Search => f.write_str("Search"),
            Action::ClearSearch => f.write_str("Clear search"),
            Action::NextPage => f.write_str("Next page"),
            Action::PrevPage => f.write_str("Previous page"),
            Action::PageSize => f.write_str("Change page size"),
            Action::Retry => f.write_str("Retry"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

/// How a prompt ended.
#[derive(Debug, PartialEq, Eq)]
enum Reply<T> {
    Answer(T),
    /// Esc: leave things as they were.
    Skip,
    /// Ctrl-C.
    Quit,
}

fn reply<T>(result: Result<T, InquireError>) -> anyhow::Result<Reply<T>> {
    match result {
        Ok(value) => Ok(Reply::Answer(value)),
        Err(InquireError::OperationCanceled) => Ok(Reply::Skip),
        Err(InquireError::OperationInterrupted) => Ok(Reply::Quit),
        Err(e) => Err(e.into()),
    }
}

/// Suggests `"Name, CC"` labels for the weather search; completes to the bare name.
#[derive(Debug, Clone)]
struct CityCompleter {
    labels: Vec<String>,
}

impl CityCompleter {
    fn new(catalog: &CityCatalog) -> Self {
        Self { labels: catalog.available_cities() }
    }

    fn suggestions(&self, input: &str) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.labels.iter().filter(|l| l.to_lowercase().contains(&needle)).cloned().collect()
    }
}

impl Autocomplete for CityCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.suggestions(input))
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion.map(|label| city_name(&label).to_string()))
    }
}

fn city_name(label: &str) -> &str {
    label.split_once(", ").map_or(label, |(name, _)| name)
}

pub async fn run(
    movies: MovieUseCase,
    weather: WeatherUseCase,
    config: &Config,
) -> anyhow::Result<()> {
    let mut browser = Browser::new(movies, weather, config.page_size);
    browser.load().await;

    loop {
        show(&browser);

        let action = match reply(Select::new("What next?", actions(&browser)).prompt())? {
            Reply::Answer(action) => action,
            Reply::Skip | Reply::Quit => break,
        };

        let state = browser.state();
        match action {
            Action::SwitchTab(tab) => browser.on_tab_change(tab).await,
            Action::Search => {
                let mut prompt = Text::new("Search:")
                    .with_placeholder(state.tab.search_placeholder())
                    .with_initial_value(&state.query);
                if state.tab == Tab::Weather {
                    prompt = prompt.with_autocomplete(CityCompleter::new(&CityCatalog::builtin()));
                }
                match reply(prompt.prompt())? {
                    Reply::Answer(query) => browser.on_search_change(&query).await,
                    Reply::Skip => {}
                    Reply::Quit => break,
                }
            }
            Action::ClearSearch => browser.on_search_change("").await,
            Action::NextPage => {
                let (page, size) = (state.page, state.page_size);
                browser.on_page_change(page, size).await;
            }
            Action::PrevPage => {
                let (page, size) = (state.page, state.page_size);
                browser.on_page_change(page.saturating_sub(2), size).await;
            }
            Action::PageSize => {
                let prompt = CustomType::<u32>::new("Rows per page:").with_default(state.page_size);
                match reply(prompt.prompt())? {
                    Reply::Answer(size) => browser.on_page_change(0, size).await,
                    Reply::Skip => {}
                    Reply::Quit => break,
                }
            }
            Action::Retry => browser.retry().await,
            Action::Quit => break,
        }
    }

    Ok(())
}

fn actions(browser: &Browser) -> Vec<Action> {
    let state = browser.state();
    let other = match state.tab {
        Tab::Movies => Tab::Weather,
        Tab::Weather => Tab::Movies,
    };

    let mut actions = vec![Action::SwitchTab(other), Action::Search];
    if !state.query.is_empty() {
        actions.push(Action::ClearSearch);
    }
    if state.has_next_page() {
        actions.push(Action::NextPage);
    }
    if state.has_prev_page() {
        actions.push(Action::PrevPage);
    }
    actions.push(Action::PageSize);
    if state.error.is_some() {
        actions.push(Action::Retry);
    }
    actions.push(Action::Quit);
    actions
}

fn show(browser: &Browser) {
    let state = browser.state();

    println!();
    let search = if state.query.is_empty() {
        String::new()
    } else {
        format!(" - search: {:?}", state.query)
    };
    println!("[{}] page {}/{}{}", state.tab.label(), state.page, state.total_pages(), search);

    if let Some(message) = &state.error {
        println!("Error: {message}");
        return;
    }

    match state.tab {
        Tab::Movies => {
            render::movie_table(&state.movies);
            println!("\n{} results", state.movies_total);
        }
        Tab::Weather => render::weather_table(&state.weather, state.weather_total),
    }
}
