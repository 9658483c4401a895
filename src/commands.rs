//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the screen controllers.
//! Each handler takes CLI args, the shared context and Output, returns ExitCode.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::CatalogClient;
use crate::cli::{
    DiscoverCmd, ExitCode, FavoritesAction, FavoritesCmd, InfoCmd, ListCmd, Output, SearchCmd,
    ThemeCmd,
};
use crate::config::Config;
use crate::controller::{
    CategoryController, DetailAggregator, FavoritesList, HomeFeed, SearchController, SearchPhase,
};
use crate::models::{favorite_id, MovieList};
use crate::presentation::ThemeContext;
use crate::store::{FavoritesStore, JsonFileStore};
use crate::sync::Section;

// =============================================================================
// Shared Context
// =============================================================================

/// Config plus lazily built collaborators
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load config from `path`, or the default location
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.or_else(Config::path);
        let config = match &config_path {
            Some(p) => Config::load_from(p)?,
            None => Config::default(),
        };
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn catalog(&self) -> Result<Arc<CatalogClient>> {
        let token = self.config.access_token()?;
        Ok(Arc::new(CatalogClient::with_base_url(
            token,
            self.config.base_url(),
        )))
    }

    pub fn favorites(&self) -> Arc<FavoritesStore<JsonFileStore>> {
        Arc::new(FavoritesStore::new(JsonFileStore::new(
            self.config.favorites_path(),
        )))
    }
}

/// Print `data`, mapping a serialization failure to an exit code
fn emit<T: Serialize>(output: &Output, data: T) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

fn emit_list<T: Serialize + std::fmt::Display>(output: &Output, items: &[T]) -> ExitCode {
    match output.print_list(items) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    let catalog = match ctx.catalog() {
        Ok(c) => c,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    output.info(format!("Searching for: {}", cmd.keyword));

    let mut search = SearchController::new(catalog).with_debounce(ctx.config.debounce());
    search.input(cmd.keyword);
    search.submit();
    search.settle().await;

    match search.phase() {
        SearchPhase::Failed => output.error(
            format!("Search failed: {}", search.error().unwrap_or("unknown error")),
            ExitCode::NetworkError,
        ),
        SearchPhase::Idle => output.error("Keyword is empty", ExitCode::InvalidArgs),
        _ => {
            let results: Vec<_> = search.results().iter().take(cmd.limit).cloned().collect();
            emit_list(output, &results)
        }
    }
}

// =============================================================================
// Genre Commands
// =============================================================================

pub async fn genres_cmd(ctx: &Context, output: &Output) -> ExitCode {
    let catalog = match ctx.catalog() {
        Ok(c) => c,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    let mut categories = CategoryController::new(catalog);
    categories.load();
    categories.settle().await;

    match categories.categories() {
        Some(Section::Ready(list)) => emit_list(output, list),
        Some(Section::Failed(e)) => output.error(
            format!("Failed to load genres: {}", e),
            ExitCode::NetworkError,
        ),
        _ => output.error("Genres did not load", ExitCode::Error),
    }
}

pub async fn discover_cmd(cmd: DiscoverCmd, ctx: &Context, output: &Output) -> ExitCode {
    let catalog = match ctx.catalog() {
        Ok(c) => c,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    let mut categories = CategoryController::new(catalog);
    categories.load();
    categories.settle().await;

    if let Some(Section::Failed(e)) = categories.categories() {
        return output.error(
            format!("Failed to load genres: {}", e),
            ExitCode::NetworkError,
        );
    }

    let Some(category) = categories.find(&cmd.genre).cloned() else {
        return output.error(
            format!("Unknown genre: {}", cmd.genre),
            ExitCode::InvalidArgs,
        );
    };

    output.info(format!("Discovering: {}", category.name));
    categories.select(category);
    if let Err(e) = categories.confirm_search() {
        return output.error(e.to_string(), ExitCode::InvalidArgs);
    }
    categories.settle().await;

    match categories.movies() {
        Some(Section::Ready(movies)) => {
            let movies: Vec<_> = movies.iter().take(cmd.limit).cloned().collect();
            emit_list(output, &movies)
        }
        Some(Section::Failed(e)) => {
            output.error(format!("Discovery failed: {}", e), ExitCode::NetworkError)
        }
        _ => output.error("Discovery did not finish", ExitCode::Error),
    }
}

// =============================================================================
// List Command
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, ctx: &Context, output: &Output) -> ExitCode {
    let catalog = match ctx.catalog() {
        Ok(c) => c,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    let lists: Vec<MovieList> = match cmd.feed {
        Some(feed) => vec![feed.into()],
        None => MovieList::ALL.to_vec(),
    };

    let mut home = HomeFeed::new(catalog);
    home.load(&lists);
    home.settle().await;

    if let [list] = lists.as_slice() {
        return match home.section(*list) {
            Section::Ready(movies) => {
                let movies: Vec<_> = movies.iter().take(cmd.limit).cloned().collect();
                emit_list(output, &movies)
            }
            Section::Failed(e) => output.error(
                format!("{} failed: {}", list, e),
                ExitCode::NetworkError,
            ),
            Section::Loading => output.error("Feed did not finish", ExitCode::Error),
        };
    }

    let sections: Vec<(MovieList, Section<Vec<_>>)> = lists
        .iter()
        .map(|list| {
            let section = match home.section(*list) {
                Section::Ready(movies) => {
                    Section::Ready(movies.iter().take(cmd.limit).cloned().collect())
                }
                other => other.clone(),
            };
            (*list, section)
        })
        .collect();

    if sections.iter().all(|(_, s)| s.is_failed()) {
        return output.error("All feeds failed to load", ExitCode::NetworkError);
    }

    if output.json {
        let map: indexmap::IndexMap<_, _> = sections.into_iter().collect();
        return emit(output, map);
    }

    for (list, section) in &sections {
        println!("== {} ==", list);
        match section {
            Section::Ready(movies) => {
                for movie in movies {
                    println!("{}", movie);
                }
            }
            Section::Failed(e) => println!("(unavailable: {})", e),
            Section::Loading => println!("(loading)"),
        }
        println!();
    }
    ExitCode::Success
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, ctx: &Context, output: &Output) -> ExitCode {
    let catalog = match ctx.catalog() {
        Ok(c) => c,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    output.info(format!("Getting info for: {}", cmd.id));

    let mut detail = DetailAggregator::new(catalog, ctx.favorites());
    detail.activate(cmd.id);
    detail.settle().await;

    if cmd.toggle_favorite {
        // A refused toggle never reached the store
        if let Err(e) = detail.toggle_favorite() {
            return output.error(e.to_string(), ExitCode::Error);
        }
        detail.settle().await;
    }

    let Some(view) = detail.view() else {
        return output.error("Detail view is not active", ExitCode::Error);
    };

    if output.json {
        let code = emit(output, view);
        if code != ExitCode::Success {
            return code;
        }
    } else {
        match &view.detail {
            Section::Ready(d) => {
                println!("{}", d);
                if !d.overview.is_empty() {
                    println!("\n{}\n", d.overview);
                }
            }
            Section::Failed(e) => println!("Detail unavailable: {}", e),
            Section::Loading => {}
        }
        match &view.is_favorite {
            Section::Ready(fav) => println!("Favorite: {}", if *fav { "yes" } else { "no" }),
            Section::Failed(e) => println!("Favorite: unknown ({})", e),
            Section::Loading => {}
        }
        match &view.recommendations {
            Section::Ready(recs) if !recs.is_empty() => {
                println!("\nRecommendations:");
                for movie in recs {
                    println!("  {}", movie);
                }
            }
            Section::Failed(e) => println!("Recommendations unavailable: {}", e),
            _ => {}
        }
    }

    if let Some(e) = &view.favorite_error {
        return output.error(
            format!("Favorite update failed: {}", e),
            ExitCode::PersistenceError,
        );
    }
    if view.detail.is_failed() {
        return ExitCode::NetworkError;
    }
    ExitCode::Success
}

// =============================================================================
// Favorites Command
// =============================================================================

pub async fn favorites_cmd(cmd: FavoritesCmd, ctx: &Context, output: &Output) -> ExitCode {
    let favorites = ctx.favorites();

    let result = match cmd.action.unwrap_or(FavoritesAction::List) {
        FavoritesAction::List => {
            let catalog = match ctx.catalog() {
                Ok(c) => c,
                Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
            };
            let mut list = FavoritesList::new(catalog, favorites);
            list.refresh();
            list.settle().await;

            return match list.movies() {
                Section::Ready(movies) if movies.is_empty() && !output.json => {
                    output.info("No favorite movies found.");
                    ExitCode::Success
                }
                Section::Ready(movies) => emit_list(output, movies),
                Section::Failed(e) => output.error(
                    format!("Failed to read favorites: {}", e),
                    ExitCode::PersistenceError,
                ),
                Section::Loading => output.error("Favorites did not load", ExitCode::Error),
            };
        }
        FavoritesAction::Ids => favorites.list().await,
        FavoritesAction::Add { id } => match favorites.add(&favorite_id(id)).await {
            Ok(()) => favorites.list().await,
            Err(e) => Err(e),
        },
        FavoritesAction::Remove { id } => match favorites.remove(&favorite_id(id)).await {
            Ok(()) => favorites.list().await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(ids) => emit_list(output, &ids),
        Err(e) => output.error(
            format!("Favorites store error: {}", e),
            ExitCode::PersistenceError,
        ),
    }
}

// =============================================================================
// Theme Command
// =============================================================================

#[derive(Serialize)]
struct ThemeStatus {
    dark_mode: bool,
}

pub fn theme_cmd(cmd: ThemeCmd, ctx: &mut Context, output: &Output) -> ExitCode {
    let theme = ThemeContext::new(ctx.config.dark_mode);

    if cmd.toggle {
        let dark = theme.toggle();
        ctx.config.dark_mode = dark;

        let Some(path) = ctx.config_path.clone() else {
            return output.error("Could not determine config path", ExitCode::Error);
        };
        if let Err(e) = ctx.config.save_to(&path) {
            return output.error(format!("Failed to save config: {}", e), ExitCode::Error);
        }
    }

    emit(
        output,
        ThemeStatus {
            dark_mode: theme.is_dark(),
        },
    )
}
