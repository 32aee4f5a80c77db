use std::iter;

use nu_ansi_term::Color::{Cyan, Green};
use repojump_navigation::{
    Catalog, Destination, Disposition, Modifiers, NavigationEvent, NavigationState,
};
use repojump_store::{storage::Storage, RepositoryStore};
use tracing::{debug, info};

use crate::{
    error::{RepojumpError, RepojumpResult},
    list::format_repo,
    utils::{icon_or, Colored, Icons},
};

pub struct OpenRequest {
    pub query: String,
    pub down: usize,
    pub up: usize,
    pub modifiers: Modifiers,
}

/// Replays a search session: types the query, moves the highlight, then
/// commits.
pub fn resolve_destination<S: Storage>(
    store: &mut RepositoryStore<S>,
    request: &OpenRequest,
) -> RepojumpResult<Destination> {
    let mut state = NavigationState::from_load(store.load_all());
    if let Catalog::Unavailable(reason) = state.catalog() {
        return Err(RepojumpError::CatalogUnavailable(reason.clone()));
    }

    let moves = iter::repeat(NavigationEvent::ArrowDown)
        .take(request.down)
        .chain(iter::repeat(NavigationEvent::ArrowUp).take(request.up));
    let events = iter::once(NavigationEvent::Input(request.query.clone()))
        .chain(moves)
        .chain(iter::once(NavigationEvent::Commit(request.modifiers)));

    let mut destination = None;
    for event in events {
        let transition = state.apply(event);
        state = transition.state;
        destination = transition.destination;
    }

    for (index, repo) in state.visible().enumerate() {
        let marker = if index == state.highlight() { ">" } else { " " };
        debug!("{marker} {}", format_repo(repo));
    }

    destination.ok_or_else(|| RepojumpError::NoMatch(request.query.clone()))
}

pub fn open_repo<S: Storage>(
    store: &mut RepositoryStore<S>,
    request: &OpenRequest,
    json: bool,
) -> RepojumpResult<()> {
    let destination = resolve_destination(store, request)?;

    if json {
        println!("{}", serde_json::to_string(&destination)?);
        return Ok(());
    }

    let disposition = match destination.disposition {
        Disposition::ReplaceCurrent => "current tab",
        Disposition::NewTab { active: true } => "new tab",
        Disposition::NewTab { active: false } => "background tab",
    };
    info!(
        "{} {} ({})",
        icon_or(Icons::ARROW, "->"),
        Colored(Green, &destination.url),
        Colored(Cyan, disposition)
    );
    Ok(())
}
