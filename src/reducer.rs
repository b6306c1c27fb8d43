//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, Focus, SearchStatus, LOADING_ANIM_CYCLE_TICKS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchQueryChange(query) => {
            if state.query == query {
                return DispatchResult::unchanged();
            }
            state.query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit => start_search(state),

        Action::SearchDidLoad { request_id, result } => {
            if is_stale(state, request_id) {
                return DispatchResult::unchanged();
            }
            state.weather = Some(result);
            finish_search(state, SearchStatus::Idle)
        }

        Action::SearchDidMiss { request_id } => {
            if is_stale(state, request_id) {
                return DispatchResult::unchanged();
            }
            finish_search(state, SearchStatus::NotFound)
        }

        Action::SearchDidError {
            request_id,
            message,
        } => {
            if is_stale(state, request_id) {
                return DispatchResult::unchanged();
            }
            finish_search(state, SearchStatus::Failed(message))
        }

        // ===== Favorite actions =====
        Action::FavoriteAdd => {
            let Some(city) = state.displayed_city().map(str::to_string) else {
                return DispatchResult::unchanged();
            };
            if !state.favorites.add(&city) {
                return DispatchResult::unchanged();
            }
            state.storage_notice = None;
            DispatchResult::changed_with(Effect::PersistFavorites(state.favorites.clone()))
        }

        Action::FavoriteRemove(city) => {
            state.favorites.remove(&city);
            state.favorites_selected = state
                .favorites_selected
                .min(state.favorites.len().saturating_sub(1));
            state.storage_notice = None;
            DispatchResult::changed_with(Effect::PersistFavorites(state.favorites.clone()))
        }

        Action::FavoriteSelect(city) => {
            state.query = city;
            start_search(state)
        }

        Action::FavoriteHighlight(index) => {
            if index < state.favorites.len() && index != state.favorites_selected {
                state.favorites_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::FavoriteDidFail(msg) => {
            state.storage_notice = Some(msg);
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiFocusSearch => set_focus(state, Focus::Search),

        Action::UiFocusFavorites => set_focus(state, Focus::Favorites),

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Begin a new search for `state.query`, superseding any in flight
fn start_search(state: &mut AppState) -> DispatchResult<Effect> {
    state.request_id = state.request_id.wrapping_add(1);
    state.status = SearchStatus::Loading;
    state.tick_count = 0;
    state.loading_anim_ticks_remaining = 0;
    DispatchResult::changed_with(Effect::FetchWeather {
        request_id: state.request_id,
        query: state.query.clone(),
    })
}

fn finish_search(state: &mut AppState, status: SearchStatus) -> DispatchResult<Effect> {
    state.status = status;
    state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
    DispatchResult::changed()
}

fn is_stale(state: &AppState, request_id: u64) -> bool {
    let stale = request_id != state.request_id;
    if stale {
        tracing::debug!(
            request_id,
            latest = state.request_id,
            "dropping superseded search result"
        );
    }
    stale
}

fn set_focus(state: &mut AppState, focus: Focus) -> DispatchResult<Effect> {
    if state.focus == focus {
        return DispatchResult::unchanged();
    }
    state.focus = focus;
    DispatchResult::changed()
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 {
        0
    } else {
        cycle - remainder
    }
}
