//! Router assembly and serving

use crate::api::{self, admin, queue, songs};
use crate::{AppState, Error, Result};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build application router
///
/// Public routes serve submitters; `/admin/*` requires the moderator token.
pub fn build_router(state: AppState) -> Router {
    let moderator = Router::new()
        .route("/admin/entries", post(admin::append_entry))
        .route("/admin/entries/:index", delete(admin::remove_entry))
        .route("/admin/dequeue-first", put(admin::dequeue_first))
        .route("/admin/dequeue/:index", put(admin::dequeue_at))
        .route("/admin/move", put(admin::move_entry))
        .route("/admin/queue", delete(admin::clear_queue))
        .route("/admin/processed", delete(admin::clear_processed))
        .route("/admin/all", delete(admin::clear_all))
        .route("/admin/policy", get(admin::get_policy))
        .route(
            "/admin/queue-open",
            get(admin::get_queue_open).put(admin::set_queue_open),
        )
        .route(
            "/admin/time-between-same-song",
            get(admin::get_time_between_same_song).put(admin::set_time_between_same_song),
        )
        .route(
            "/admin/max-times-song-can-be-sung",
            get(admin::get_max_times_song_can_be_sung).put(admin::set_max_times_song_can_be_sung),
        )
        .route(
            "/admin/time-between-submissions",
            get(admin::get_time_between_submissions).put(admin::set_time_between_submissions),
        )
        .route("/admin/songs", post(songs::create_song))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::moderator_auth,
        ));

    let public = Router::new()
        .route("/queue", get(queue::get_pending))
        .route("/queue/processed", get(queue::get_processed))
        .route("/queue/time-until-end", get(queue::get_time_until_end))
        .route("/queue/entries", post(queue::submit_entry))
        .route("/songs", get(songs::get_songs))
        .route("/songs/search", get(songs::search_songs))
        .route("/songs/:id", get(songs::get_song))
        .merge(api::health_routes());

    Router::new()
        .merge(moderator)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(e.to_string()))
}
