pub mod submit;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(submit::index))
        .route(
            "/submit",
            post(submit::submit)
                .options(submit::preflight)
                .fallback(submit::method_not_allowed),
        )
}
