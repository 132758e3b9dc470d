use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .route("/import", post(import_file))
        .route(
            "/components",
            get(list_components)
                .post(create_component)
                .delete(clear_components),
        )
        .route("/components/merge-duplicates", post(merge_duplicate_components))
        .route("/components/alerts/low-stock", get(low_stock_components))
        .route(
            "/components/:id",
            get(get_component)
                .patch(update_component)
                .delete(delete_component),
        )
        .route("/stats", get(inventory_stats))
}
