use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use super::{
    dto::{Assets, ItemsResponse, MenuItem, Review, Special, TimelineEvent, Video},
    repo,
};
use crate::{error::AppError, state::AppState, store::Collection};

// Upper bounds on a single list read. Callers see the same shape either way.
const MENU_FETCH_CAP: usize = 1000;
const CHEFS_CHOICE_FETCH_CAP: usize = 100;
const REVIEWS_FETCH_CAP: usize = 1000;
const TIMELINE_FETCH_CAP: usize = 1000;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/chefs-choice", get(get_chefs_choice))
        .route("/special", get(get_special))
        .route("/reviews", get(get_reviews))
        .route("/timeline", get(get_timeline))
        .route("/video", get(get_video))
        .route("/assets", get(get_assets))
}

#[instrument(skip(state))]
pub async fn get_menu(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<MenuItem>>, AppError> {
    let items = repo::list(state.store.as_ref(), Collection::MenuItems, MENU_FETCH_CAP).await?;
    debug!(count = items.len(), "menu loaded");
    Ok(Json(ItemsResponse { items }))
}

#[instrument(skip(state))]
pub async fn get_chefs_choice(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<MenuItem>>, AppError> {
    let items = repo::list(
        state.store.as_ref(),
        Collection::ChefsChoice,
        CHEFS_CHOICE_FETCH_CAP,
    )
    .await?;
    Ok(Json(ItemsResponse { items }))
}

#[instrument(skip(state))]
pub async fn get_special(State(state): State<AppState>) -> Result<Json<Special>, AppError> {
    repo::singleton(state.store.as_ref(), Collection::Specials)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Special not set"))
}

#[instrument(skip(state))]
pub async fn get_reviews(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Review>>, AppError> {
    let items = repo::list(state.store.as_ref(), Collection::Reviews, REVIEWS_FETCH_CAP).await?;
    Ok(Json(ItemsResponse { items }))
}

/// Events come back in insertion order; the frontend sorts for display.
#[instrument(skip(state))]
pub async fn get_timeline(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<TimelineEvent>>, AppError> {
    let items = repo::list(state.store.as_ref(), Collection::Timeline, TIMELINE_FETCH_CAP).await?;
    Ok(Json(ItemsResponse { items }))
}

#[instrument(skip(state))]
pub async fn get_video(State(state): State<AppState>) -> Result<Json<Video>, AppError> {
    repo::singleton(state.store.as_ref(), Collection::Video)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Video not set"))
}

#[instrument(skip(state))]
pub async fn get_assets(State(state): State<AppState>) -> Result<Json<Assets>, AppError> {
    repo::singleton(state.store.as_ref(), Collection::Assets)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Assets not set"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        app::build_app,
        seed::seed_if_empty,
        state::AppState,
        store::{Collection, DocumentStore},
        testing::{get_json, BrokenStore},
    };

    async fn seeded() -> AppState {
        let state = AppState::fake();
        seed_if_empty(state.store.as_ref()).await.unwrap();
        state
    }

    #[tokio::test]
    async fn menu_covers_every_category() {
        let app = build_app(seeded().await);
        let (status, body) = get_json(app, "/api/menu").await;
        assert_eq!(status, StatusCode::OK);

        let items = body["items"].as_array().unwrap();
        assert!(items.len() > 5);
        let categories: BTreeSet<&str> =
            items.iter().map(|i| i["category"].as_str().unwrap()).collect();
        assert_eq!(
            categories,
            BTreeSet::from(["classic", "specials", "sides", "drinks", "desserts"])
        );
        assert!(items.iter().all(|i| i["id"].as_str().is_some_and(|s| !s.is_empty())));
    }

    #[tokio::test]
    async fn chefs_choice_has_at_least_three() {
        let (status, body) = get_json(build_app(seeded().await), "/api/chefs-choice").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["items"].as_array().unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn special_is_served_when_present() {
        let (status, body) = get_json(build_app(seeded().await), "/api/special").await;
        assert_eq!(status, StatusCode::OK);
        for key in ["name", "price", "img"] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn singletons_are_not_found_when_absent() {
        let app = build_app(AppState::fake());
        for (path, detail) in [
            ("/api/special", "Special not set"),
            ("/api/video", "Video not set"),
            ("/api/assets", "Assets not set"),
        ] {
            let (status, body) = get_json(app.clone(), path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body["detail"], detail);
        }
    }

    #[tokio::test]
    async fn empty_lists_are_not_errors() {
        let app = build_app(AppState::fake());
        for path in ["/api/menu", "/api/chefs-choice", "/api/reviews", "/api/timeline"] {
            let (status, body) = get_json(app.clone(), path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, json!({"items": []}));
        }
    }

    #[tokio::test]
    async fn reviews_include_customers_and_bloggers() {
        let (status, body) = get_json(build_app(seeded().await), "/api/reviews").await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert!(items.len() >= 4);
        let kinds: BTreeSet<&str> = items.iter().map(|i| i["type"].as_str().unwrap()).collect();
        assert!(kinds.contains("customer") && kinds.contains("blogger"));
        assert!(items
            .iter()
            .all(|i| (1..=5).contains(&i["rating"].as_u64().unwrap())));
    }

    #[tokio::test]
    async fn timeline_is_returned_in_stored_order() {
        let (status, body) = get_json(build_app(seeded().await), "/api/timeline").await;
        assert_eq!(status, StatusCode::OK);
        let years: Vec<i64> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["year"].as_i64().unwrap())
            .collect();
        assert!(years.len() >= 4);
        // The seed set happens to be ascending; the handler itself never sorts.
        assert!(years.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn timeline_does_not_reorder_out_of_order_inserts() {
        let state = AppState::fake();
        state
            .store
            .insert_many(
                Collection::Timeline,
                vec![
                    json!({"year": 2024, "title": "b", "text": "", "img": ""}),
                    json!({"year": 2015, "title": "a", "text": "", "img": ""}),
                ],
            )
            .await
            .unwrap();
        let (_, body) = get_json(build_app(state), "/api/timeline").await;
        assert_eq!(body["items"][0]["year"], 2024);
        assert_eq!(body["items"][1]["year"], 2015);
    }

    #[tokio::test]
    async fn video_and_assets_come_from_seed() {
        let app = build_app(seeded().await);
        let (status, body) = get_json(app.clone(), "/api/video").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["url"].as_str().unwrap().contains("youtube"));

        let (status, body) = get_json(app, "/api/assets").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["menu_pdf_url"].as_str().is_some());
    }

    #[tokio::test]
    async fn wire_shape_drops_undeclared_fields_and_defaults_review_type() {
        let state = AppState::fake();
        state
            .store
            .insert_one(
                Collection::Reviews,
                json!({
                    "id": "r1",
                    "name": "N",
                    "rating": 4,
                    "text": "t",
                    "avatar": "a",
                    "internal": true
                }),
            )
            .await
            .unwrap();
        let (_, body) = get_json(build_app(state), "/api/reviews").await;
        let review = &body["items"][0];
        assert_eq!(review["type"], "customer");
        assert!(review.get("internal").is_none());
    }

    #[tokio::test]
    async fn unfamiliar_category_and_review_type_pass_through() {
        let state = AppState::fake();
        state
            .store
            .insert_one(
                Collection::MenuItems,
                json!({
                    "id": "m1",
                    "name": "Penne Arrabbiata",
                    "price": 320,
                    "category": "pasta",
                    "img": "",
                    "desc": ""
                }),
            )
            .await
            .unwrap();
        state
            .store
            .insert_one(
                Collection::Reviews,
                json!({
                    "id": "r1",
                    "name": "Food Critic",
                    "rating": 7,
                    "text": "t",
                    "avatar": "a",
                    "type": "critic"
                }),
            )
            .await
            .unwrap();
        let app = build_app(state);

        let (status, body) = get_json(app.clone(), "/api/menu").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["category"], "pasta");

        let (status, body) = get_json(app, "/api/reviews").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["type"], "critic");
        assert_eq!(body["items"][0]["rating"], 7);
    }

    #[tokio::test]
    async fn documents_without_id_get_one_on_read() {
        let state = AppState::fake();
        state
            .store
            .insert_one(
                Collection::ChefsChoice,
                json!({
                    "name": "Keema Pav",
                    "price": 180,
                    "category": "classic",
                    "img": "",
                    "desc": ""
                }),
            )
            .await
            .unwrap();
        let (status, body) = get_json(build_app(state), "/api/chefs-choice").await;
        assert_eq!(status, StatusCode::OK);
        let id = body["items"][0]["id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn video_caption_is_null_when_not_stored() {
        let state = AppState::fake();
        state
            .store
            .insert_one(Collection::Video, json!({"url": "https://www.youtube.com/embed/x"}))
            .await
            .unwrap();
        let (status, body) = get_json(build_app(state), "/api/video").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://www.youtube.com/embed/x");
        assert!(body["caption"].is_null());
        assert!(body.get("caption").is_some());
    }

    #[tokio::test]
    async fn store_failure_is_a_generic_server_error() {
        let app = build_app(AppState::from_parts(
            std::sync::Arc::new(BrokenStore),
            AppState::fake().config,
        ));
        let (status, body) = get_json(app, "/api/menu").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Internal Server Error");
    }
}
