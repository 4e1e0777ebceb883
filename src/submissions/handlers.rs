use axum::{extract::State, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        Booking, BookingCreate, BookingReceipt, BookingStatus, ContactMessage,
        ContactMessageCreate,
    },
    repo,
};
use crate::{error::AppError, schema::Validated, state::AppState, store::Collection};

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/contact-messages", post(create_contact_message))
        .route("/bookings", post(create_booking))
}

#[instrument(skip(state, payload))]
pub async fn create_contact_message(
    State(state): State<AppState>,
    Validated(payload): Validated<ContactMessageCreate>,
) -> Result<Json<ContactMessage>, AppError> {
    let msg = ContactMessage {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        message: payload.message,
        ts: OffsetDateTime::now_utc(),
    };

    repo::insert(state.store.as_ref(), Collection::ContactMessages, &msg).await?;

    info!(id = %msg.id, "contact message stored");
    Ok(Json(msg))
}

/// Every well-formed booking is accepted; there is no capacity or conflict check.
#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    Validated(payload): Validated<BookingCreate>,
) -> Result<Json<BookingReceipt>, AppError> {
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        status: BookingStatus::Received,
        request: payload,
    };

    repo::insert(state.store.as_ref(), Collection::Bookings, &booking).await?;

    info!(id = %booking.id, party_size = ?booking.request.party_size, "booking received");
    Ok(Json(BookingReceipt {
        id: booking.id,
        status: booking.status,
    }))
}
