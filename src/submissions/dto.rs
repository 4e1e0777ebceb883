use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::schema::{FieldKind, FieldSpec, RequestSchema};

#[derive(Debug, Deserialize)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl RequestSchema for ContactMessageCreate {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::required("email", FieldKind::String),
        FieldSpec::required("message", FieldKind::String),
    ];
}

/// Stored as-is and echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub party_size: Option<i64>,
    pub when: Option<String>, // free text, e.g. "Fri 8pm"
    pub note: Option<String>,
}

impl RequestSchema for BookingCreate {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::optional("email", FieldKind::String),
        FieldSpec::optional("phone", FieldKind::String),
        FieldSpec::optional("party_size", FieldKind::Integer),
        FieldSpec::optional("when", FieldKind::String),
        FieldSpec::optional("note", FieldKind::String),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Received,
}

/// The document written to `bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub status: BookingStatus,
    #[serde(flatten)]
    pub request: BookingCreate,
}

#[derive(Debug, Serialize)]
pub struct BookingReceipt {
    pub id: String,
    pub status: BookingStatus,
}
