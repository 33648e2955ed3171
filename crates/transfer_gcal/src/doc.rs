// File: crates/transfer_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use transfer_common::booking::BookingResponse;
use utoipa::OpenApi;

#[utoipa::path(
    post,
    path = "/create-booking",
    request_body(content = serde_json::Value, description = "Booking form fields", example = json!({
        "name": "Ana Silva",
        "meetingLocation": "Vila do Conde",
        "destination": "Aeroporto OPO",
        "dateTime": "2025-06-01T10:00",
        "phone": "351912345678",
        "numberOfBags": "1",
        "passageiros": "2",
        "requestId": "6f1c2a9e-0b7d-4c55-9e3a-2d4b8f7a1c00"
    })),
    responses(
        (status = 200, description = "Booking created", body = BookingResponse,
         example = json!({
             "success": true,
             "message": "Booking created successfully",
             "eventId": "tr6f1c2a9e0b7d4c559e3a2d4b8f7a1c00",
             "eventLink": "https://www.google.com/calendar/event?eid=..."
         })
        ),
        (status = 400, description = "Missing or invalid fields", body = BookingResponse,
         example = json!({
             "success": false,
             "error": "Missing required fields",
             "missingFields": ["name", "phone"]
         })
        ),
        (status = 405, description = "Method not allowed", body = BookingResponse,
         example = json!({ "success": false, "error": "Method not allowed" })
        ),
        (status = 500, description = "Calendar error", body = BookingResponse,
         example = json!({ "success": false, "error": "Failed to create booking" })
        )
    )
)]
#[allow(dead_code)]
fn doc_create_booking_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_create_booking_handler),
    components(schemas(BookingResponse)),
    tags(
        (name = "booking", description = "Transfer booking API")
    ),
    servers(
        (url = "/api", description = "Transfer booking API server")
    )
)]
pub struct BookingApiDoc;
