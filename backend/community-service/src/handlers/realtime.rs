/// Realtime handlers - change notifications from the external subscription
use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::error::Result;
use crate::realtime::{ChangeEvent, RealtimeHub};

pub struct RealtimeHandlerState {
    pub hub: Arc<RealtimeHub>,
}

/// Accept a change notification and recompute the affected view
pub async fn post_change_event(
    event: web::Json<ChangeEvent>,
    state: web::Data<RealtimeHandlerState>,
) -> Result<HttpResponse> {
    let receivers = state.hub.handle_change(event.into_inner()).await?;
    Ok(HttpResponse::Accepted().json(serde_json::json!({ "receivers": receivers })))
}
