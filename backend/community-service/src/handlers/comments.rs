/// Comment handlers - threaded comment views
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::services::CommentService;

pub struct CommentHandlerState {
    pub comments: Arc<CommentService>,
}

/// Get the threaded comments of a post
pub async fn get_post_comments(
    post_id: web::Path<Uuid>,
    state: web::Data<CommentHandlerState>,
) -> Result<HttpResponse> {
    let thread = state.comments.get_thread(*post_id).await?;
    Ok(HttpResponse::Ok().json(thread))
}
