use axum::{extract::{Multipart, State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::responses::{ImagePayload, ImageResponse, ImageUploadResponse, UploadedImage};
use crate::domain::models::image::Image;
use std::sync::Arc;
use tracing::info;

const IMAGE_FIELD: &str = "image";

struct UploadedFile {
    name: String,
    content_type: String,
    data: Vec<u8>,
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart.next_field().await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        return Ok(Some(UploadedFile { name, content_type, data: data.to_vec() }));
    }
    Ok(None)
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let file = read_image_field(&mut multipart).await?
        .filter(|file| !file.data.is_empty())
        .ok_or(AppError::BadRequest("No file uploaded".into()))?;

    if !file.content_type.starts_with("image/") {
        return Err(AppError::Validation("Only image files are allowed.".into()));
    }

    let file_url = state.blob_storage.upload(&file.name, &file.content_type, file.data).await?;
    let image = state.image_repo.create(&Image::new(file.name, file_url, file.content_type)).await?;

    info!("Image {} uploaded by {}", image.id, caller.id);

    Ok((StatusCode::CREATED, Json(ImageUploadResponse {
        success: true,
        message: "Image uploaded successfully".into(),
        image: UploadedImage { id: image.id, file_url: image.file_url },
    })))
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let image = state.image_repo.find_by_id(&image_id).await?
        .ok_or(AppError::NotFound("Image not found".into()))?;

    Ok(Json(ImageResponse {
        success: true,
        image: ImagePayload {
            id: image.id,
            name: image.name,
            file_url: image.file_url,
            content_type: image.content_type,
        },
    }))
}
