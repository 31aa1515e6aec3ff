use serde::Serialize;

/// Body of `GET /api/events/{id}`; `source` says whether the cache answered.
#[derive(Serialize)]
pub struct CachedResponse<T> {
    pub source: DataSource,
    pub data: T,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Primary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub id: String,
    pub file_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub id: String,
    pub name: String,
    pub file_url: String,
    pub content_type: String,
}

#[derive(Serialize)]
pub struct ImageUploadResponse {
    pub success: bool,
    pub message: String,
    pub image: UploadedImage,
}

#[derive(Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub image: ImagePayload,
}
