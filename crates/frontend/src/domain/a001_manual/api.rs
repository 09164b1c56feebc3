use contracts::domain::a001_manual::aggregate::{
    ManualDto, ManualListResponse, ManualResponse, UpdateManualDto,
};
use contracts::domain::a001_manual::query::ManualListQuery;
use contracts::shared::api::{ActionResponse, IdQuery, UploadImageResponse};

use crate::shared::api_utils::Endpoint;
use crate::shared::http::{ApiClient, ApiError, ApiRequest, Transport};

/// Multipart field the upload script reads
pub const IMAGE_FIELD: &str = "image";

pub struct ManualApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn manuals(&self) -> ManualApi<'_, T> {
        ManualApi { client: self }
    }
}

impl<T: Transport> ManualApi<'_, T> {
    pub async fn list(&self, query: &ManualListQuery) -> Result<ManualListResponse, ApiError> {
        self.client
            .request_as(ApiRequest::get(Endpoint::ManualsList).query(query)?)
            .await
    }

    /// Manual with tags, steps and recent history. Also records a view.
    pub async fn get(&self, id: i64) -> Result<ManualResponse, ApiError> {
        self.client
            .request_as(ApiRequest::get(Endpoint::ManualsGet).query(&IdQuery { id })?)
            .await
    }

    pub async fn create(&self, dto: &ManualDto) -> Result<ActionResponse, ApiError> {
        self.client
            .request_as(ApiRequest::post(Endpoint::ManualsCreate).json(dto)?)
            .await
    }

    /// Partial update. A present `steps` or `tags` replaces the stored list.
    pub async fn update(&self, id: i64, dto: &UpdateManualDto) -> Result<ActionResponse, ApiError> {
        let request = ApiRequest::post(Endpoint::ManualsUpdate)
            .query(&IdQuery { id })?
            .json(dto)?;
        self.client.request_as(request).await
    }

    /// Soft delete; only the author or an admin may do this
    pub async fn delete(&self, id: i64) -> Result<ActionResponse, ApiError> {
        self.client
            .request_as(ApiRequest::post(Endpoint::ManualsDelete).query(&IdQuery { id })?)
            .await
    }

    /// Upload a step image as multipart form data
    pub async fn upload_image(&self, file: &web_sys::File) -> Result<UploadImageResponse, ApiError> {
        self.client
            .upload(Endpoint::UploadImage, IMAGE_FIELD, file)
            .await
    }
}
