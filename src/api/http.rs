use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::HealthApi;
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::models::analysis::{Analysis, UploadAnalysis};
use crate::models::kp::KpIndexEntry;
use crate::models::record::{HealthRecord, NewMedicationRecord, NewSymptomRecord, UpdateRecord};
use crate::models::reference::{Medication, NewReferenceEntity, Symptom};

/// REST transport to the backend. All authenticated calls carry the bearer
/// credential obtained externally; the KP endpoints are public.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &Config) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn check_status(response: Response) -> EngineResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(EngineError::Api { status, message })
        }
    }

    async fn expect_json<T: DeserializeOwned>(response: Response) -> EngineResult<T> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }
}

impl HealthApi for HttpApi {
    async fn fetch_records(&self, user_id: &str) -> EngineResult<Vec<HealthRecord>> {
        let request = self
            .client
            .get(self.url(&format!("healthRecords/all/{}", user_id)));
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn fetch_symptoms(&self, user_id: &str) -> EngineResult<Vec<Symptom>> {
        let request = self.client.get(self.url(&format!("symptom/all/{}", user_id)));
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn fetch_medications(&self, user_id: &str) -> EngineResult<Vec<Medication>> {
        let request = self
            .client
            .get(self.url(&format!("medication/all/{}", user_id)));
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn create_symptom_record(&self, record: &NewSymptomRecord) -> EngineResult<HealthRecord> {
        let request = self
            .client
            .post(self.url("healthRecords/symptoms"))
            .json(record);
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn create_medication_record(
        &self,
        record: &NewMedicationRecord,
    ) -> EngineResult<HealthRecord> {
        let request = self
            .client
            .post(self.url("healthRecords/medications"))
            .json(record);
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn update_record(&self, record: &UpdateRecord) -> EngineResult<HealthRecord> {
        let request = self
            .client
            .put(self.url(&format!("healthRecords/{}", record.id)))
            .json(record);
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn delete_record(&self, id: i64) -> EngineResult<()> {
        let request = self.client.delete(self.url(&format!("healthRecords/{}", id)));
        let response = self.authorize(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn create_symptom(&self, entity: &NewReferenceEntity) -> EngineResult<Symptom> {
        let request = self.client.post(self.url("symptom")).json(entity);
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn create_medication(&self, entity: &NewReferenceEntity) -> EngineResult<Medication> {
        let request = self.client.post(self.url("medication")).json(entity);
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn fetch_kp_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<KpIndexEntry>> {
        let response = self
            .client
            .get(self.url("kp-index"))
            .query(&[("start", start.to_string()), ("end", end.to_string())])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    async fn fetch_kp_forecast(&self) -> EngineResult<Vec<KpIndexEntry>> {
        let response = self.client.get(self.url("kp-index/forecast")).send().await?;
        Self::expect_json(response).await
    }

    async fn fetch_analyses(&self, user_id: &str) -> EngineResult<Vec<Analysis>> {
        let request = self
            .client
            .get(self.url(&format!("analysis/user/{}", user_id)));
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn upload_analysis(&self, upload: &UploadAnalysis) -> EngineResult<Analysis> {
        let part = multipart::Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let form = multipart::Form::new()
            .text("title", upload.title.clone())
            .text("recordDate", upload.record_date.to_string())
            .part("file", part);
        let request = self.client.post(self.url("analysis/upload")).multipart(form);
        let response = self.authorize(request).send().await?;
        Self::expect_json(response).await
    }

    async fn delete_analysis(&self, id: i64) -> EngineResult<()> {
        let request = self.client.delete(self.url(&format!("analysis/{}", id)));
        let response = self.authorize(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn download_analysis(&self, id: i64) -> EngineResult<Vec<u8>> {
        let request = self.client.get(self.url(&format!("analysis/file/{}", id)));
        let response = self.authorize(request).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
