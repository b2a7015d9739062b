//! HTTP implementation of [`HrGateway`] against the FastAPI backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use hrsync_core::config::ApiConfig;
use hrsync_core::types::{
    Department, Employee, EmployeeDetail, EmployeeFilters, EmployeeId, SyncExecuteRequest,
    SyncResult, SyncStatusSummary,
};

use crate::{GatewayError, GatewayResult, HrGateway};

/// FastAPI error body: `{"detail": "..."}` (or a validation list)
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> GatewayResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GatewayError::Config("empty base_url".into()));
        }
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> GatewayResult<T> {
        let url = self.url(path);
        debug!(%url, ?query, "GET");
        let response = self.client.get(&url).query(query).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> GatewayResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl HrGateway for HttpGateway {
    async fn list_employees(&self, filters: &EmployeeFilters) -> GatewayResult<Vec<Employee>> {
        self.get("hr/employees", &filters.to_query()).await
    }

    async fn get_employee(&self, id: EmployeeId) -> GatewayResult<EmployeeDetail> {
        self.get(&format!("hr/employees/{id}"), &[]).await
    }

    async fn list_departments(&self) -> GatewayResult<Vec<Department>> {
        self.get("hr/departments", &[]).await
    }

    async fn check_sync(&self) -> GatewayResult<SyncStatusSummary> {
        self.post::<_, ()>("hr/sync/check", None).await
    }

    async fn execute_sync(&self, employee_ids: &[EmployeeId]) -> GatewayResult<SyncResult> {
        let body = SyncExecuteRequest {
            employee_ids: employee_ids.to_vec(),
        };
        self.post("hr/sync/execute", Some(&body)).await
    }
}
