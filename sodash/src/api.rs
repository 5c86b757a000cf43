//! Minimal HTTP client helpers for requesting telemetry from the backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::PollError;

pub const CPU: &str = "api/cpu";
pub const MEMORY: &str = "api/memory";
pub const PROCESSES: &str = "api/processes";
pub const FILESYSTEM: &str = "api/filesystem";

pub fn process_io(pid: u32) -> String {
    format!("api/process/{pid}/io")
}

pub fn directory(path: &str) -> String {
    let q: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("api/filesystem/directory?path={q}")
}

/// Cheap to clone; every card holds its own copy of the same pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self, PollError> {
        // Paths are joined relative to the base, so keep a trailing slash
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| PollError::Transport(e.to_string()))?;
        Ok(Self { base, http })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, PollError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// GET `path` and decode the body. Non-2xx responses are errors.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, PollError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_to_base_path() {
        let c = ApiClient::new("http://host:5000/dash").unwrap();
        assert_eq!(
            c.endpoint(CPU).unwrap().as_str(),
            "http://host:5000/dash/api/cpu"
        );
        let c = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            c.endpoint("/api/memory").unwrap().as_str(),
            "http://localhost:5000/api/memory"
        );
    }

    #[test]
    fn directory_path_is_encoded() {
        assert_eq!(
            directory("/home/a b"),
            "api/filesystem/directory?path=%2Fhome%2Fa+b"
        );
        assert_eq!(process_io(42), "api/process/42/io");
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(PollError::InvalidUrl(_))
        ));
    }
}
