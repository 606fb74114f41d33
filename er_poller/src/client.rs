use crate::error::FetchError;
use shared::ApiConfig;
use shared::egen::SEOUL;
use std::time::Duration;

/// Rows requested per page. The API caps district result sets well below
/// this times the page count the fetch loop is willing to walk.
pub const NUM_OF_ROWS: u32 = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client over the two E-Gen endpoints. One reused `reqwest::Client`
/// with a bounded timeout; both calls return the raw XML body and leave
/// decoding to the caller.
pub struct EgenClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl EgenClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    /// Realtime resource availability for one district.
    pub async fn fetch_realtime(
        &self,
        district: &str,
        page_no: u32,
    ) -> Result<String, FetchError> {
        let page_no = page_no.to_string();
        let num_of_rows = NUM_OF_ROWS.to_string();
        let response = self
            .http
            .get(&self.config.realtime_url)
            .query(&[
                ("serviceKey", self.config.service_key.as_str()),
                ("STAGE1", SEOUL),
                ("STAGE2", district),
                ("pageNo", page_no.as_str()),
                ("numOfRows", num_of_rows.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// ER announcements for one district. Same shape as the realtime call,
    /// but this endpoint names its region filters Q0/Q1.
    pub async fn fetch_announcements(
        &self,
        district: &str,
        page_no: u32,
    ) -> Result<String, FetchError> {
        let page_no = page_no.to_string();
        let num_of_rows = NUM_OF_ROWS.to_string();
        let response = self
            .http
            .get(&self.config.announcement_url)
            .query(&[
                ("serviceKey", self.config.service_key.as_str()),
                ("Q0", SEOUL),
                ("Q1", district),
                ("pageNo", page_no.as_str()),
                ("numOfRows", num_of_rows.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
