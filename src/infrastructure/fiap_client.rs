// FIAP storage client implementation
use crate::application::point_data_retriever::{LivenessChecker, PointDataRetriever};
use crate::domain::point::RetrievalOutcome;
use crate::infrastructure::fiap_xml::{build_query_envelope, parse_query_response, QueryKey, Select};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::header;
use uuid::Uuid;

const SOAP_ACTION: &str = "http://soap.fiap.org/query";

#[derive(Debug, Clone)]
pub struct FiapClient {
    connection_url: String,
    client: reqwest::Client,
}

impl FiapClient {
    pub fn new(connection_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            connection_url,
            client,
        })
    }

    /// Send one storage query, one key per point id. Cursors are not followed.
    async fn execute_query(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
        select: Option<Select>,
    ) -> Result<RetrievalOutcome> {
        let keys: Vec<QueryKey<'_>> = point_ids
            .iter()
            .map(|id| QueryKey {
                point_id: id,
                gteq: from,
                lteq: until,
                select,
            })
            .collect();
        let query_id = Uuid::new_v4().to_string();
        let envelope = build_query_envelope(&query_id, &keys);

        tracing::debug!("Sending FIAP query {} to {}", query_id, self.connection_url);
        let response = self
            .client
            .post(&self.connection_url)
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(envelope)
            .send()
            .await
            .context("Failed to send request to FIAP storage")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("FIAP query failed with status {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read FIAP storage response")?;

        parse_query_response(&body)
    }
}

#[async_trait]
impl PointDataRetriever for FiapClient {
    async fn fetch_date_range(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> Result<RetrievalOutcome> {
        self.execute_query(from, until, point_ids, None).await
    }

    async fn fetch_latest(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> Result<RetrievalOutcome> {
        self.execute_query(from, until, point_ids, Some(Select::Maximum))
            .await
    }

    async fn fetch_oldest(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> Result<RetrievalOutcome> {
        self.execute_query(from, until, point_ids, Some(Select::Minimum))
            .await
    }
}

#[async_trait]
impl LivenessChecker for FiapClient {
    async fn probe(&self) -> Result<u16> {
        tracing::info!("Start to check health of {}", self.connection_url);
        let response = self
            .client
            .head(&self.connection_url)
            .send()
            .await
            .context("Failed to reach FIAP storage")?;

        Ok(response.status().as_u16())
    }
}
