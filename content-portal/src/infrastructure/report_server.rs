use async_trait::async_trait;
use domain_publication::{model::entity::PublicationRequest, service::PostProcessAction};
use typed_builder::TypedBuilder;

/// Asks the BI report server to pick up the freshly promoted artifacts.
#[derive(TypedBuilder)]
pub struct ReportServerRefreshAction {
    #[builder(default)]
    client: reqwest::Client,
    refresh_url: url::Url,
}

#[async_trait]
impl PostProcessAction for ReportServerRefreshAction {
    fn name(&self) -> &str {
        "refresh-report-server"
    }

    async fn execute(&self, request: &PublicationRequest) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.refresh_url.clone())
            .json(&serde_json::json!({
                "rootContentItemId": request.root_content_item_id,
                "publicationRequestId": request.id,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("report server refresh returned {}", response.status());
        }
        Ok(())
    }
}
