use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::app::ports::{CatalogError, CatalogPage, CatalogSource};

const DEFAULT_PAGE_SIZE: u32 = 100;

/// Glue catalog access through the `aws` command line tool.
///
/// Credentials, SSO sessions and endpoint overrides are whatever the local
/// CLI is configured with; `--profile` only picks among them.
pub struct AwsCliCatalog {
    region: String,
    profile: Option<String>,
    timeout_secs: u64,
    page_size: u32,
}

impl AwsCliCatalog {
    pub fn new(region: impl Into<String>, profile: Option<String>) -> Self {
        Self {
            region: region.into(),
            profile,
            timeout_secs: 60,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    fn base_args(&self, service: &str, operation: &str) -> Vec<String> {
        let mut args = vec![
            service.to_string(),
            operation.to_string(),
            "--region".to_string(),
            self.region.clone(),
            "--output".to_string(),
            "json".to_string(),
        ];
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args
    }

    fn paged_args(&self, mut args: Vec<String>, next_token: Option<String>) -> Vec<String> {
        args.push("--max-items".to_string());
        args.push(self.page_size.to_string());
        if let Some(token) = next_token {
            args.push("--starting-token".to_string());
            args.push(token);
        }
        args
    }

    fn database_args(&self, next_token: Option<String>) -> Vec<String> {
        self.paged_args(self.base_args("glue", "get-databases"), next_token)
    }

    fn table_args(&self, database_name: &str, next_token: Option<String>) -> Vec<String> {
        let mut args = self.base_args("glue", "get-tables");
        args.push("--database-name".to_string());
        args.push(database_name.to_string());
        self.paged_args(args, next_token)
    }

    async fn run(&self, args: &[String]) -> Result<String, CatalogError> {
        tracing::debug!(args = ?args, "running aws cli");

        let mut child = Command::new("aws")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CatalogError::CommandNotFound(format!("aws: {}", e)))?;

        // Drain both pipes before wait() so a chatty child cannot block
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let (status, stdout, stderr) = timeout(Duration::from_secs(self.timeout_secs), async {
            let (stdout_result, stderr_result) = tokio::join!(
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut out) = stdout_handle {
                        out.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut err) = stderr_handle {
                        err.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                }
            );

            let stdout = stdout_result?;
            let stderr = stderr_result?;
            let status = child.wait().await?;

            Ok::<_, std::io::Error>((status, stdout, stderr))
        })
        .await
        .map_err(|_| CatalogError::Timeout)?
        .map_err(|e| CatalogError::CommandFailed(e.to_string()))?;

        if !status.success() {
            return Err(CatalogError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(stdout)
    }

    fn parse_page(json: &str, list_key: &str) -> Result<CatalogPage, CatalogError> {
        let trimmed = json.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(CatalogPage::default());
        }

        let value: Value =
            serde_json::from_str(trimmed).map_err(|e| CatalogError::InvalidJson(e.to_string()))?;

        let items = match value.get(list_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(CatalogError::InvalidJson(format!(
                    "{} is not an array",
                    list_key
                )));
            }
        };
        let next_token = value
            .get("NextToken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(CatalogPage { items, next_token })
    }

    fn parse_account(json: &str) -> Result<String, CatalogError> {
        let value: Value =
            serde_json::from_str(json.trim()).map_err(|e| CatalogError::InvalidJson(e.to_string()))?;
        value
            .get("Account")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CatalogError::InvalidJson("missing Account in caller identity".to_string()))
    }
}

#[async_trait]
impl CatalogSource for AwsCliCatalog {
    async fn account_id(&self) -> Result<String, CatalogError> {
        let stdout = self.run(&self.base_args("sts", "get-caller-identity")).await?;
        Self::parse_account(&stdout)
    }

    async fn get_databases(&self, next_token: Option<String>) -> Result<CatalogPage, CatalogError> {
        let stdout = self.run(&self.database_args(next_token)).await?;
        Self::parse_page(&stdout, "DatabaseList")
    }

    async fn get_tables(
        &self,
        database_name: &str,
        next_token: Option<String>,
    ) -> Result<CatalogPage, CatalogError> {
        let stdout = self.run(&self.table_args(database_name, next_token)).await?;
        Self::parse_page(&stdout, "TableList")
    }
}
