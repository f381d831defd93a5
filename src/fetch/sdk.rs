//! In-process AWS SDK delegate

use crate::config::schema::AwsConfig;
use crate::error::{LookupError, LookupResult};
use crate::fetch::role::{self, LookupCredentials};
use crate::fetch::{FetchDelegate, OutputRequest, ParameterRequest};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::describe_stacks::DescribeStacksError;
use aws_sdk_cloudformation::types::Output;
use aws_sdk_ssm::types::Parameter;
use tracing::debug;

/// Resolves values with DescribeStacks / GetParameter
pub struct SdkDelegate {
    aws: AwsConfig,
}

impl SdkDelegate {
    pub fn new(aws: AwsConfig) -> Self {
        Self { aws }
    }

    async fn load_config(&self, region: &str) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = &self.aws.profile {
            loader = loader.profile_name(profile);
        }
        loader.load().await
    }

    async fn session(
        &self,
        account_id: &str,
        region: &str,
    ) -> LookupResult<(SdkConfig, LookupCredentials)> {
        let sdk_config = self.load_config(region).await;
        let credentials =
            role::resolve_credentials(&sdk_config, &self.aws, account_id, region).await?;
        Ok((sdk_config, credentials))
    }
}

#[async_trait]
impl FetchDelegate for SdkDelegate {
    async fn fetch_output(&self, request: &OutputRequest) -> LookupResult<String> {
        let (sdk_config, credentials) = self.session(&request.account_id, &request.region).await?;

        let mut builder = aws_sdk_cloudformation::config::Builder::from(&sdk_config);
        if let Some(creds) = credentials.into_provider() {
            builder = builder.credentials_provider(creds);
        }
        let client = aws_sdk_cloudformation::Client::from_conf(builder.build());

        debug!("DescribeStacks {} in {}", request.stack_name, request.region);
        let response = client
            .describe_stacks()
            .stack_name(&request.stack_name)
            .send()
            .await
            .map_err(|e| describe_stacks_error(&request.stack_name, e))?;

        let stack = response
            .stacks()
            .first()
            .ok_or_else(|| LookupError::StackNotFound(request.stack_name.clone()))?;

        select_output(stack.outputs(), &request.stack_name, &request.output_name)
    }

    async fn fetch_parameter(&self, request: &ParameterRequest) -> LookupResult<String> {
        let (sdk_config, credentials) = self.session(&request.account_id, &request.region).await?;

        let mut builder = aws_sdk_ssm::config::Builder::from(&sdk_config);
        if let Some(creds) = credentials.into_provider() {
            builder = builder.credentials_provider(creds);
        }
        let client = aws_sdk_ssm::Client::from_conf(builder.build());

        debug!("GetParameter {} in {}", request.parameter_name, request.region);
        let response = client
            .get_parameter()
            .name(&request.parameter_name)
            .with_decryption(self.aws.with_decryption)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_parameter_not_found() {
                    LookupError::ParameterNotFound(request.parameter_name.clone())
                } else {
                    LookupError::aws(
                        "GetParameter",
                        aws_sdk_ssm::error::DisplayErrorContext(&service),
                    )
                }
            })?;

        parameter_value(response.parameter(), &request.parameter_name)
    }

    fn delegate_name(&self) -> &'static str {
        "aws-sdk"
    }
}

fn describe_stacks_error(stack_name: &str, err: SdkError<DescribeStacksError>) -> LookupError {
    let service = err.into_service_error();
    // A missing stack comes back as a generic ValidationError
    if service
        .message()
        .is_some_and(|message| message.contains("does not exist"))
    {
        return LookupError::StackNotFound(stack_name.to_string());
    }
    LookupError::aws("DescribeStacks", DisplayErrorContext(&service))
}

fn select_output(outputs: &[Output], stack_name: &str, output_name: &str) -> LookupResult<String> {
    outputs
        .iter()
        .find(|output| output.output_key() == Some(output_name))
        .and_then(|output| output.output_value())
        .map(str::to_string)
        .ok_or_else(|| LookupError::OutputNotFound {
            stack: stack_name.to_string(),
            output: output_name.to_string(),
        })
}

fn parameter_value(parameter: Option<&Parameter>, parameter_name: &str) -> LookupResult<String> {
    parameter
        .and_then(|p| p.value())
        .map(str::to_string)
        .ok_or_else(|| LookupError::ParameterNotFound(parameter_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(key: &str, value: &str) -> Output {
        Output::builder().output_key(key).output_value(value).build()
    }

    #[test]
    fn select_matching_output() {
        let outputs = vec![output("Bucket", "my-bucket"), output("DbUrl", "postgres://db")];
        assert_eq!(
            select_output(&outputs, "app", "DbUrl").unwrap(),
            "postgres://db"
        );
    }

    #[test]
    fn missing_output_names_stack() {
        let outputs = vec![output("Bucket", "my-bucket")];
        let err = select_output(&outputs, "app", "DbUrl").unwrap_err();
        assert_eq!(err.to_string(), "Unable to find output DbUrl in stack app");
    }

    #[test]
    fn output_key_match_is_exact() {
        let outputs = vec![output("dburl", "lower")];
        assert!(select_output(&outputs, "app", "DbUrl").is_err());
    }

    #[test]
    fn parameter_with_value() {
        let parameter = Parameter::builder().name("/app/db").value("secret").build();
        assert_eq!(parameter_value(Some(&parameter), "/app/db").unwrap(), "secret");
    }

    #[test]
    fn parameter_absent() {
        assert!(matches!(
            parameter_value(None, "/app/db"),
            Err(LookupError::ParameterNotFound(name)) if name == "/app/db"
        ));
    }
}
