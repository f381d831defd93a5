//! Lookup role assumption with ambient-identity fallback
//!
//! Lookups first try the cross-account lookup role created by CDK bootstrap.
//! When that fails the ambient credentials are used, but only if they belong
//! to the requested account.

use crate::config::schema::AwsConfig;
use crate::error::{LookupError, LookupResult};
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_sdk_sts::error::DisplayErrorContext;
use std::time::SystemTime;
use tracing::{debug, warn};

const PROVIDER_NAME: &str = "stack-lookup-role";

/// Expand the role ARN template for an account and region
pub fn lookup_role_arn(template: &str, account_id: &str, region: &str) -> String {
    template
        .replace("{account}", account_id)
        .replace("{region}", region)
}

/// Credentials to use for a lookup
#[derive(Debug, Clone)]
pub enum LookupCredentials {
    /// Temporary credentials from the lookup role
    AssumedRole(Credentials),
    /// The caller's own credentials, verified to be in the target account
    Ambient,
}

impl LookupCredentials {
    /// Explicit credentials to install on a client, if any
    pub fn into_provider(self) -> Option<Credentials> {
        match self {
            Self::AssumedRole(creds) => Some(creds),
            Self::Ambient => None,
        }
    }
}

/// Resolve credentials for `account_id`, falling back to the ambient identity
pub async fn resolve_credentials(
    sdk_config: &SdkConfig,
    aws: &AwsConfig,
    account_id: &str,
    region: &str,
) -> LookupResult<LookupCredentials> {
    let sts = aws_sdk_sts::Client::new(sdk_config);
    let role_arn = lookup_role_arn(&aws.role_arn_template, account_id, region);

    match assume_role(&sts, &role_arn, &aws.session_name).await {
        Ok(creds) => {
            debug!("Assumed lookup role {}", role_arn);
            return Ok(LookupCredentials::AssumedRole(creds));
        }
        Err(e) => warn!("Failed to assume role: {}. Error: {}", role_arn, e),
    }

    let identity = sts
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| LookupError::aws("GetCallerIdentity", DisplayErrorContext(&e)))?;

    check_ambient_account(account_id, identity.account())?;
    warn!(
        "Unable to assume default AWS CDK lookup role. Credentials are for the same account, proceeding with the lookup"
    );
    Ok(LookupCredentials::Ambient)
}

async fn assume_role(
    sts: &aws_sdk_sts::Client,
    role_arn: &str,
    session_name: &str,
) -> LookupResult<Credentials> {
    let response = sts
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(session_name)
        .send()
        .await
        .map_err(|e| LookupError::aws("AssumeRole", DisplayErrorContext(&e)))?;

    let creds = response
        .credentials()
        .ok_or_else(|| LookupError::Aws("AssumeRole returned no credentials".to_string()))?;

    Ok(Credentials::new(
        creds.access_key_id(),
        creds.secret_access_key(),
        Some(creds.session_token().to_string()),
        SystemTime::try_from(*creds.expiration()).ok(),
        PROVIDER_NAME,
    ))
}

/// Ambient credentials are only usable in the account they belong to
fn check_ambient_account(requested: &str, actual: Option<&str>) -> LookupResult<()> {
    match actual {
        Some(actual) if actual == requested => Ok(()),
        other => Err(LookupError::IdentityMismatch {
            requested: requested.to_string(),
            actual: other.unwrap_or("unknown").to_string(),
        }),
    }
}
