//! Fetch command - delegate side of the process protocol
//!
//! Bypasses the cache and always talks to AWS. On success stdout carries
//! exactly one JSON-encoded string; failures exit non-zero.

use crate::cli::args::{FetchArgs, FetchKind};
use crate::config::Config;
use crate::error::LookupResult;
use crate::fetch::{FetchDelegate, OutputRequest, ParameterRequest, SdkDelegate};

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> LookupResult<()> {
    let delegate = SdkDelegate::new(config.aws.clone());

    let value = match args.kind {
        FetchKind::Output {
            account_id,
            region,
            stack_name,
            output_name,
        } => {
            delegate
                .fetch_output(&OutputRequest {
                    account_id,
                    region,
                    stack_name,
                    output_name,
                })
                .await?
        }
        FetchKind::Parameter {
            account_id,
            region,
            parameter_name,
        } => {
            delegate
                .fetch_parameter(&ParameterRequest {
                    account_id,
                    region,
                    parameter_name,
                })
                .await?
        }
    };

    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}
