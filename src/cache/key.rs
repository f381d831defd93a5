//! Composite cache keys
//!
//! Every cached value is addressed by a tagged, colon-separated key:
//!
//! | Kind | Format |
//! |------|--------|
//! | Stack output | `cf:<account>:<region>:<stack>:<output>` |
//! | Parameter | `ssm:<account>:<region>:<parameter>` |
//!
//! Account, region and output name never contain `:`. Stack and parameter
//! names may (the APIs accept ARNs), which is why they sit where the split is
//! still unambiguous: the stack name is everything between the region and the
//! last separator, the parameter name is the whole remainder.

use crate::error::{LookupError, LookupResult};
use serde::Serialize;
use std::fmt;

const SEPARATOR: char = ':';

/// Type tag distinguishing lookup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// CloudFormation stack output
    StackOutput,
    /// SSM parameter
    Parameter,
}

impl KeyKind {
    /// Prefix written at the start of the key
    pub fn tag(&self) -> &'static str {
        match self {
            KeyKind::StackOutput => "cf",
            KeyKind::Parameter => "ssm",
        }
    }
}

/// Structured form of a cache key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompositeKey {
    StackOutput {
        account_id: String,
        region: String,
        stack_name: String,
        output_name: String,
    },
    Parameter {
        account_id: String,
        region: String,
        parameter_name: String,
    },
}

impl CompositeKey {
    /// Key for a stack output, rejecting components that would break parsing
    pub fn stack_output(
        account_id: &str,
        region: &str,
        stack_name: &str,
        output_name: &str,
    ) -> LookupResult<Self> {
        check_segment("account id", account_id)?;
        check_segment("region", region)?;
        check_non_empty("stack name", stack_name)?;
        check_segment("output name", output_name)?;

        Ok(Self::StackOutput {
            account_id: account_id.to_string(),
            region: region.to_string(),
            stack_name: stack_name.to_string(),
            output_name: output_name.to_string(),
        })
    }

    /// Key for an SSM parameter
    pub fn parameter(account_id: &str, region: &str, parameter_name: &str) -> LookupResult<Self> {
        check_segment("account id", account_id)?;
        check_segment("region", region)?;
        check_non_empty("parameter name", parameter_name)?;

        Ok(Self::Parameter {
            account_id: account_id.to_string(),
            region: region.to_string(),
            parameter_name: parameter_name.to_string(),
        })
    }

    /// Parse a key string back into its components.
    ///
    /// Returns `None` for keys this tool did not write.
    pub fn parse(key: &str) -> Option<Self> {
        let (tag, rest) = key.split_once(SEPARATOR)?;
        let (account_id, rest) = rest.split_once(SEPARATOR)?;
        let (region, rest) = rest.split_once(SEPARATOR)?;

        if tag == KeyKind::StackOutput.tag() {
            let (stack_name, output_name) = rest.rsplit_once(SEPARATOR)?;
            Self::stack_output(account_id, region, stack_name, output_name).ok()
        } else if tag == KeyKind::Parameter.tag() {
            Self::parameter(account_id, region, rest).ok()
        } else {
            None
        }
    }

    /// Lookup kind of this key
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::StackOutput { .. } => KeyKind::StackOutput,
            Self::Parameter { .. } => KeyKind::Parameter,
        }
    }

    pub fn account_id(&self) -> &str {
        match self {
            Self::StackOutput { account_id, .. } | Self::Parameter { account_id, .. } => account_id,
        }
    }

    pub fn region(&self) -> &str {
        match self {
            Self::StackOutput { region, .. } | Self::Parameter { region, .. } => region,
        }
    }

    /// Logical name being resolved, qualified by stack for outputs
    pub fn display_name(&self) -> String {
        match self {
            Self::StackOutput {
                stack_name,
                output_name,
                ..
            } => format!("{}/{}", stack_name, output_name),
            Self::Parameter { parameter_name, .. } => parameter_name.clone(),
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOutput {
                account_id,
                region,
                stack_name,
                output_name,
            } => write!(
                f,
                "{tag}{s}{account_id}{s}{region}{s}{stack_name}{s}{output_name}",
                tag = KeyKind::StackOutput.tag(),
                s = SEPARATOR,
            ),
            Self::Parameter {
                account_id,
                region,
                parameter_name,
            } => write!(
                f,
                "{tag}{s}{account_id}{s}{region}{s}{parameter_name}",
                tag = KeyKind::Parameter.tag(),
                s = SEPARATOR,
            ),
        }
    }
}

fn check_non_empty(field: &'static str, value: &str) -> LookupResult<()> {
    if value.is_empty() {
        return Err(LookupError::InvalidKeyComponent {
            field,
            value: value.to_string(),
            reason: "must not be empty",
        });
    }
    Ok(())
}

fn check_segment(field: &'static str, value: &str) -> LookupResult<()> {
    check_non_empty(field, value)?;
    if value.contains(SEPARATOR) {
        return Err(LookupError::InvalidKeyComponent {
            field,
            value: value.to_string(),
            reason: "must not contain ':'",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_output_key_format() {
        let key = CompositeKey::stack_output("123", "us-east-1", "myStack", "someOutput").unwrap();
        assert_eq!(key.to_string(), "cf:123:us-east-1:myStack:someOutput");
        assert_eq!(key.kind(), KeyKind::StackOutput);
    }

    #[test]
    fn parameter_key_format() {
        let key = CompositeKey::parameter("123", "eu-west-1", "/app/db/url").unwrap();
        assert_eq!(key.to_string(), "ssm:123:eu-west-1:/app/db/url");
    }

    #[test]
    fn construction_is_deterministic() {
        let a = CompositeKey::stack_output("1", "r", "s", "o").unwrap().to_string();
        let b = CompositeKey::stack_output("1", "r", "s", "o").unwrap().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_tuples_never_collide() {
        let tuples = [
            ("123", "us-east-1", "app", "url"),
            ("123", "us-east-1", "app", "urls"),
            ("123", "us-east-1", "app-url", "x"),
            ("123", "us-east-2", "app", "url"),
            ("124", "us-east-1", "app", "url"),
            ("123", "us-east-1", "arn:aws:cloudformation:us-east-1:123:stack/app/1", "url"),
            ("123", "us-east-1", "arn:aws:cloudformation:us-east-1:123:stack/app", "1:url"),
        ];

        let mut seen = std::collections::HashSet::new();
        for (account, region, stack, output) in tuples {
            if let Ok(key) = CompositeKey::stack_output(account, region, stack, output) {
                assert!(seen.insert(key.to_string()), "collision for {key}");
            }
        }
        assert_eq!(seen.len(), tuples.len() - 1);
    }

    #[test]
    fn output_and_parameter_keys_never_collide() {
        let output = CompositeKey::stack_output("123", "us-east-1", "stack", "name").unwrap();
        let param = CompositeKey::parameter("123", "us-east-1", "stack:name").unwrap();
        assert_ne!(output.to_string(), param.to_string());
    }

    #[test]
    fn rejects_separator_in_fixed_segments() {
        assert!(CompositeKey::stack_output("1:2", "r", "s", "o").is_err());
        assert!(CompositeKey::stack_output("1", "r:x", "s", "o").is_err());
        assert!(CompositeKey::stack_output("1", "r", "s", "o:p").is_err());
        assert!(CompositeKey::parameter("1", "", "p").is_err());
        assert!(CompositeKey::parameter("1", "r", "").is_err());
    }

    #[test]
    fn parse_recovers_components() {
        let stack = "arn:aws:cloudformation:us-east-1:123:stack/app/abc";
        let key = CompositeKey::stack_output("123", "us-east-1", stack, "dbUrl").unwrap();
        assert_eq!(CompositeKey::parse(&key.to_string()), Some(key));

        let key = CompositeKey::parameter("123", "us-east-1", "arn:aws:ssm:x:y:parameter/p").unwrap();
        assert_eq!(CompositeKey::parse(&key.to_string()), Some(key));
    }

    #[test]
    fn parse_rejects_foreign_keys() {
        assert_eq!(CompositeKey::parse("123:us-east-1:myStack:someOutput"), None);
        assert_eq!(CompositeKey::parse("vpc-provider:account=1"), None);
        assert_eq!(CompositeKey::parse("cf:123:us-east-1"), None);
    }
}
