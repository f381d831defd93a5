//! Stack output resolver

use super::{resolve_cached, LookupTarget};
use crate::cache::{CacheStore, CompositeKey};
use crate::error::LookupResult;
use crate::fetch::{FetchDelegate, OutputRequest};
use std::sync::Arc;

/// Resolves outputs of one deployed stack
pub struct StackOutputResolver {
    target: LookupTarget,
    stack_name: String,
    store: CacheStore,
    delegate: Arc<dyn FetchDelegate>,
}

impl StackOutputResolver {
    pub fn new(
        target: LookupTarget,
        stack_name: impl Into<String>,
        store: CacheStore,
        delegate: Arc<dyn FetchDelegate>,
    ) -> Self {
        Self {
            target,
            stack_name: stack_name.into(),
            store,
            delegate,
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    /// Look up the value of a stack output, fetching it on a cache miss
    pub async fn lookup_output(&self, output_name: &str) -> LookupResult<String> {
        let key = CompositeKey::stack_output(
            &self.target.account_id,
            &self.target.region,
            &self.stack_name,
            output_name,
        )?;

        resolve_cached(&self.store, &key, move || async move {
            let request = OutputRequest {
                account_id: self.target.account_id.clone(),
                region: self.target.region.clone(),
                stack_name: self.stack_name.clone(),
                output_name: output_name.to_string(),
            };
            self.delegate.fetch_output(&request).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::resolver::testing::RecordingDelegate;
    use tempfile::TempDir;

    fn resolver(delegate: Arc<RecordingDelegate>, store: CacheStore) -> StackOutputResolver {
        StackOutputResolver::new(
            LookupTarget::new("123", "us-east-1"),
            "myStack",
            store,
            delegate,
        )
    }

    fn read_json(store: &CacheStore) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn returns_cached_value_without_fetching() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("cdk8s.context.json"));
        std::fs::write(
            store.path(),
            r#"{"cf:123:us-east-1:myStack:someOutput": "mockValue"}"#,
        )
        .unwrap();
        let delegate = Arc::new(RecordingDelegate::returning("unused"));

        let value = resolver(delegate.clone(), store)
            .lookup_output("someOutput")
            .await
            .unwrap();

        assert_eq!(value, "mockValue");
        assert!(delegate.calls().is_empty());
    }

    #[tokio::test]
    async fn miss_fetches_once_and_persists() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("cdk8s.context.json"));
        std::fs::write(store.path(), "{}").unwrap();
        let delegate = Arc::new(RecordingDelegate::returning("newValue"));

        let value = resolver(delegate.clone(), store.clone())
            .lookup_output("newOutput")
            .await
            .unwrap();

        assert_eq!(value, "newValue");
        assert_eq!(
            delegate.calls(),
            vec![vec!["123", "us-east-1", "myStack", "newOutput"]]
        );
        assert_eq!(
            read_json(&store)["cf:123:us-east-1:myStack:newOutput"],
            "newValue"
        );
    }

    #[tokio::test]
    async fn second_lookup_is_a_cache_hit() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("cdk8s.context.json"));
        let delegate = Arc::new(RecordingDelegate::returning("v"));
        let resolver = resolver(delegate.clone(), store);

        assert_eq!(resolver.lookup_output("out").await.unwrap(), "v");
        assert_eq!(resolver.lookup_output("out").await.unwrap(), "v");
        assert_eq!(delegate.calls().len(), 1);
    }

    #[tokio::test]
    async fn absent_cache_file_is_created() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("cdk8s.context.json"));
        assert!(!store.path().exists());

        let delegate = Arc::new(RecordingDelegate::returning("v"));
        resolver(delegate, store.clone())
            .lookup_output("out")
            .await
            .unwrap();

        assert_eq!(read_json(&store)["cf:123:us-east-1:myStack:out"], "v");
    }

    #[tokio::test]
    async fn fetch_error_propagates_and_nothing_is_cached() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("cdk8s.context.json"));
        let delegate = Arc::new(RecordingDelegate::failing());

        let err = resolver(delegate.clone(), store.clone())
            .lookup_output("missing")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::OutputNotFound { .. }));
        assert_eq!(delegate.calls().len(), 1);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn invalid_output_name_rejected_before_fetch() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("cdk8s.context.json"));
        let delegate = Arc::new(RecordingDelegate::returning("v"));

        let err = resolver(delegate.clone(), store)
            .lookup_output("bad:name")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::InvalidKeyComponent { .. }));
        assert!(delegate.calls().is_empty());
    }
}
