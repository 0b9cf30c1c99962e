use crate::store::{ObjectMeta, ObjectStore, StoreError};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use chrono::DateTime;
use tokio::runtime::Runtime;
use tracing::debug;

/// S3 bucket read through the AWS SDK.
///
/// The poll loop is synchronous, so each call is driven to completion on a
/// private current-thread runtime.
pub struct S3Store {
    bucket: String,
    client: Client,
    runtime: Runtime,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

fn backend_error<E: std::error::Error>(error: E) -> StoreError {
    StoreError::Backend {
        message: DisplayErrorContext(error).to_string(),
    }
}

impl S3Store {
    /// Build a client from the standard AWS environment (profile, env vars,
    /// instance metadata). `region` overrides the environment's region.
    pub fn connect(bucket: &str, region: Option<&str>) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = runtime.block_on(async {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(aws_config::Region::new(region.to_string()));
            }
            Client::new(&loader.load().await)
        });

        debug!(event = "core.store.s3_connected", bucket = bucket);

        Ok(Self {
            bucket: bucket.to_string(),
            client,
            runtime,
        })
    }
}

impl ObjectStore for S3Store {
    fn describe(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        self.runtime.block_on(async {
            let mut objects = Vec::new();
            let mut continuation: Option<String> = None;

            loop {
                let output = self
                    .client
                    .list_objects_v2()
                    .bucket(&self.bucket)
                    .prefix(prefix)
                    .set_continuation_token(continuation.take())
                    .send()
                    .await
                    .map_err(backend_error)?;

                for object in output.contents() {
                    let Some(key) = object.key() else {
                        continue;
                    };
                    objects.push(ObjectMeta {
                        key: key.to_string(),
                        size: object.size().unwrap_or(0).max(0) as u64,
                        last_modified: object
                            .last_modified()
                            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
                    });
                }

                match output.next_continuation_token() {
                    Some(next) if output.is_truncated() == Some(true) => {
                        continuation = Some(next.to_string());
                    }
                    _ => break,
                }
            }

            objects.sort_by(|a, b| a.key.cmp(&b.key));
            Ok(objects)
        })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.runtime.block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                        StoreError::NotFound {
                            key: key.to_string(),
                        }
                    } else {
                        backend_error(e)
                    }
                })?;

            let data = output.body.collect().await.map_err(backend_error)?;
            Ok(data.into_bytes().to_vec())
        })
    }
}
