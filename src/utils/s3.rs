use aws_config::BehaviorVersion;
use aws_config::ConfigLoader;
use aws_sdk_s3::Client as S3Client;
use aws_types::region::Region;

/// Build the S3 client from the ambient AWS environment. `AWS_ENDPOINT_URL`
/// points the client at MinIO or LocalStack in local setups.
pub async fn create_s3_client() -> S3Client {
    let mut loader = ConfigLoader::default()
        .region(std::env::var("AWS_REGION").ok().map(Region::new))
        .behavior_version(BehaviorVersion::latest());

    if let Ok(endpoint_url) = std::env::var("AWS_ENDPOINT_URL") {
        loader = loader.endpoint_url(endpoint_url);
    }

    S3Client::new(&loader.load().await)
}
