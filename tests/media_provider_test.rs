use matrix_rust::media::MediaProvider;
use matrix_rust::sdk::in_memory::InMemorySdkClient;
use matrix_rust::sdk::{MediaSource, SdkClient};
use std::sync::Arc;

#[tokio::test]
async fn test_repeated_loads_hit_the_sdk_once() {
    let sdk = InMemorySdkClient::new("@user:example.org");
    let source = MediaSource::from_url("mxc://example.org/avatar");
    sdk.insert_media(source.clone(), vec![1, 2, 3]);

    let provider = MediaProvider::new(sdk.clone() as Arc<dyn SdkClient>);

    let first = provider.load_media(&source).await.expect("first load");
    let second = provider.load_media(&source).await.expect("second load");

    assert_eq!(first.as_slice(), &[1, 2, 3]);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(sdk.media_fetches(), 1);
}

#[tokio::test]
async fn test_missing_media_is_a_recoverable_error() {
    let sdk = InMemorySdkClient::new("@user:example.org");
    let provider = MediaProvider::new(sdk.clone() as Arc<dyn SdkClient>);

    assert!(
        provider
            .load_image_from_url("mxc://example.org/nothing")
            .await
            .is_err()
    );
    assert_eq!(sdk.media_fetches(), 0);

    // A failed load is not cached; the content can appear later.
    let source = MediaSource::from_url("mxc://example.org/nothing");
    sdk.insert_media(source.clone(), vec![9]);
    assert_eq!(
        provider.load_media(&source).await.expect("load").as_slice(),
        &[9]
    );
}
