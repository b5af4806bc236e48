use test_utils::png_base64_fixture;

use super::data_uri_size;
use super::to_data_uri;
use super::ImageGenerator;
use crate::domain::models::Artifact;
use crate::domain::models::InlineImage;
use crate::domain::models::LogoSlot;
use crate::domain::services::fakes::as_backend;
use crate::domain::services::fakes::Call;
use crate::domain::services::fakes::FakeBackend;

#[test]
fn it_builds_data_uris() {
    let uri = to_data_uri(&InlineImage {
        mime_type: "image/jpeg".to_string(),
        data: "AAAA".to_string(),
    });
    assert_eq!(uri, "data:image/jpeg;base64,AAAA");
}

#[test]
fn it_defaults_to_png() {
    let uri = to_data_uri(&InlineImage {
        mime_type: "".to_string(),
        data: "AAAA".to_string(),
    });
    assert_eq!(uri, "data:image/png;base64,AAAA");
}

#[test]
fn it_measures_data_uris() {
    let uri = format!("data:image/png;base64,{}", png_base64_fixture());
    assert_eq!(data_uri_size(&uri), Some(70));
    assert_eq!(data_uri_size("https://example.com/logo.png"), None);
    assert_eq!(data_uri_size("data:image/png;base64,%%%"), None);
}

#[tokio::test]
async fn it_renders_square_images() {
    let fake = FakeBackend::default().shared();
    let generator = ImageGenerator::new(as_backend(&fake));

    let uri = generator
        .generate(LogoSlot::Primary, "A fox logo")
        .await
        .unwrap();

    assert!(uri.starts_with("data:image/png;base64,"));
    assert_eq!(
        fake.calls(),
        vec![Call::Image {
            text: "A fox logo".to_string(),
            aspect_ratio: "1:1".to_string(),
        }]
    );
}

#[tokio::test]
async fn it_renders_a_fresh_image_on_every_call() {
    let fake = FakeBackend::default().shared();
    let generator = ImageGenerator::new(as_backend(&fake));

    let first = generator.generate(LogoSlot::Primary, "A fox logo").await;
    let second = generator.generate(LogoSlot::Primary, "A fox logo").await;

    assert!(first.unwrap().starts_with("data:"));
    assert!(second.unwrap().starts_with("data:"));
    assert_eq!(fake.image_prompts().len(), 2);
}

#[tokio::test]
async fn it_fails_without_image_parts() {
    let fake = FakeBackend::default().failing_image("A fox logo").shared();
    let generator = ImageGenerator::new(as_backend(&fake));

    let err = generator
        .generate(LogoSlot::Secondary, "A fox logo")
        .await
        .unwrap_err();

    assert_eq!(err.artifact(), Some(Artifact::SecondaryMark));
    insta::assert_snapshot!(err.to_string(), @"Failed to generate secondary mark: Failed to generate image");
}

#[tokio::test]
async fn it_rejects_empty_prompts_without_calling_the_backend() {
    let fake = FakeBackend::default().shared();
    let generator = ImageGenerator::new(as_backend(&fake));

    let err = generator
        .generate(LogoSlot::Primary, "  ")
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(fake.calls().is_empty());
}
