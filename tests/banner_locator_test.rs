//! Banner locating against canned page snapshots

mod common;

use std::time::Duration;

use bannerscrape::{DeviceProfile, locate};
use common::FakePage;
use serde_json::json;

const SETTLE: Duration = Duration::from_millis(2000);

fn img(src: &str, width: f64, height: f64) -> serde_json::Value {
    json!({ "src": src, "srcset": null, "width": width, "height": height })
}

#[tokio::test]
async fn background_container_wins_on_desktop() {
    let page = FakePage::new(json!({
        "images": [img("https://i.scdn.co/image/huge", 3000.0, 3000.0)],
        "background_container": "url(\"https://i.scdn.co/image/ab67618600000194header\")",
        "entity_image": null,
        "backgrounds": []
    }));

    let candidate = locate(&page, DeviceProfile::Desktop, SETTLE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(candidate.url, "https://i.scdn.co/image/ab67618600000194header");
    assert_eq!(page.waits.lock().unwrap().as_slice(), &[SETTLE]);
}

#[tokio::test]
async fn mobile_fast_path_precedes_background_container() {
    let snapshot = json!({
        "images": [
            img("https://i.scdn.co/image/ab67616100005174small", 100.0, 100.0),
            img("https://i.scdn.co/image/ab67616100005174wide", 375.0, 300.0)
        ],
        "background_container": "url(\"https://i.scdn.co/image/ab67618600000194header\")",
        "entity_image": null,
        "backgrounds": []
    });

    let mobile = locate(&FakePage::new(snapshot.clone()), DeviceProfile::Mobile, SETTLE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mobile.url, "https://i.scdn.co/image/ab67616100005174wide");

    let desktop = locate(&FakePage::new(snapshot), DeviceProfile::Desktop, SETTLE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(desktop.url, "https://i.scdn.co/image/ab67618600000194header");
}

#[tokio::test]
async fn signature_sweep_then_largest_image_fallback() {
    let sweep = FakePage::new(json!({
        "images": [img("https://other.cdn/photo.jpg", 800.0, 600.0)],
        "backgrounds": [
            "url(\"https://i.scdn.co/image/unrelated\")",
            "linear-gradient(red, blue), url(\"https://i.scdn.co/image/ab67618600000194found\")"
        ]
    }));
    let found = locate(&sweep, DeviceProfile::Desktop, SETTLE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.url, "https://i.scdn.co/image/ab67618600000194found");

    let fallback = FakePage::new(json!({
        "images": [
            img("https://other.cdn/icon.png", 64.0, 64.0),
            img("https://other.cdn/photo.jpg", 800.0, 600.0)
        ]
    }));
    let found = locate(&fallback, DeviceProfile::Desktop, SETTLE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.url, "https://other.cdn/photo.jpg");
    assert_eq!(found.area_score, 480_000.0);
}

#[tokio::test]
async fn page_without_banner_yields_none() {
    let page = FakePage::new(json!({
        "images": [img("https://other.cdn/avatar.png", 200.0, 200.0)],
        "background_container": null,
        "entity_image": { "image": null, "background": null },
        "backgrounds": []
    }));

    for profile in [DeviceProfile::Desktop, DeviceProfile::Mobile] {
        assert!(locate(&page, profile, SETTLE).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn malformed_snapshot_is_an_error() {
    let page = FakePage::new(json!("not an object"));
    assert!(locate(&page, DeviceProfile::Desktop, SETTLE).await.is_err());
}
