#![cfg(feature = "serve")]

use std::io::Cursor;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt as _;
use tower::ServiceExt as _;

use affiche::serve::{ServeConfig, router};

const BOUNDARY: &str = "affiche-test-boundary";

fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn temp_public_dir(name: &str) -> std::path::PathBuf {
    let dir = std::path::PathBuf::from("target").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn upload_returns_base64_jpeg_data_url() {
    let public_dir = temp_public_dir("serve_upload_ok");
    std::fs::write(
        public_dir.join("event.jpg"),
        png_bytes(500, 500, [0, 0, 255, 255]),
    )
    .unwrap();

    let app = router(ServeConfig {
        public_dir: public_dir.clone(),
    });

    let body = multipart_body("photo", "me.png", &png_bytes(300, 400, [255, 0, 0, 255]));
    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let image = json["image"].as_str().unwrap();
    assert!(image.starts_with("data:image/jpeg;base64,"));
    assert!(image.len() > "data:image/jpeg;base64,".len());
}

#[tokio::test]
async fn upload_with_undecodable_photo_is_a_generic_500() {
    let public_dir = temp_public_dir("serve_upload_bad_photo");
    std::fs::write(
        public_dir.join("event.jpg"),
        png_bytes(200, 200, [0, 0, 255, 255]),
    )
    .unwrap();

    let app = router(ServeConfig { public_dir });

    let body = multipart_body("photo", "me.png", b"not an image");
    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Processing error");
}

#[tokio::test]
async fn upload_without_photo_field_is_a_500() {
    let public_dir = temp_public_dir("serve_upload_missing_field");
    std::fs::write(
        public_dir.join("event.jpg"),
        png_bytes(200, 200, [0, 0, 255, 255]),
    )
    .unwrap();

    let app = router(ServeConfig { public_dir });

    let body = multipart_body("selfie", "me.png", &png_bytes(10, 10, [1, 2, 3, 255]));
    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
