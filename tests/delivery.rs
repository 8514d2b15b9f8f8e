//! File delivery over a streaming hyper response.

use resfmt::config::DeliveryConfig;
use resfmt::{AttachmentOptions, DeliveryOutcome, FileDelivery, ResponseWriter};

mod common;

fn delivery() -> FileDelivery {
    FileDelivery::new(ResponseWriter::default(), DeliveryConfig::default())
}

#[tokio::test]
async fn test_download_streams_file() {
    let (_dir, path) = common::fixture("hello.txt", b"hello world\n");
    let delivery = delivery();

    let res = common::run(false, move |mut res| async move {
        delivery.download(&mut res, &path).await.unwrap()
    })
    .await;

    assert_eq!(res.output, DeliveryOutcome::Done { bytes: 12 });
    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    assert_eq!(res.header("content-length"), Some("12"));
    assert!(res.header("last-modified").is_some());
    assert_eq!(res.text(), "hello world\n");
}

#[tokio::test]
async fn test_attachment_sets_disposition() {
    let (_dir, path) = common::fixture("hello.txt", b"hello world\n");
    let delivery = delivery();

    let res = common::run(false, move |mut res| async move {
        delivery
            .attachment(&mut res, &path, AttachmentOptions::default())
            .await
            .unwrap()
    })
    .await;

    assert!(res.output.is_done());
    assert_eq!(
        res.header("content-disposition"),
        Some("attachment; filename=\"hello.txt\"")
    );
    assert_eq!(res.text(), "hello world\n");
}

#[tokio::test]
async fn test_missing_file_answers_503() {
    let delivery = delivery();

    let res = common::run(false, move |mut res| async move {
        delivery
            .attachment(&mut res, "/no/such/report.pdf", AttachmentOptions::default())
            .await
            .unwrap()
    })
    .await;

    assert!(matches!(res.output, DeliveryOutcome::Failed(ref e) if e.code == "ENOENT"));
    assert_eq!(res.status, 503);
    assert_eq!(
        res.header("content-type"),
        Some("application/json; charset=utf-8")
    );
    assert!(res.header("content-disposition").is_none());
    assert!(res.header("last-modified").is_none());

    let body: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
    assert_eq!(body["code"], "ENOENT");
    assert_eq!(body["syscall"], "stat");
    assert_eq!(body["path"], "/no/such/report.pdf");
}

#[tokio::test]
async fn test_large_file_with_backpressure() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1 << 20).collect();
    let (_dir, path) = common::fixture("blob.bin", &data);
    let config = DeliveryConfig {
        chunk_size: 4096,
        ..DeliveryConfig::default()
    };
    let delivery = FileDelivery::new(ResponseWriter::default(), config);

    let res = common::run(false, move |mut res| async move {
        delivery.download(&mut res, &path).await.unwrap()
    })
    .await;

    assert_eq!(res.output, DeliveryOutcome::Done { bytes: 1 << 20 });
    assert_eq!(res.header("content-type"), Some("application/octet-stream"));
    assert_eq!(res.body.len(), data.len());
    assert_eq!(&res.body[..], &data[..]);
}

#[tokio::test]
async fn test_head_request_keeps_headers() {
    let (_dir, path) = common::fixture("page.html", b"<p>hi</p>");
    let delivery = delivery();

    let res = common::run(true, move |mut res| async move {
        delivery.download(&mut res, &path).await.unwrap()
    })
    .await;

    assert!(res.output.is_done());
    assert_eq!(res.header("content-length"), Some("9"));
    assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(res.body.is_empty());
}

#[tokio::test]
async fn test_repeated_downloads() {
    let (_dir, path) = common::fixture("hello.txt", b"hello world\n");
    let delivery = delivery();

    let mut handles = Vec::new();
    for _ in 0..13 {
        let delivery = delivery.clone();
        let path = path.clone();
        handles.push(tokio::spawn(async move {
            common::run(false, move |mut res| async move {
                delivery.download(&mut res, &path).await.unwrap()
            })
            .await
        }));
    }

    for handle in handles {
        let res = handle.await.unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.output, DeliveryOutcome::Done { bytes: 12 });
        assert_eq!(res.text(), "hello world\n");
    }
}
