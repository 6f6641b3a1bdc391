#![allow(dead_code)]

use content_service::config::ContentConfig;
use content_service::services::fetcher::MockWebFetcher;
use content_service::services::storage::LocalStorage;
use content_service::startup::{AppState, build_router};
use std::sync::Arc;
use uuid::Uuid;

/// Default page body served by the mock fetcher.
pub const TEST_PAGE_HTML: &str = "<html><head><title>見出し</title>\
<style>body { color: red; }</style></head>\
<body><h1>AWSレベル判定</h1>\n\n<p>これは  本文です。</p>\
<script>console.log('tracking');</script></body></html>";

/// Knobs for the backends behind a test app.
#[derive(Clone)]
pub struct ContentBackends {
    pub fetcher_enabled: bool,
    pub page_html: String,
    pub max_pdf_bytes: usize,
}

impl Default for ContentBackends {
    fn default() -> Self {
        Self {
            fetcher_enabled: true,
            page_html: TEST_PAGE_HTML.to_string(),
            max_pdf_bytes: 20 * 1024 * 1024,
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub fetcher: Arc<MockWebFetcher>,
    pub storage_path: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(ContentBackends::default()).await
    }

    pub async fn spawn_with(backends: ContentBackends) -> Self {
        // No flags are set in the test environment, so the dev defaults
        // apply; storage is redirected to a throwaway directory per app.
        let mut config = ContentConfig::load().expect("Failed to load configuration");
        let storage_path = format!("target/test-storage-{}", Uuid::new_v4());
        config.storage.local_path = storage_path.clone();
        config.pdf.max_bytes = backends.max_pdf_bytes;

        let fetcher = Arc::new(MockWebFetcher::new(
            backends.fetcher_enabled,
            &backends.page_html,
        ));
        let storage = LocalStorage::new(&storage_path)
            .await
            .expect("Failed to create local storage");

        let state = AppState {
            config,
            fetcher: fetcher.clone(),
            storage: Arc::new(storage),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener
            .local_addr()
            .expect("Failed to read local address")
            .port();
        let address = format!("http://127.0.0.1:{}", port);

        let app = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for the server to accept connections.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            fetcher,
            storage_path,
        }
    }

    /// Remove the throwaway storage directory.
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.storage_path).await;
    }
}

/// Build a minimal one-page PDF whose content stream draws `text`.
///
/// The cross-reference offsets are computed from the assembled bytes, so the
/// result parses with a strict reader.
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let header = "%PDF-1.4\n";
    let objects = [
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
        "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_string(),
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>\nendobj\n"
            .to_string(),
        {
            let stream = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);
            format!(
                "4 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                stream.len(),
                stream
            )
        },
        "5 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
         /Encoding /WinAnsiEncoding >>\nendobj\n"
            .to_string(),
    ];

    let mut body = String::from(header);
    let mut offsets = Vec::with_capacity(objects.len());
    for object in &objects {
        offsets.push(body.len());
        body.push_str(object);
    }

    let xref_offset = body.len();
    body.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    body.push_str("0000000000 65535 f \n");
    for offset in offsets {
        body.push_str(&format!("{:010} 00000 n \n", offset));
    }
    body.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    body.into_bytes()
}
