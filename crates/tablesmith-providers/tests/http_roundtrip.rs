use tablesmith_providers::{
    CerebrasProvider, GeminiProvider, GenerationError, GenerationProvider, ProviderKind,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn local_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build client")
}

/// Serve exactly one HTTP exchange and hand back the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/generate"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = socket.read(&mut chunk).await.expect("read request");
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&data);
        if let Some(split) = text.find("\r\n\r\n") {
            let content_length = text[..split]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= split + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

#[tokio::test]
async fn gemini_returns_candidate_text() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"[{\"id\":1}]"}]}}]}"#,
    )
    .await;

    let provider = GeminiProvider::new()
        .with_endpoint(url)
        .with_http_client(local_client());
    let text = provider
        .generate("local-key", "prompt body")
        .await
        .expect("generate");
    assert_eq!(text, r#"[{"id":1}]"#);

    let request = server.await.expect("server task");
    assert!(request.starts_with("POST /generate?key=local-key "));
    assert!(request.contains(r#""text":"prompt body""#));
}

#[tokio::test]
async fn non_success_status_is_reported_with_provider_name() {
    let (url, server) = serve_once("500 Internal Server Error", "{}").await;

    let provider = CerebrasProvider::new()
        .with_endpoint(url)
        .with_http_client(local_client());
    let err = provider
        .generate("local-key", "prompt body")
        .await
        .expect_err("status error");

    assert!(matches!(
        err,
        GenerationError::Status {
            provider: ProviderKind::Cerebras,
            status: 500
        }
    ));
    assert_eq!(err.to_string(), "Cerebras API error: 500");

    let request = server.await.expect("server task");
    assert!(
        request
            .to_lowercase()
            .contains("authorization: bearer local-key")
    );
}

#[tokio::test]
async fn missing_text_path_is_empty_response() {
    let (url, server) = serve_once("200 OK", r#"{"choices":[]}"#).await;

    let provider = CerebrasProvider::new()
        .with_endpoint(url)
        .with_http_client(local_client());
    let err = provider
        .generate("local-key", "prompt body")
        .await
        .expect_err("empty response");

    assert!(matches!(err, GenerationError::EmptyResponse { .. }));
    assert_eq!(err.to_string(), "empty response");
    server.await.expect("server task");
}
