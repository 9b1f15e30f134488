//! Integration tests for the chatrelay library.
//!
//! Most tests run the real HTTP backend against a throwaway local server that
//! answers one request per connection. The live test at the bottom needs a
//! running backend at `CHATRELAY_TEST_URL`.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use chatrelay::chat::{ChatClient, Renderer, Sender, Theme, TranscriptEntry};
    use chatrelay::{Backend, ChatBackend, ConversationCreateParams};

    #[derive(Debug, Clone)]
    struct Recorded {
        path: String,
        content_type: Option<String>,
        body: Value,
    }

    /// Starts a server answering each request with the next `(status, body)`.
    async fn serve(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<Recorded>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let log = recorded.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });
        (format!("http://{addr}/"), recorded)
    }

    /// Starts a server that reads one request and never answers it.
    async fn serve_silently() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            std::future::pending::<()>().await;
            drop(socket);
        });
        format!("http://{addr}/")
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> Recorded {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.lines();
        let path = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap()
            .to_string();
        let mut content_length = 0;
        let mut content_type = None;
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                let value = value.trim().to_string();
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.parse().unwrap();
                } else if name.eq_ignore_ascii_case("content-type") {
                    content_type = Some(value);
                }
            }
        }
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();
        Recorded {
            path,
            content_type,
            body,
        }
    }

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn print_entry(&mut self, _: Theme, _: &TranscriptEntry) {}
        fn print_error(&mut self, _: &str) {}
        fn print_info(&mut self, _: &str) {}
    }

    #[tokio::test]
    async fn hello_round_trip() {
        let (base_url, recorded) = serve(vec![
            (200, json!({"conversation_id": "c-42"}).to_string()),
            (200, json!({"answer": "Hi! How can I help?"}).to_string()),
        ])
        .await;

        let backend = ChatBackend::new(&base_url).unwrap();
        let mut client = ChatClient::new(backend, Theme::Light);
        client.submit("Hello", &mut NullRenderer).await.unwrap();

        let recorded = recorded.lock().unwrap().clone();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].path, "/conversation");
        assert_eq!(recorded[0].body, json!({"user_input": "Hello"}));
        assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(recorded[1].path, "/message");
        assert_eq!(
            recorded[1].body,
            json!({"conversation_id": "c-42", "user_input": "Hello"})
        );

        assert_eq!(
            client.transcript().entries(),
            &[
                TranscriptEntry::user("Hello"),
                TranscriptEntry::bot("Hi! How can I help?")
            ]
        );
    }

    #[tokio::test]
    async fn two_messages_share_one_conversation() {
        let (base_url, recorded) = serve(vec![
            (200, json!({"conversation_id": "c-7", "remaining_messages": 10}).to_string()),
            (200, json!({"answer": "first", "remaining_messages": 9}).to_string()),
            (200, json!({"answer": "second", "available_messages": 8}).to_string()),
        ])
        .await;

        let backend = ChatBackend::new(&base_url).unwrap();
        let mut client = ChatClient::new(backend, Theme::Light);
        client.submit("A", &mut NullRenderer).await.unwrap();
        client.submit("B", &mut NullRenderer).await.unwrap();

        let recorded = recorded.lock().unwrap().clone();
        let paths: Vec<_> = recorded.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/conversation", "/message", "/message"]);
        assert_eq!(recorded[1].body["conversation_id"], "c-7");
        assert_eq!(recorded[2].body["conversation_id"], "c-7");
        assert_eq!(recorded[2].body["user_input"], "B");
        assert_eq!(client.remaining_messages(), Some(8));
    }

    #[tokio::test]
    async fn server_error_on_creation_is_reported_inline() {
        let (base_url, recorded) = serve(vec![(500, "{}".to_string())]).await;

        let backend = ChatBackend::new(&base_url).unwrap();
        let mut client = ChatClient::new(backend, Theme::Light);
        let err = client.submit("Hello", &mut NullRenderer).await.unwrap_err();

        assert!(err.is_session_creation());
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(client.conversation_id(), None);
        assert_eq!(recorded.lock().unwrap().len(), 1);
        let entries = client.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sender, Sender::Notice);
    }

    #[tokio::test]
    async fn unanswered_creation_times_out() {
        let base_url = serve_silently().await;

        let backend =
            ChatBackend::with_options(Some(base_url), Some(Duration::from_secs(1))).unwrap();
        let mut client = ChatClient::new(backend, Theme::Light);
        let err = client.submit("Hello", &mut NullRenderer).await.unwrap_err();

        assert!(err.is_timeout(), "unexpected error: {err}");
        assert!(err.is_session_creation());
        assert_eq!(client.conversation_id(), None);
        assert_eq!(client.transcript().count(Sender::Notice), 1);
    }

    #[tokio::test]
    async fn conversation_past_its_limit_still_answers() {
        let (base_url, _) = serve(vec![
            (200, json!({"conversation_id": "c-9", "remaining_messages": 0}).to_string()),
            (200, json!({"answer": "Here is your answer", "remaining_messages": -1}).to_string()),
        ])
        .await;

        let backend = ChatBackend::new(&base_url).unwrap();
        let mut client = ChatClient::new(backend, Theme::Light);
        client.submit("Hello", &mut NullRenderer).await.unwrap();

        assert_eq!(
            client.transcript().last(),
            Some(&TranscriptEntry::bot("Here is your answer"))
        );
        assert_eq!(client.remaining_messages(), Some(-1));
    }

    #[tokio::test]
    async fn non_json_reply_is_a_send_failure() {
        let (base_url, _) = serve(vec![
            (200, json!({"conversation_id": "c-1"}).to_string()),
            (200, "<html>oops</html>".to_string()),
        ])
        .await;

        let backend = ChatBackend::new(&base_url).unwrap();
        let mut client = ChatClient::new(backend, Theme::Light);
        let err = client.submit("Hello", &mut NullRenderer).await.unwrap_err();
        assert!(err.is_message_send());
        assert_eq!(client.conversation_id().map(|id| id.as_str()), Some("c-1"));
    }

    #[tokio::test]
    async fn test_live_conversation() {
        // This test requires a running backend at CHATRELAY_TEST_URL
        let base_url = std::env::var("CHATRELAY_TEST_URL").ok();
        let Some(base_url) = base_url else {
            eprintln!("Skipping test: CHATRELAY_TEST_URL not set");
            return;
        };

        let backend = ChatBackend::new(&base_url).expect("Failed to create backend");
        let conversation = backend
            .create_conversation(ConversationCreateParams::new("Hello"))
            .await;
        assert!(
            conversation.is_ok(),
            "Conversation should be created by a live backend"
        );
    }
}
