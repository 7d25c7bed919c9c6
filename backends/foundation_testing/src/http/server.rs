//! Test HTTP server implementation.
//!
//! WHY: Provides a real HTTP server for integration tests of HTTP clients,
//! so requests go through an actual socket instead of a mock.
//!
//! WHAT: `TestHttpServer` listens on localhost, parses each request, hands
//! it to a handler and writes the handler's response back. Every request is
//! also recorded for later assertions.
//!
//! HOW: Stdlib `TcpListener` polled in a background thread, one thread per
//! connection. Requests are parsed as HTTP/1.1 with a `Content-Length` body.
//! Responses are hand-rendered and always carry `Connection: close`, so each
//! connection serves exactly one request.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

type ResponseHandler = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Simple HTTP request representation for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request target including the query (e.g., "/users?page=1")
    pub path: String,
    /// Request headers in the order they were received
    pub headers: Vec<(String, String)>,
    /// Body of the request
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path_only(&self) -> &str {
        self.path.split('?').next().unwrap_or_default()
    }

    /// Query string without the leading `?`, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, query)| query)
    }

    /// Body as UTF-8 text, invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Simple HTTP response representation for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code (e.g., 200)
    pub status: u16,
    /// Status text (e.g., "OK")
    pub status_text: String,
    /// Response headers, `Content-Length` and `Connection` excluded
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create 200 OK plain text response.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::status(200, "OK")
            .with_header("Content-Type", "text/plain")
            .with_body(body)
    }

    /// Create 200 OK JSON response.
    #[must_use]
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self::status(200, "OK")
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Create custom status response with an empty body.
    #[must_use]
    pub fn status(code: u16, text: &str) -> Self {
        Self {
            status: code,
            status_text: text.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Render response to HTTP/1.1 format.
    fn render(&self) -> Vec<u8> {
        let mut response = format!("HTTP/1.1 {} {}\r\n", self.status, self.status_text);

        for (key, value) in &self.headers {
            response.push_str(&format!("{key}: {value}\r\n"));
        }
        response.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        response.push_str("Connection: close\r\n");
        response.push_str("\r\n");

        let mut bytes = response.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Test HTTP server for integration testing.
///
/// # Purpose (WHY)
///
/// Provides a real HTTP server for testing HTTP clients without an external
/// service.
///
/// # What it does
///
/// Starts a local HTTP server on a random port, answers every request with
/// the configured handler and records the requests it received. Runs in a
/// background thread so it does not block test execution.
///
/// # Examples
///
/// ```rust
/// use foundation_testing::http::TestHttpServer;
///
/// let server = TestHttpServer::start();
/// assert!(server.url("/test").starts_with("http://127.0.0.1:"));
///
/// // Server automatically stops when dropped
/// ```
pub struct TestHttpServer {
    addr: String,
    handle: Option<thread::JoinHandle<()>>,
    running: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl TestHttpServer {
    /// Start a new test HTTP server on random port.
    ///
    /// # Returns
    ///
    /// A running `TestHttpServer` that will respond with 200 OK to all requests.
    #[must_use]
    pub fn start() -> Self {
        Self::with_response(|_req| HttpResponse::ok(b"OK".to_vec()))
    }

    /// Start server with custom response handler.
    ///
    /// # Purpose (WHY)
    ///
    /// Allows tests to customize server behavior for specific scenarios
    /// (errors, echoing headers, custom bodies, etc.)
    ///
    /// # Arguments
    ///
    /// * `handler` - Function that takes request and returns response
    ///
    /// # Panics
    ///
    /// Panics if no localhost port can be bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foundation_testing::http::{HttpResponse, TestHttpServer};
    ///
    /// let server = TestHttpServer::with_response(|req| {
    ///     if req.path_only() == "/missing" {
    ///         HttpResponse::status(404, "Not Found")
    ///     } else {
    ///         HttpResponse::ok(b"Success".to_vec())
    ///     }
    /// });
    /// ```
    #[must_use]
    pub fn with_response<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        let listener =
            TcpListener::bind("127.0.0.1:0").expect("Failed to bind test HTTP server to localhost");
        let addr = format!(
            "http://{}",
            listener
                .local_addr()
                .expect("Failed to read test HTTP server address")
        );

        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: ResponseHandler = Arc::new(handler);

        let running_clone = Arc::clone(&running);
        let requests_clone = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            // Set non-blocking so we can check running flag
            if let Err(e) = listener.set_nonblocking(true) {
                tracing::info!("TestHttpServer could not poll listener: {e}");
                return;
            }

            while running_clone.load(Ordering::Relaxed) {
                match listener.accept() {
                    Ok((stream, sock_addr)) => {
                        tracing::debug!("Got a client connection: {sock_addr:?}");
                        let handler = Arc::clone(&handler);
                        let requests = Arc::clone(&requests_clone);
                        // Handle each connection in separate thread
                        thread::spawn(move || {
                            if let Err(e) = Self::handle_connection(stream, &handler, &requests) {
                                tracing::info!("TestHttpServer connection error: {e}");
                            }
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        // No connection available, sleep briefly and check again
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(e) => {
                        tracing::info!("TestHttpServer accept error: {e}");
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            handle: Some(handle),
            running,
            requests,
        }
    }

    /// Get full URL for a path on this test server.
    ///
    /// # Arguments
    ///
    /// * `path` - Path starting with / (e.g., "/test", "/api/users")
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Get base URL of this test server (e.g., "<http://127.0.0.1:54321>").
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.addr
    }

    /// Requests received so far, in the order they were parsed.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Handle a single HTTP connection.
    fn handle_connection(
        stream: TcpStream,
        handler: &ResponseHandler,
        requests: &Mutex<Vec<HttpRequest>>,
    ) -> std::io::Result<()> {
        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;

        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(stream);

        let Some(request) = Self::read_request(&mut reader)? else {
            tracing::debug!("Connection closed before a request was sent");
            return Ok(());
        };

        tracing::debug!(
            "Received http request: method: {}, path: {}",
            request.method,
            request.path
        );

        let response = handler(&request);
        requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        writer.write_all(&response.render())?;
        writer.flush()?;

        Ok(())
    }

    /// Parses request line, headers and `Content-Length` body.
    fn read_request(reader: &mut impl BufRead) -> std::io::Result<Option<HttpRequest>> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let mut parts = line.split_whitespace();
        let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("malformed request line: {line:?}"),
            ));
        };
        let method = method.to_string();
        let path = path.to_string();

        let mut headers = Vec::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let header = line.trim_end_matches(['\r', '\n']);
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = vec![0; length];
        reader.read_exact(&mut body)?;

        Ok(Some(HttpRequest {
            method,
            path,
            headers,
            body,
        }))
    }
}

impl Drop for TestHttpServer {
    fn drop(&mut self) {
        // Signal server thread to stop
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
