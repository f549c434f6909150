use std::io::Read;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Request, Response, Server};

/// Canned answer for one incoming request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, &'static str),
    /// Wait before answering 200 with an empty object.
    Delay(Duration),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Backend stub on a random local port. Replies are handed out in request
/// order; once exhausted the last one repeats.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(replies: Vec<Reply>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api/vehicle/update");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let replies = Arc::new(replies);

        thread::spawn(move || {
            for request in server.incoming_requests() {
                let recorded = Arc::clone(&recorded);
                let replies = Arc::clone(&replies);
                thread::spawn(move || answer(request, &recorded, &replies));
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn answer(mut request: Request, recorded: &Mutex<Vec<RecordedRequest>>, replies: &[Reply]) {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_string());

    let reply = {
        let mut guard = recorded.lock().unwrap();
        let position = guard.len();
        guard.push(RecordedRequest {
            method: request.method().to_string(),
            path: request.url().to_string(),
            content_type,
            body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
        });
        replies
            .get(position)
            .or(replies.last())
            .cloned()
            .unwrap_or(Reply::Json(200, "{}"))
    };

    let (status, body) = match reply {
        Reply::Json(status, body) => (status, body),
        Reply::Delay(delay) => {
            thread::sleep(delay);
            (200, "{}")
        }
    };
    let json = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    let _ = request.respond(
        Response::from_string(body)
            .with_status_code(status)
            .with_header(json),
    );
}

/// URL of a local port with nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/vehicle/update", addr)
}
