//! Test doubles shared across the crate: in-memory fakes at the port seams
//! and a minimal scripted HTTP server for client-level tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex as TokioMutex;

use picvault_core::history::UploadRecord;
use picvault_core::settings::HostingSettings;
use picvault_core::store::LocalStore;

use crate::error::{GistSyncError, Result};
use crate::ports::RemoteStore;
use crate::types::{CreateGistRequest, GistFileStub, GistSummary};

#[derive(Debug, Clone)]
struct StoredGist {
    id: String,
    description: String,
    files: HashMap<String, String>,
}

/// Scriptable in-memory remote document store.
///
/// Failures are queued per operation name (`verify`, `list`, `create`,
/// `fetch`, `update`) and consumed one call at a time.
#[derive(Default)]
pub struct InMemoryRemote {
    gists: Mutex<Vec<StoredGist>>,
    next_id: Mutex<u32>,
    failures: Mutex<HashMap<&'static str, Vec<u16>>>,
}

impl InMemoryRemote {
    /// Queue one failure with the given HTTP status for the named operation.
    pub fn fail_once(&self, operation: &'static str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push(status);
    }

    fn take_failure(&self, operation: &str) -> Result<()> {
        let mut failures = self.failures.lock().unwrap();
        if let Some(queue) = failures.get_mut(operation) {
            if !queue.is_empty() {
                let status = queue.remove(0);
                return Err(GistSyncError::api(
                    status,
                    format!("scripted {} failure", operation),
                ));
            }
        }
        Ok(())
    }

    /// Insert a gist directly, returning its id.
    pub fn seed_gist(&self, description: &str, files: &[(&str, &str)]) -> String {
        let id = self.allocate_id();
        self.gists.lock().unwrap().push(StoredGist {
            id: id.clone(),
            description: description.to_string(),
            files: files
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
        });
        id
    }

    /// Raw content of one stored blob.
    pub fn file_content(&self, record_id: &str, filename: &str) -> Option<String> {
        self.gists
            .lock()
            .unwrap()
            .iter()
            .find(|gist| gist.id == record_id)
            .and_then(|gist| gist.files.get(filename).cloned())
    }

    pub fn gist_count(&self) -> usize {
        self.gists.lock().unwrap().len()
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("gist-{}", *next)
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn verify_identity(&self, _token: &str) -> Result<String> {
        self.take_failure("verify")?;
        Ok("octocat".to_string())
    }

    async fn list_records(&self, _token: &str) -> Result<Vec<GistSummary>> {
        self.take_failure("list")?;
        Ok(self
            .gists
            .lock()
            .unwrap()
            .iter()
            .map(|gist| GistSummary {
                id: gist.id.clone(),
                description: Some(gist.description.clone()),
                files: gist
                    .files
                    .iter()
                    .map(|(name, content)| {
                        (
                            name.clone(),
                            GistFileStub {
                                filename: name.clone(),
                                size: Some(content.len() as u64),
                            },
                        )
                    })
                    .collect(),
            })
            .collect())
    }

    async fn create_record(&self, _token: &str, request: CreateGistRequest) -> Result<String> {
        self.take_failure("create")?;
        let id = self.allocate_id();
        self.gists.lock().unwrap().push(StoredGist {
            id: id.clone(),
            description: request.description,
            files: request
                .files
                .into_iter()
                .map(|(name, file)| (name, file.content))
                .collect(),
        });
        Ok(id)
    }

    async fn fetch_record(
        &self,
        _token: &str,
        record_id: &str,
    ) -> Result<HashMap<String, String>> {
        self.take_failure("fetch")?;
        self.gists
            .lock()
            .unwrap()
            .iter()
            .find(|gist| gist.id == record_id)
            .map(|gist| gist.files.clone())
            .ok_or_else(|| GistSyncError::api(404, "Not Found"))
    }

    async fn update_record(
        &self,
        _token: &str,
        record_id: &str,
        files: HashMap<String, String>,
    ) -> Result<()> {
        self.take_failure("update")?;
        let mut gists = self.gists.lock().unwrap();
        let gist = gists
            .iter_mut()
            .find(|gist| gist.id == record_id)
            .ok_or_else(|| GistSyncError::api(404, "Not Found"))?;
        for (name, content) in files {
            gist.files.insert(name, content);
        }
        Ok(())
    }
}

/// In-memory local store capturing what the engine persists.
#[derive(Default)]
pub struct InMemoryLocal {
    pub settings: Mutex<HostingSettings>,
    pub history: Mutex<Vec<UploadRecord>>,
}

impl InMemoryLocal {
    pub fn with_settings(settings: HostingSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn set_history(&self, history: Vec<UploadRecord>) {
        *self.history.lock().unwrap() = history;
    }
}

#[async_trait]
impl LocalStore for InMemoryLocal {
    async fn load_settings(&self) -> std::result::Result<HostingSettings, String> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save_settings(&self, settings: &HostingSettings) -> std::result::Result<(), String> {
        *self.settings.lock().unwrap() = settings.clone();
        Ok(())
    }

    async fn load_history(&self) -> std::result::Result<Vec<UploadRecord>, String> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn save_history(&self, history: &[UploadRecord]) -> std::result::Result<(), String> {
        *self.history.lock().unwrap() = history.to_vec();
        Ok(())
    }
}

/// One HTTP request as seen by the scripted mock server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

fn header_end_offset(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

async fn read_http_request(stream: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buffer = Vec::new();
    loop {
        let mut chunk = [0_u8; 2048];
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if header_end_offset(&buffer).is_some() {
            break;
        }
    }

    let header_end = header_end_offset(&buffer)?;
    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?.to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let mut chunk = [0_u8; 2048];
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Some(CapturedRequest {
        request_line,
        authorization: headers.get("authorization").cloned(),
        user_agent: headers.get("user-agent").cloned(),
        accept: headers.get("accept").cloned(),
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

async fn write_http_response(
    stream: &mut tokio::net::TcpStream,
    status: u16,
    body: &str,
) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await
}

/// Start a one-request-per-connection HTTP server that answers with the
/// scripted `(status, body)` responses in order and captures what it saw.
pub async fn start_mock_server(
    responses: Vec<(u16, String)>,
) -> (
    String,
    Arc<TokioMutex<Vec<CapturedRequest>>>,
    tokio::task::JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let captured = Arc::new(TokioMutex::new(Vec::<CapturedRequest>::new()));
    let scripted = Arc::new(TokioMutex::new(VecDeque::from(responses)));
    let captured_clone = Arc::clone(&captured);
    let scripted_clone = Arc::clone(&scripted);

    let handle = tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(value) => value,
                Err(_) => break,
            };
            let Some(request) = read_http_request(&mut stream).await else {
                continue;
            };
            captured_clone.lock().await.push(request);

            let (status, body) = scripted_clone
                .lock()
                .await
                .pop_front()
                .unwrap_or((500, r#"{"message":"unexpected request"}"#.to_string()));
            let _ = write_http_response(&mut stream, status, &body).await;
        }
    });

    (format!("http://{}", addr), captured, handle)
}
