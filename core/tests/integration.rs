//! `RecordManager` end-to-end against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, logs a user in through
//! `RecordsClient`, then drives a `RecordManager` backed by
//! `HttpRecordService` over real HTTP using ureq as the host transport.

use async_trait::async_trait;
use health_core::{
    ApiError, Condition, Field, FormMode, HttpMethod, HttpRecordService, HttpRequest, HttpResponse,
    LoginRequest, RecordFields, RecordId, RecordManager, RecordsClient, RegisterRequest, Transport,
};

struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Disables ureq's status-code-as-error behavior so 4xx/5xx responses
    /// come back as data for the core client to interpret.
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    fn execute_blocking(&self, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
        let mut response = match req.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = if req.method == HttpMethod::Get {
                    self.agent.get(&req.path)
                } else {
                    self.agent.delete(&req.path)
                };
                for (k, v) in &req.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.call()?
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if req.method == HttpMethod::Post {
                    self.agent.post(&req.path)
                } else {
                    self.agent.put(&req.path)
                };
                for (k, v) in &req.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.send(req.body.unwrap_or_default().as_bytes())?
            }
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.execute_blocking(request)
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Register and log in, returning a client carrying the session token.
async fn signed_in_client(base_url: &str, transport: &UreqTransport) -> RecordsClient {
    let client = RecordsClient::new(base_url);

    let register = RegisterRequest {
        name: "Test".to_string(),
        email: "test@example.com".to_string(),
        password: "secret".to_string(),
    };
    let req = client.build_register(&register).unwrap();
    client
        .parse_register(transport.execute(req).await.unwrap())
        .unwrap();

    let login = LoginRequest {
        email: register.email,
        password: register.password,
    };
    let req = client.build_login(&login).unwrap();
    let token = client
        .parse_login(transport.execute(req).await.unwrap())
        .unwrap();
    client.with_token(token)
}

#[tokio::test]
async fn manager_lifecycle_over_http() {
    let base_url = start_server();
    let transport = UreqTransport::new();
    let client = signed_in_client(&base_url, &transport).await;
    let manager = RecordManager::new(HttpRecordService::new(client, transport));

    // Step 1: first refresh — empty.
    assert_eq!(manager.refresh().await, Ok(0));

    // Step 2: create.
    let input = RecordFields {
        title: "Weight".to_string(),
        description: "Morning".to_string(),
        value: "70".to_string(),
        date: "2024-01-01".to_string(),
    };
    for field in Field::ALL {
        manager.set_field(field, input.get(field));
    }
    let done = manager.submit().await.unwrap();
    assert_eq!(done.refresh, Ok(1));
    let records = manager.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields(), input);
    assert_eq!(manager.form().mode(), &FormMode::Create);
    let id = records[0].id.clone();

    // Step 3: edit the value.
    manager.begin_edit(&records[0]).unwrap();
    manager.set_field(Field::Value, "72");
    manager.submit().await.unwrap();
    let records = manager.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].value, "72");

    // Step 4: delete the record that is open in the form.
    manager.begin_edit(&records[0]).unwrap();
    manager.remove(&id).await.unwrap();
    assert!(manager.records().is_empty());
    assert_eq!(manager.form().mode(), &FormMode::Create);

    // Step 5: deleting an id that is already gone is a no-op.
    assert!(manager.remove(&id).await.is_ok());
    assert_eq!(manager.refresh().await, Ok(0));
}

#[tokio::test]
async fn update_of_missing_record_reports_server_message() {
    let base_url = start_server();
    let transport = UreqTransport::new();
    let client = signed_in_client(&base_url, &transport).await;
    let manager = RecordManager::new(HttpRecordService::new(client, transport));

    for field in Field::ALL {
        manager.set_field(field, "x");
    }
    let created = manager.submit().await.unwrap();
    let health_core::Notice::Added(record) = created.notice else {
        panic!("expected an added notice");
    };
    manager.begin_edit(&record).unwrap();

    // Drop the record on the server behind the manager's back while the
    // form still points at it.
    let service = manager.service();
    let req = service.client().build_delete_record(&record.id);
    let transport = UreqTransport::new();
    let resp = transport.execute(req).await.unwrap();
    service.client().parse_delete_record(resp).unwrap();

    let err = manager.submit().await.unwrap_err();
    assert_eq!(
        err,
        Condition::SaveFailed {
            message: Some("Record not found".to_string())
        }
    );
    assert_eq!(manager.form().mode(), &FormMode::Edit(record.id.clone()));
}

#[tokio::test]
async fn missing_token_surfaces_server_message() {
    let base_url = start_server();
    let manager = RecordManager::new(HttpRecordService::new(
        RecordsClient::new(&base_url),
        UreqTransport::new(),
    ));

    let err = manager.refresh().await.unwrap_err();
    assert_eq!(err.to_string(), "No token provided");
    assert!(manager.remove(&RecordId::new("whatever")).await.is_err());
}
