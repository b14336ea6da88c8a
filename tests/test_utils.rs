#![allow(dead_code)]

use actix_multipart::form::{
    tempfile::TempFile,
    text::{Text, TextConfig},
    MultipartForm,
};
use actix_web::{
    middleware::NormalizePath,
    web, App, HttpResponse, HttpServer,
};
use job_match_backend::{
    db::memory::MemoryRepo,
    entities::{matching::GatewayJob, token::AuthResponse, user::{LoginUser, NewUser}},
    middlewares::auth::AuthMiddleware,
    repositories::SharedStore,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use reqwest::{multipart::{Form, Part}, Client};
use std::{
    net::TcpListener,
    path::PathBuf,
    sync::{atomic::{AtomicUsize, Ordering}, Arc, Mutex},
    time::Duration,
};
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &str = "test_jwt_secret_that_is_long_enough_for_hs512_1234567890";

/// How the fake scoring service answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScorerMode {
    /// `status: success`, one match per job, scores 90, 80, 70, ...
    Success,
    /// `status: error` with a 200.
    StatusError,
    /// HTTP 500.
    HttpFailure,
    /// `status: success` with an empty match list.
    NoMatches,
    /// Adds a match for a job id nobody sent.
    WithUnknownJob,
}

pub struct FakeScorer {
    pub hits: AtomicUsize,
    pub mode: Mutex<ScorerMode>,
    pub last_jobs: Mutex<Vec<GatewayJob>>,
    pub last_resume: Mutex<Option<(Option<String>, usize)>>,
}

impl FakeScorer {
    fn new() -> Self {
        FakeScorer {
            hits: AtomicUsize::new(0),
            mode: Mutex::new(ScorerMode::Success),
            last_jobs: Mutex::new(Vec::new()),
            last_resume: Mutex::new(None),
        }
    }
}

#[derive(MultipartForm)]
struct ScoreForm {
    resume: TempFile,
    jobs: Text<String>,
}

async fn fake_match(
    scorer: web::Data<FakeScorer>,
    MultipartForm(form): MultipartForm<ScoreForm>,
) -> HttpResponse {
    scorer.hits.fetch_add(1, Ordering::SeqCst);

    let jobs: Vec<GatewayJob> = serde_json::from_str(&form.jobs).expect("jobs field must be JSON");
    *scorer.last_jobs.lock().unwrap() = jobs.clone();
    *scorer.last_resume.lock().unwrap() = Some((form.resume.file_name.clone(), form.resume.size));

    let mode = *scorer.mode.lock().unwrap();
    let mut matches: Vec<serde_json::Value> = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| serde_json::json!({
            "job_id": job.id,
            "score": 90.0 - (i as f64) * 10.0,
            "matching_skills": ["Rust"],
            "missing_skills": ["Kubernetes"],
        }))
        .collect();

    match mode {
        ScorerMode::Success => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "matches": matches,
        })),
        ScorerMode::StatusError => HttpResponse::Ok().json(serde_json::json!({
            "status": "error",
            "message": "model not loaded",
        })),
        ScorerMode::HttpFailure => HttpResponse::InternalServerError().finish(),
        ScorerMode::NoMatches => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "matches": [],
        })),
        ScorerMode::WithUnknownJob => {
            matches.push(serde_json::json!({
                "job_id": "not-a-job",
                "score": 50.0,
            }));
            HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "matches": matches,
            }))
        }
    }
}

async fn spawn_fake_scorer() -> (String, Arc<FakeScorer>) {
    let scorer = web::Data::new(FakeScorer::new());
    let shared = scorer.clone().into_inner();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(scorer.clone())
            .app_data(TextConfig::default().validate_content_type(false))
            .route("/match", web::post().to(fake_match))
    })
    .listen(listener)
    .expect("Failed to bind fake scorer")
    .workers(1)
    .run();

    tokio::spawn(server);

    (format!("http://127.0.0.1:{}/match", port), shared)
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
    pub store: Arc<MemoryRepo>,
    pub scorer: Arc<FakeScorer>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let (ml_service_url, scorer) = spawn_fake_scorer().await;
        let config = test_config(upload_dir.path().to_path_buf(), ml_service_url);

        let store = Arc::new(MemoryRepo::new());
        let shared: SharedStore = store.clone();
        let state = web::Data::new(AppState::new(&config, shared));
        state.upload_receiver.ensure_dir().await.expect("Failed to prepare upload dir");

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server_state = state.clone();
        let server = HttpServer::new(move || {
            let receiver = server_state.upload_receiver.clone();
            App::new()
                .app_data(server_state.clone())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_routes(cfg, &receiver))
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
            store,
            scorer,
            upload_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn set_scorer_mode(&self, mode: ScorerMode) {
        *self.scorer.mode.lock().unwrap() = mode;
    }

    pub fn scorer_hits(&self) -> usize {
        self.scorer.hits.load(Ordering::SeqCst)
    }

    /// Files left behind in the upload directory.
    pub fn stored_uploads(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect()
    }

    pub async fn register_user(&self, user: &NewUser) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(user)
            .send()
            .await
            .expect("Failed to register user")
    }

    pub async fn register_ok(&self, user: &NewUser) -> AuthResponse {
        let response = self.register_user(user).await;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            panic!("Registration failed: ({}): {}", status, body);
        }

        response.json().await.expect("Failed to parse register response")
    }

    pub async fn login(&self, credentials: &LoginUser) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(credentials)
            .send()
            .await
            .expect("Failed to login user")
    }

    pub async fn post_job(&self, token: &str, job: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/recruiter/jobs"))
            .bearer_auth(token)
            .json(job)
            .send()
            .await
            .expect("Failed to post job")
    }

    pub async fn post_job_ok(&self, token: &str, job: &serde_json::Value) -> serde_json::Value {
        let response = self.post_job(token, job).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.unwrap()
    }

    pub async fn apply(&self, token: &str, job_id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/candidate/apply/{}", job_id)))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to apply")
    }

    pub async fn upload_resume(
        &self,
        token: &str,
        path: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> reqwest::Response {
        let form = Form::new().part("resume", Part::bytes(content).file_name(file_name.to_string()));
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to upload resume")
    }
}

pub fn test_config(upload_dir: PathBuf, ml_service_url: String) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Job-Match-API Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "memory://".to_string(),
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiration_days: 30,
        ml_service_url,
        upload_dir,
        max_upload_bytes: 5 * 1024 * 1024,
    }
}
