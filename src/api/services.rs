// Typed endpoint methods, grouped by backend service
//
// Every method returns the backend envelope as-is; interpreting `success`
// and `message` is left to the calling view. Path-parameterized endpoints
// substitute the literal id with `endpoints::with_id` and nothing else.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{json, Value};

use super::types::{
    Analysis, AnalysisActionItems, AnalysisKeyIssues, AnalysisRequest, AnalysisSummary, Case,
    CreateCaseRequest, Document, DocumentMetadata, DocumentSearchRequest, Envelope, HealthInfo,
    LoginRequest, LoginResponse, NotificationSettings, Paginated, Recording, RecordingProgress,
    RefreshedToken, RegisterRequest, SearchRequest, SearchResponse, ServicesStatus,
    ShareDocumentRequest, StartRecordingRequest, StartRecordingResponse, ThemePreference,
    Transcript, TranscriptionRequest, UploadResponse, User, UserSettings,
};
use super::{endpoints, ApiClient, ApiError, ApiResult};

fn multipart_form(file_name: &str, bytes: Vec<u8>, metadata: Option<&Value>) -> Form {
    let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
    if let Some(metadata) = metadata {
        form = form.text("metadata", metadata.to_string());
    }
    form
}

// ---------------------------------------------------------------------------
// Authentication

impl ApiClient {
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<Envelope<LoginResponse>> {
        self.post_json(endpoints::auth::LOGIN, credentials).await
    }

    pub async fn register(&self, user: &RegisterRequest) -> ApiResult<Envelope<LoginResponse>> {
        self.post_json(endpoints::auth::REGISTER, user).await
    }

    pub async fn refresh_token(&self) -> ApiResult<Envelope<RefreshedToken>> {
        self.post_empty(endpoints::auth::REFRESH).await
    }

    pub async fn logout(&self) -> ApiResult<Envelope<Value>> {
        self.post_empty(endpoints::auth::LOGOUT).await
    }

    pub async fn profile(&self) -> ApiResult<Envelope<User>> {
        self.get_json(endpoints::auth::PROFILE).await
    }
}

// ---------------------------------------------------------------------------
// Recordings

impl ApiClient {
    pub async fn start_recording(
        &self,
        request: &StartRecordingRequest,
    ) -> ApiResult<Envelope<StartRecordingResponse>> {
        self.post_json(endpoints::recording::START, request).await
    }

    pub async fn stop_recording(&self, recording_id: &str) -> ApiResult<Envelope<Value>> {
        self.post_json(
            endpoints::recording::STOP,
            &json!({ "recordingId": recording_id }),
        )
        .await
    }

    pub async fn pause_recording(&self, recording_id: &str) -> ApiResult<Envelope<Value>> {
        self.post_json(
            endpoints::recording::PAUSE,
            &json!({ "recordingId": recording_id }),
        )
        .await
    }

    pub async fn resume_recording(&self, recording_id: &str) -> ApiResult<Envelope<Value>> {
        self.post_json(
            endpoints::recording::RESUME,
            &json!({ "recordingId": recording_id }),
        )
        .await
    }

    pub async fn upload_recording(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        metadata: Option<&Value>,
    ) -> ApiResult<Envelope<UploadResponse>> {
        let form = multipart_form(file_name, bytes, metadata);
        self.post_multipart(endpoints::recording::UPLOAD, form).await
    }

    pub async fn recording_status(
        &self,
        recording_id: &str,
    ) -> ApiResult<Envelope<RecordingProgress>> {
        let path = format!("{}/{recording_id}", endpoints::recording::STATUS);
        self.get_json(&path).await
    }

    pub async fn recordings(&self, page: u64, limit: u64) -> ApiResult<Paginated<Recording>> {
        self.get_paginated(endpoints::recording::LIST, page, limit)
            .await
    }

    pub async fn delete_recording(&self, recording_id: &str) -> ApiResult<Envelope<Value>> {
        self.delete_json(&endpoints::with_id(endpoints::recording::DELETE, recording_id))
            .await
    }
}

// ---------------------------------------------------------------------------
// Transcriptions

impl ApiClient {
    pub async fn create_transcription(
        &self,
        request: &TranscriptionRequest,
    ) -> ApiResult<Envelope<Transcript>> {
        self.post_json(endpoints::transcription::CREATE, request)
            .await
    }

    pub async fn transcription(&self, transcript_id: &str) -> ApiResult<Envelope<Transcript>> {
        self.get_json(&endpoints::with_id(endpoints::transcription::GET, transcript_id))
            .await
    }

    pub async fn update_transcription(
        &self,
        transcript_id: &str,
        changes: &Value,
    ) -> ApiResult<Envelope<Transcript>> {
        self.put_json(
            &endpoints::with_id(endpoints::transcription::UPDATE, transcript_id),
            changes,
        )
        .await
    }

    pub async fn delete_transcription(&self, transcript_id: &str) -> ApiResult<Envelope<Value>> {
        self.delete_json(&endpoints::with_id(
            endpoints::transcription::DELETE,
            transcript_id,
        ))
        .await
    }

    pub async fn transcriptions(&self, page: u64, limit: u64) -> ApiResult<Paginated<Transcript>> {
        self.get_paginated(endpoints::transcription::LIST, page, limit)
            .await
    }

    pub async fn process_transcription(
        &self,
        recording_id: &str,
    ) -> ApiResult<Envelope<Transcript>> {
        self.post_json(
            endpoints::transcription::PROCESS,
            &json!({ "recordingId": recording_id }),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Analyses

impl ApiClient {
    pub async fn generate_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> ApiResult<Envelope<Analysis>> {
        self.post_json(endpoints::analysis::GENERATE, request).await
    }

    pub async fn analysis(&self, analysis_id: &str) -> ApiResult<Envelope<Analysis>> {
        self.get_json(&endpoints::with_id(endpoints::analysis::GET, analysis_id))
            .await
    }

    pub async fn update_analysis(
        &self,
        analysis_id: &str,
        changes: &Value,
    ) -> ApiResult<Envelope<Analysis>> {
        self.put_json(
            &endpoints::with_id(endpoints::analysis::UPDATE, analysis_id),
            changes,
        )
        .await
    }

    pub async fn delete_analysis(&self, analysis_id: &str) -> ApiResult<Envelope<Value>> {
        self.delete_json(&endpoints::with_id(endpoints::analysis::DELETE, analysis_id))
            .await
    }

    pub async fn analyses(&self, page: u64, limit: u64) -> ApiResult<Paginated<Analysis>> {
        self.get_paginated(endpoints::analysis::LIST, page, limit)
            .await
    }

    pub async fn analysis_summary(
        &self,
        transcript_id: &str,
    ) -> ApiResult<Envelope<AnalysisSummary>> {
        self.post_json(
            endpoints::analysis::SUMMARY,
            &json!({ "transcriptId": transcript_id }),
        )
        .await
    }

    pub async fn analysis_key_issues(
        &self,
        transcript_id: &str,
    ) -> ApiResult<Envelope<AnalysisKeyIssues>> {
        self.post_json(
            endpoints::analysis::KEY_ISSUES,
            &json!({ "transcriptId": transcript_id }),
        )
        .await
    }

    pub async fn analysis_action_items(
        &self,
        transcript_id: &str,
    ) -> ApiResult<Envelope<AnalysisActionItems>> {
        self.post_json(
            endpoints::analysis::ACTION_ITEMS,
            &json!({ "transcriptId": transcript_id }),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Documents

impl ApiClient {
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        case_id: Option<&str>,
        metadata: Option<&DocumentMetadata>,
    ) -> ApiResult<Envelope<UploadResponse>> {
        let mut form =
            Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        if let Some(case_id) = case_id {
            form = form.text("caseId", case_id.to_string());
        }
        if let Some(metadata) = metadata {
            form = form.text("metadata", serde_json::to_string(metadata)?);
        }
        self.post_multipart(endpoints::documents::UPLOAD, form).await
    }

    pub async fn document(&self, document_id: &str) -> ApiResult<Envelope<Document>> {
        self.get_json(&endpoints::with_id(endpoints::documents::GET, document_id))
            .await
    }

    pub async fn update_document(
        &self,
        document_id: &str,
        changes: &Value,
    ) -> ApiResult<Envelope<Document>> {
        self.put_json(
            &endpoints::with_id(endpoints::documents::UPDATE, document_id),
            changes,
        )
        .await
    }

    pub async fn delete_document(&self, document_id: &str) -> ApiResult<Envelope<Value>> {
        self.delete_json(&endpoints::with_id(endpoints::documents::DELETE, document_id))
            .await
    }

    pub async fn documents(&self, page: u64, limit: u64) -> ApiResult<Paginated<Document>> {
        self.get_paginated(endpoints::documents::LIST, page, limit)
            .await
    }

    pub async fn search_documents(
        &self,
        request: &DocumentSearchRequest,
    ) -> ApiResult<Envelope<Vec<Document>>> {
        self.post_json(endpoints::documents::SEARCH, request).await
    }

    pub async fn download_document(&self, document_id: &str) -> ApiResult<Vec<u8>> {
        self.get_bytes(&endpoints::with_id(endpoints::documents::DOWNLOAD, document_id))
            .await
    }

    pub async fn share_document(
        &self,
        document_id: &str,
        request: &ShareDocumentRequest,
    ) -> ApiResult<Envelope<Value>> {
        self.post_json(
            &endpoints::with_id(endpoints::documents::SHARE, document_id),
            request,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Cases

impl ApiClient {
    pub async fn create_case(&self, request: &CreateCaseRequest) -> ApiResult<Envelope<Case>> {
        self.post_json(endpoints::cases::CREATE, request).await
    }

    pub async fn case(&self, case_id: &str) -> ApiResult<Envelope<Case>> {
        self.get_json(&endpoints::with_id(endpoints::cases::GET, case_id))
            .await
    }

    pub async fn update_case(&self, case_id: &str, changes: &Value) -> ApiResult<Envelope<Case>> {
        self.put_json(&endpoints::with_id(endpoints::cases::UPDATE, case_id), changes)
            .await
    }

    pub async fn delete_case(&self, case_id: &str) -> ApiResult<Envelope<Value>> {
        self.delete_json(&endpoints::with_id(endpoints::cases::DELETE, case_id))
            .await
    }

    pub async fn cases(&self, page: u64, limit: u64) -> ApiResult<Paginated<Case>> {
        self.get_paginated(endpoints::cases::LIST, page, limit).await
    }

    pub async fn search_cases(&self, query: &str) -> ApiResult<Envelope<Vec<Case>>> {
        self.post_json(endpoints::cases::SEARCH, &json!({ "query": query }))
            .await
    }

    pub async fn assign_case(&self, case_id: &str, user_id: &str) -> ApiResult<Envelope<Value>> {
        self.post_json(
            &endpoints::with_id(endpoints::cases::ASSIGN, case_id),
            &json!({ "userId": user_id }),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Settings

impl ApiClient {
    pub async fn settings(&self) -> ApiResult<Envelope<UserSettings>> {
        self.get_json(endpoints::settings::GET).await
    }

    pub async fn update_settings(&self, changes: &Value) -> ApiResult<Envelope<UserSettings>> {
        self.put_json(endpoints::settings::UPDATE, changes).await
    }

    pub async fn update_theme(&self, theme: ThemePreference) -> ApiResult<Envelope<Value>> {
        self.put_json(endpoints::settings::THEME, &json!({ "theme": theme }))
            .await
    }

    pub async fn update_notifications(
        &self,
        notifications: &NotificationSettings,
    ) -> ApiResult<Envelope<Value>> {
        self.put_json(endpoints::settings::NOTIFICATIONS, notifications)
            .await
    }
}

// ---------------------------------------------------------------------------
// Search & health

impl ApiClient {
    /// Global legal search. The current backend answers with the bare
    /// response document; older revisions answer with a failure envelope,
    /// which is surfaced as [`ApiError::Backend`].
    pub async fn global_search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        let path = endpoints::search::GLOBAL;
        let builder = self.request(Method::POST, path).json(request);
        let response = self.execute(builder, &Method::POST, path).await?;
        let body = response.text().await?;

        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(primary) => {
                if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(&body) {
                    if !envelope.success {
                        let message = envelope
                            .message
                            .unwrap_or_else(|| "Search failed".to_string());
                        return Err(ApiError::Backend(message));
                    }
                }
                Err(ApiError::Decode(primary))
            }
        }
    }

    pub async fn health(&self) -> ApiResult<Envelope<HealthInfo>> {
        self.get_json(endpoints::HEALTH).await
    }

    pub async fn status(&self) -> ApiResult<Envelope<ServicesStatus>> {
        self.get_json(endpoints::STATUS).await
    }
}
