// Wire types for the legal research backend
//
// CRUD endpoints speak camelCase JSON wrapped in the standard envelope;
// the search and chat endpoints speak snake_case and are not enveloped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform response wrapper returned by non-streaming endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

/// Envelope variant for list endpoints, carrying page bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    #[serde(flatten)]
    pub envelope: Envelope<Vec<T>>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

// ---------------------------------------------------------------------------
// Authentication

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Payload of `/auth/refresh`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RefreshedToken {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub firm_name: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Attorney,
    Paralegal,
    Admin,
}

// ---------------------------------------------------------------------------
// Recordings

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub duration: f64,
    pub file_size: u64,
    pub status: RecordingStatus,
    pub created_at: String,
    pub updated_at: String,
    pub transcript: Option<Transcript>,
    pub analysis: Option<Analysis>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    Recording,
    Completed,
    Processing,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingResponse {
    pub recording_id: String,
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordingProgress {
    pub status: String,
    pub progress: Option<f64>,
}

// ---------------------------------------------------------------------------
// Transcriptions

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub id: String,
    pub recording_id: String,
    pub content: String,
    pub confidence: f64,
    pub language: String,
    pub speakers: Vec<Speaker>,
    pub segments: Vec<TranscriptSegment>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Speaker {
    pub id: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub id: String,
    pub speaker_id: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionRequest {
    pub recording_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Analyses

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub recording_id: String,
    pub transcript_id: String,
    pub summary: String,
    pub key_issues: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub participants: Vec<String>,
    pub duration: String,
    pub confidence: f64,
    pub legal_topics: Vec<LegalTopic>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
    pub status: ActionItemStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionItemStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalTopic {
    pub name: String,
    pub confidence: f64,
    pub relevance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub transcript_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_action_items: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Summary,
    Detailed,
    LegalFocus,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisKeyIssues {
    pub key_issues: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisActionItems {
    pub action_items: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Documents

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: String,
    pub case_id: Option<String>,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub mime_type: String,
    pub content: Option<String>,
    pub metadata: DocumentMetadata,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub confidential: Option<bool>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareDocumentRequest {
    pub email: String,
    pub permissions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Cases

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub case_number: Option<String>,
    pub client_name: Option<String>,
    pub practice_area: Option<String>,
    pub priority: Priority,
    pub created_at: String,
    pub updated_at: String,
    pub documents: Option<Vec<Document>>,
    pub recordings: Option<Vec<Recording>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Active,
    Closed,
    Archived,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

// ---------------------------------------------------------------------------
// Settings

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub id: String,
    pub user_id: String,
    pub theme: ThemePreference,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub audio: AudioSettings,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub recording_complete: bool,
    pub analysis_ready: bool,
    pub document_shared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub data_retention: u32,
    pub auto_delete: bool,
    pub share_analytics: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    pub quality: AudioQuality,
    pub noise_reduction: bool,
    pub auto_transcribe: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    Low,
    Medium,
    High,
}

// ---------------------------------------------------------------------------
// Search

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    /// Legacy field accepted by older backend revisions.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl SearchRequest {
    pub const fn new(query: String) -> Self {
        Self {
            query,
            search_type: None,
            limit: None,
            offset: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub metrics: SearchMetrics,
    pub timestamp: String,
    #[serde(default)]
    pub filters_applied: Value,
    pub total_results: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub source_documents: Vec<SourceDocument>,
    pub validation_status: String,
    pub confidence_score: f64,
    pub legal_areas: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceDocument {
    pub title: String,
    pub case_number: String,
    pub excerpt: String,
    pub source: String,
    pub link_pdf: String,
    pub validation_status: String,
    pub relevance_score: f64,
    pub legal_areas: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchMetrics {
    pub query_time: f64,
    pub retrieval_time: f64,
    pub generation_time: f64,
    pub validation_time: f64,
    pub documents_retrieved: u64,
    pub tokens_used: u64,
    pub cache_hit: bool,
}

// ---------------------------------------------------------------------------
// Uploads & health

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthInfo {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServicesStatus {
    pub status: String,
    pub services: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{
            "success": true,
            "data": {"id": "c-1", "userId": "u-1", "title": "Land dispute",
                     "description": null, "status": "active", "caseNumber": null,
                     "clientName": null, "practiceArea": null, "priority": "high",
                     "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z",
                     "documents": null, "recordings": null},
            "timestamp": "2025-01-01T00:00:01Z"
        }"#;

        let envelope: Envelope<Case> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.title, "Land dispute");
        assert_eq!(envelope.data.status, CaseStatus::Active);
        assert_eq!(envelope.data.priority, Priority::High);
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_paginated_envelope_flattens() {
        let json = r#"{
            "success": true,
            "data": [],
            "timestamp": "2025-01-01T00:00:00Z",
            "pagination": {"page": 2, "limit": 10, "total": 35, "totalPages": 4,
                           "hasNext": true, "hasPrev": true}
        }"#;

        let page: Paginated<Recording> = serde_json::from_str(json).unwrap();
        assert!(page.envelope.success);
        assert!(page.envelope.data.is_empty());
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.total_pages, 4);
        assert!(page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "query": "narkotika",
            "results": [{
                "summary": "Putusan mengenai narkotika",
                "key_points": ["UU 35/2009"],
                "source_documents": [{
                    "title": "Putusan 123/Pid.Sus/2020",
                    "case_number": "123/Pid.Sus/2020",
                    "excerpt": "Menimbang bahwa...",
                    "source": "Mahkamah Agung",
                    "link_pdf": "https://example.com/123.pdf",
                    "validation_status": "validated",
                    "relevance_score": 0.92,
                    "legal_areas": ["pidana"]
                }],
                "validation_status": "validated",
                "confidence_score": 0.88,
                "legal_areas": ["pidana"]
            }],
            "metrics": {"query_time": 0.5, "retrieval_time": 0.2, "generation_time": 1.1,
                        "validation_time": 0.1, "documents_retrieved": 4,
                        "tokens_used": 812, "cache_hit": false},
            "timestamp": "2025-01-01T00:00:00Z",
            "filters_applied": {},
            "total_results": 1,
            "has_more": false
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].source_documents[0].case_number, "123/Pid.Sus/2020");
        assert!(!response.metrics.cache_hit);
        assert_eq!(response.total_results, 1);
    }

    #[test]
    fn test_search_request_skips_absent_legacy_fields() {
        let request = SearchRequest::new("narkotika".to_string());
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query":"narkotika"}"#);
    }

    #[test]
    fn test_search_request_legacy_type_field_name() {
        let request = SearchRequest {
            query: "q".to_string(),
            search_type: Some("documents".to_string()),
            limit: Some(20),
            offset: Some(0),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""type":"documents""#));
    }

    #[test]
    fn test_action_item_status_snake_case() {
        let status: ActionItemStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, ActionItemStatus::InProgress);
    }
}
