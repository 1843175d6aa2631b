use crate::resume::repository::ResumeRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Repository facade over the SQLite aggregate store. Cheap to clone (wraps the pool).
    pub resumes: ResumeRepository,
}
