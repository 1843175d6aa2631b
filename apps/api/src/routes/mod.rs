pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::resume::handlers;
use crate::resume::mapping::SectionEntry;
use crate::resume::models::{
    Certification, CustomSection, Education, Language, Project, Reference, Skill, WorkExperience,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes).post(handlers::handle_create_resume),
        )
        .route("/api/v1/resumes/search", get(handlers::handle_search_resumes))
        .route("/api/v1/resumes/stats", get(handlers::handle_resume_stats))
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume)
                .put(handlers::handle_replace_resume)
                .delete(handlers::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/duplicate",
            post(handlers::handle_duplicate_resume),
        )
        .route(
            "/api/v1/resumes/:id/personal-info",
            put(handlers::handle_update_personal_info),
        )
        .route("/api/v1/resumes/:id/export", get(handlers::handle_export_resume));

    // Section entries
    let router = section_routes::<WorkExperience>(router);
    let router = section_routes::<Education>(router);
    let router = section_routes::<Skill>(router);
    let router = section_routes::<Project>(router);
    let router = section_routes::<Certification>(router);
    let router = section_routes::<Language>(router);
    let router = section_routes::<Reference>(router);
    let router = section_routes::<CustomSection>(router);

    router.with_state(state)
}

/// `POST /api/v1/resumes/:id/<slug>` and `PUT|DELETE /api/v1/resumes/:id/<slug>/:entry_id`.
fn section_routes<E: SectionEntry>(router: Router<AppState>) -> Router<AppState> {
    let collection = format!("/api/v1/resumes/:id/{}", E::SLUG);
    let entry = format!("{collection}/:entry_id");
    router
        .route(&collection, post(handlers::handle_add_entry::<E>))
        .route(
            &entry,
            put(handlers::handle_update_entry::<E>).delete(handlers::handle_delete_entry::<E>),
        )
}
