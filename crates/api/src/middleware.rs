//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use tasknote_common::{Config, StorageBackend};
use tasknote_core::{
    AddressService, CategoryService, ChatInteractionService, ContactService, FileService,
    LoginHistoryService, NoteAnalysisService, NoteEntityService, NoteHistoryService,
    NoteRecommendationService, NoteService, NoteSuggestionService, NoteTagService,
    NotificationService, NotificationTypeService, ReviewService, SearchLogService,
    SharingService, SubjectService, TokenService, UserInteractionService, UserService,
};
use tasknote_db::repositories::{
    AddressRepository, CategoryRepository, ChatInteractionRepository, ContactRepository,
    FileRepository, LoginHistoryRepository, NoteAnalysisRepository, NoteEntityRepository,
    NoteHistoryRepository, NoteRecommendationRepository, NoteRepository,
    NoteSuggestionRepository, NoteTagRepository, NotificationRepository,
    NotificationTypeRepository, ReviewRepository, SearchLogRepository, SharingRepository,
    SubjectRepository, UserInteractionRepository, UserRepository,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Believe client addresses from proxy headers.
    pub trust_proxy: bool,
    pub token_service: TokenService,
    pub user_service: UserService,
    pub login_history_service: LoginHistoryService,
    pub address_service: AddressService,
    pub contact_service: ContactService,
    pub note_service: NoteService,
    pub category_service: CategoryService,
    pub subject_service: SubjectService,
    pub file_service: FileService,
    pub sharing_service: SharingService,
    pub notification_service: NotificationService,
    pub notification_type_service: NotificationTypeService,
    pub review_service: ReviewService,
    pub note_analysis_service: NoteAnalysisService,
    pub note_suggestion_service: NoteSuggestionService,
    pub chat_interaction_service: ChatInteractionService,
    pub note_recommendation_service: NoteRecommendationService,
    pub search_log_service: SearchLogService,
    pub note_tag_service: NoteTagService,
    pub note_entity_service: NoteEntityService,
    pub user_interaction_service: UserInteractionService,
    pub note_history_service: NoteHistoryService,
}

impl AppState {
    /// Wire every repository and service onto one connection pool.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn StorageBackend>,
        config: &Config,
    ) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let note_repo = NoteRepository::new(Arc::clone(&db));
        let category_repo = CategoryRepository::new(Arc::clone(&db));
        let subject_repo = SubjectRepository::new(Arc::clone(&db));
        let notification_type_repo = NotificationTypeRepository::new(Arc::clone(&db));

        Self {
            trust_proxy: config.server.trust_proxy,
            token_service: TokenService::new(&config.auth),
            user_service: UserService::new(user_repo.clone()),
            login_history_service: LoginHistoryService::new(LoginHistoryRepository::new(
                Arc::clone(&db),
            )),
            address_service: AddressService::new(AddressRepository::new(Arc::clone(&db))),
            contact_service: ContactService::new(ContactRepository::new(Arc::clone(&db))),
            note_service: NoteService::new(
                note_repo.clone(),
                category_repo.clone(),
                subject_repo.clone(),
                Arc::clone(&storage),
            ),
            category_service: CategoryService::new(category_repo),
            subject_service: SubjectService::new(subject_repo),
            file_service: FileService::new(
                FileRepository::new(Arc::clone(&db)),
                note_repo.clone(),
                storage,
            ),
            sharing_service: SharingService::new(
                SharingRepository::new(Arc::clone(&db)),
                note_repo.clone(),
                user_repo.clone(),
            ),
            notification_service: NotificationService::new(
                NotificationRepository::new(Arc::clone(&db)),
                notification_type_repo.clone(),
                note_repo.clone(),
            ),
            notification_type_service: NotificationTypeService::new(notification_type_repo),
            review_service: ReviewService::new(
                ReviewRepository::new(Arc::clone(&db)),
                note_repo.clone(),
                user_repo.clone(),
            ),
            note_analysis_service: NoteAnalysisService::new(
                NoteAnalysisRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            note_suggestion_service: NoteSuggestionService::new(
                NoteSuggestionRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            chat_interaction_service: ChatInteractionService::new(
                ChatInteractionRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            note_recommendation_service: NoteRecommendationService::new(
                NoteRecommendationRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            search_log_service: SearchLogService::new(SearchLogRepository::new(Arc::clone(&db))),
            note_tag_service: NoteTagService::new(
                NoteTagRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            note_entity_service: NoteEntityService::new(
                NoteEntityRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            user_interaction_service: UserInteractionService::new(
                UserInteractionRepository::new(Arc::clone(&db)),
                note_repo.clone(),
            ),
            note_history_service: NoteHistoryService::new(
                NoteHistoryRepository::new(db),
                note_repo,
                user_repo,
            ),
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <access token>` to a [`Caller`] in the
/// request extensions. Requests without a usable token pass through
/// anonymously; handlers that need a caller reject them.
///
/// [`Caller`]: tasknote_db::Caller
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match state.token_service.verify_access(&token) {
            Ok(claims) => match state.user_service.resolve_caller(&claims.sub).await {
                Ok(caller) => {
                    req.extensions_mut().insert(caller);
                }
                Err(e) => debug!(user_id = %claims.sub, error = %e, "Token subject refused"),
            },
            Err(e) => debug!(error = %e, "Bearer token refused"),
        }
    }

    next.run(req).await
}
