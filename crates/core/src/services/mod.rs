//! Business logic services.

#![allow(missing_docs)]

pub mod address;
pub mod category;
pub mod chat_interaction;
pub mod contact;
pub mod file;
pub mod login_history;
pub mod note;
pub mod note_analysis;
pub mod note_entity;
pub mod note_history;
pub mod note_recommendation;
pub mod note_suggestion;
pub mod note_tag;
pub mod notification;
pub mod notification_type;
pub mod review;
pub mod search_log;
pub mod sharing;
pub mod subject;
pub mod token;
pub mod user;
pub mod user_interaction;

pub use address::{AddressInput, AddressPatch, AddressService};
pub use category::{CategoryInput, CategoryPatch, CategoryService};
pub use chat_interaction::{ChatInteractionInput, ChatInteractionPatch, ChatInteractionService};
pub use contact::{ContactInput, ContactPatch, ContactService};
pub use file::{FilePatch, FileService, FileUpload};
pub use login_history::{LoginHistoryInput, LoginHistoryPatch, LoginHistoryService};
pub use note::{NoteInput, NotePatch, NoteService, NoteWithRelations};
pub use note_analysis::{NoteAnalysisInput, NoteAnalysisPatch, NoteAnalysisService};
pub use note_entity::{NoteEntityInput, NoteEntityPatch, NoteEntityService};
pub use note_history::{
    NoteHistoryInput, NoteHistoryPatch, NoteHistoryService, NoteHistoryWithEditor,
};
pub use note_recommendation::{
    NoteRecommendationInput, NoteRecommendationPatch, NoteRecommendationService,
};
pub use note_suggestion::{NoteSuggestionInput, NoteSuggestionPatch, NoteSuggestionService};
pub use note_tag::{NoteTagInput, NoteTagPatch, NoteTagService};
pub use notification::{NotificationInput, NotificationPatch, NotificationService};
pub use notification_type::{NotificationTypeInput, NotificationTypePatch, NotificationTypeService};
pub use review::{ReviewInput, ReviewPatch, ReviewService, ReviewWithReviewer};
pub use search_log::{SearchLogInput, SearchLogPatch, SearchLogService};
pub use sharing::{SharingInput, SharingPatch, SharingService};
pub use subject::{SubjectInput, SubjectPatch, SubjectService};
pub use token::{Claims, TokenPair, TokenService, TokenType};
pub use user::{CreateUserInput, LoginInput, UpdateUserInput, UserPatch, UserService};
pub use user_interaction::{UserInteractionInput, UserInteractionPatch, UserInteractionService};

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use tasknote_common::{AppError, AppResult};
use tasknote_db::Caller;
use tasknote_db::entities::note::Model as NoteModel;
use tasknote_db::repositories::{NoteRepository, UserRepository};

/// Current time as stored in the database.
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("{what} not found"))
}

/// Resolve a note the caller owns. Anything else reads as missing.
pub(crate) async fn owned_note(
    notes: &NoteRepository,
    caller: &Caller,
    note_id: &str,
) -> AppResult<NoteModel> {
    notes
        .find_scoped(caller, note_id)
        .await?
        .ok_or_else(|| not_found("Note"))
}

/// Resolve a note the caller owns or has been shared.
pub(crate) async fn visible_note(
    notes: &NoteRepository,
    caller: &Caller,
    note_id: &str,
) -> AppResult<NoteModel> {
    notes
        .find_visible(caller, note_id)
        .await?
        .ok_or_else(|| not_found("Note"))
}

/// Map user ids to usernames, for records that show a user by name.
pub(crate) async fn usernames<'a, I>(users: &UserRepository, ids: I) -> AppResult<HashMap<String, String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<String> = ids.into_iter().map(str::to_string).collect();
    ids.sort_unstable();
    ids.dedup();

    Ok(users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect())
}

/// Deserialize a present field as `Some`, so that an explicit `null` in a
/// PATCH body reads as `Some(None)` rather than "absent".
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
