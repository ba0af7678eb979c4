//! Database repositories.
//!
//! One repository per entity. Reads come in an unscoped flavour
//! (`find_by_id`) for internal use and a caller-scoped flavour
//! (`find_scoped`, `list_scoped`) that applies the ownership rules; handlers
//! only ever use the scoped ones.

mod address;
mod category;
mod chat_interaction;
mod contact;
mod file;
mod login_history;
mod note;
mod note_analysis;
mod note_entity;
mod note_history;
mod note_recommendation;
mod note_suggestion;
mod note_tag;
mod notification;
mod notification_type;
mod review;
mod search_log;
mod sharing;
mod subject;
mod user;
mod user_interaction;

pub use address::AddressRepository;
pub use category::CategoryRepository;
pub use chat_interaction::ChatInteractionRepository;
pub use contact::ContactRepository;
pub use file::FileRepository;
pub use login_history::LoginHistoryRepository;
pub use note::{NoteLinks, NoteRelations, NoteRepository};
pub use note_analysis::NoteAnalysisRepository;
pub use note_entity::NoteEntityRepository;
pub use note_history::NoteHistoryRepository;
pub use note_recommendation::NoteRecommendationRepository;
pub use note_suggestion::NoteSuggestionRepository;
pub use note_tag::NoteTagRepository;
pub use notification::{NotificationRepository, NotificationWithType};
pub use notification_type::NotificationTypeRepository;
pub use review::ReviewRepository;
pub use search_log::SearchLogRepository;
pub use sharing::SharingRepository;
pub use subject::SubjectRepository;
pub use user::UserRepository;
pub use user_interaction::UserInteractionRepository;

use sea_orm::{DatabaseConnection, EntityTrait, PrimaryKeyTrait, TransactionTrait};
use tasknote_common::{AppError, AppResult};

use crate::{deletion, map_db_err};

/// Delete one row by primary key after checking the protect rules, inside a
/// single transaction.
pub(crate) async fn delete_guarded<E>(db: &DatabaseConnection, id: &str) -> AppResult<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<String>,
{
    let entity = E::default();
    let table = entity.table_name();
    let txn = db.begin().await.map_err(map_db_err)?;

    deletion::guard_delete(&txn, table, id).await?;

    let result = E::delete_by_id(id.to_string())
        .exec(&txn)
        .await
        .map_err(map_db_err)?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("{table} {id}")));
    }

    txn.commit().await.map_err(map_db_err)
}
