//! Database entities.

#![allow(missing_docs)]

pub mod address;
pub mod category;
pub mod chat_interaction;
pub mod contact;
pub mod file;
pub mod login_history;
pub mod note;
pub mod note_analysis;
pub mod note_category;
pub mod note_entity;
pub mod note_history;
pub mod note_recommendation;
pub mod note_subject;
pub mod note_suggestion;
pub mod note_tag;
pub mod notification;
pub mod notification_type;
pub mod review;
pub mod search_log;
pub mod sharing;
pub mod subject;
pub mod user;
pub mod user_interaction;

pub use address::Entity as Address;
pub use category::Entity as Category;
pub use chat_interaction::Entity as ChatInteraction;
pub use contact::Entity as Contact;
pub use file::Entity as File;
pub use login_history::Entity as LoginHistory;
pub use note::Entity as Note;
pub use note_analysis::Entity as NoteAnalysis;
pub use note_category::Entity as NoteCategory;
pub use note_entity::Entity as NoteEntity;
pub use note_history::Entity as NoteHistory;
pub use note_recommendation::Entity as NoteRecommendation;
pub use note_subject::Entity as NoteSubject;
pub use note_suggestion::Entity as NoteSuggestion;
pub use note_tag::Entity as NoteTag;
pub use notification::Entity as Notification;
pub use notification_type::Entity as NotificationType;
pub use review::Entity as Review;
pub use search_log::Entity as SearchLog;
pub use sharing::Entity as Sharing;
pub use subject::Entity as Subject;
pub use user::Entity as User;
pub use user_interaction::Entity as UserInteraction;
