pub mod connect;
pub mod note;
pub mod store;

pub use connect::AnkiConnect;
pub use note::{AudioAttachment, Note, NoteFields, NoteTemplate};
pub use store::{MockNoteStore, NoteStore};
