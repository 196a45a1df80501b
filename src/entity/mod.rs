mod note;
mod tag;

pub use note::{
    FetchNotesParams, Note, NoteDraft, NoteFormValues, NoteListResponse, DEFAULT_PER_PAGE,
};
pub use tag::NoteTag;
