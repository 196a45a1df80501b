mod backend;
mod commands;
mod handlers;

pub use backend::Backend;
pub use commands::{Cli, Commands, DraftAction, DraftCommand};
pub use handlers::{
    handle_create, handle_delete, handle_draft_clear, handle_draft_set, handle_draft_show,
    handle_get, handle_init, handle_list,
};
