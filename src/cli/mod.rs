mod commands;
mod handlers;

pub use commands::{Cli, Commands, IdentityArgs};
pub use handlers::{
    handle_attach, handle_decide, handle_delete, handle_history, handle_init, handle_list,
    handle_overview, handle_show, handle_submit,
};
