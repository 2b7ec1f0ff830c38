mod errors;
mod forms;
mod handlers;

pub(crate) use handlers::{admin_post_action, admin_post_loader, admin_posts};
