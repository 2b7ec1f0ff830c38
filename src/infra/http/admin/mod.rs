mod posts;
mod state;

pub use state::AdminState;

pub(super) use posts::{admin_post_action, admin_post_loader, admin_posts};
