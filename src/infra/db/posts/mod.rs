mod read;
mod types;
mod write;

const POST_COLUMNS: &str = "slug, title, markdown, created_at, updated_at";
