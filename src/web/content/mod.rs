mod articles;
mod contact;
mod forum;
mod images;
mod quotes;

pub use articles::{
    create_blog, create_story, delete_blog, delete_story, get_blog, get_story, list_blogs,
    list_stories, update_blog, update_story,
};
pub use contact::{delete_contact_message, list_contact_messages, send_contact};
pub use forum::{create_forum_post, delete_forum_post, list_forum_posts};
pub use images::upload_image;
pub use quotes::{create_quote, delete_quote, get_quote, list_quotes, update_quote};
