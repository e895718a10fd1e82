pub mod categories;
pub mod comments;
pub mod pagination;
pub mod posts;
pub mod response;
pub mod users;
