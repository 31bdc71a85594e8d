pub mod audience;
pub mod dispatcher;
pub mod posts;

pub use audience::ConversationIndex;
pub use dispatcher::NotificationDispatcher;
pub use posts::PostService;
