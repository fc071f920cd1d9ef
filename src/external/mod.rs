pub mod mailer;
pub mod pusher;

pub use mailer::Mailer;
pub use pusher::PushService;
