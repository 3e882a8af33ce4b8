pub mod notification;
pub mod recipient;

pub use notification::Notification;
pub use recipient::Recipient;
