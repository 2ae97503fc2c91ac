pub mod notification;
pub mod verify;

pub use notification::dispatch_notification;
pub use verify::{Verification, verify_subscription};
