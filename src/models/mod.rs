pub mod coffee;
pub mod event;
pub mod reminder;
pub mod swipe;
pub mod user;

pub use coffee::*;
pub use event::*;
pub use reminder::*;
pub use swipe::*;
pub use user::*;
