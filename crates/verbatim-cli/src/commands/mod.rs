//! Command implementations.

pub mod chat;
pub mod mask;
pub mod quotes;
pub mod themes;

pub use self::chat::execute_chat;
pub use self::mask::execute_mask;
pub use self::quotes::execute_quotes;
pub use self::themes::execute_themes;
