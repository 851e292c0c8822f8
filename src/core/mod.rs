pub mod narrator;
pub mod session;
pub mod zodiac;

pub use narrator::FortuneNarrator;
pub use session::{CollectingSink, FallbackPlace, FortuneSession, SessionStage};
pub use zodiac::zodiac_sign;
