// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod kernel_fetch;
pub mod nominatim;
pub mod openai;
pub mod terminal;

pub use kernel_fetch::{download_client, ensure_kernel, ensure_kernel_for};
pub use nominatim::NominatimResolver;
pub use openai::OpenAiChatClient;
pub use terminal::TerminalSink;
