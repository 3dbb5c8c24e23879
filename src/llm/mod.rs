pub mod prompts;
pub mod types;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod analyst;
#[cfg(feature = "gemini")]
pub mod client;
#[cfg(feature = "gemini")]
pub mod documents;
#[cfg(feature = "gemini")]
pub mod forecasting;

pub use prompts::*;
pub use types::*;
pub use utils::*;

#[cfg(feature = "gemini")]
pub use analyst::*;
#[cfg(feature = "gemini")]
pub use client::*;
#[cfg(feature = "gemini")]
pub use documents::*;
#[cfg(feature = "gemini")]
pub use forecasting::*;
