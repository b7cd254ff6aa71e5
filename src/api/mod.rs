pub mod client;
pub mod token_store;
pub mod tokens;

pub use client::ApiClient;
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
pub use tokens::SessionTokens;
