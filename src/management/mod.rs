mod token;

pub use token::FileTokenStore;
pub use token::MemoryTokenStore;
pub use token::TokenStore;
