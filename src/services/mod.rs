pub mod credentials;
pub mod extract;
pub mod gemini;
pub mod relay;
