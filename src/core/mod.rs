pub mod client;
pub mod facade;
pub mod knowledge;
pub mod llm;
pub mod logging;
