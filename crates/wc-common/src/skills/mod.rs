pub mod matcher;
pub mod normalizer;
pub mod vocabulary;
