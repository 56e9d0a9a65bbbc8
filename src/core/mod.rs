pub mod corpus;
pub mod reader;
pub mod record;
pub mod types;
