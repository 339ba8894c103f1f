pub mod common;
pub mod read_stream;
pub mod write_stream;
