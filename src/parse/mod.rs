pub mod task_parser;
pub mod task_serializer;

pub use task_parser::{parse_heading, parse_task_line, parse_tasks};
pub use task_serializer::{encode_document, encode_tasks, serialize_tasks};
