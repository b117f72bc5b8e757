//! Property tests.

mod head_parsing;
