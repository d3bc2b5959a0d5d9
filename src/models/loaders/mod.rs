pub mod input_builder;
pub mod json_loader;

pub use input_builder::{build_input_document, InputDocument};
pub use json_loader::{
    decode_input, encode_document, load_input_document, stage_json, write_json_atomic, DecodedInput,
    StagedFile,
};
