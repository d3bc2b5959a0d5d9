pub mod exam;
pub mod loaders;
pub mod result;
pub mod task;
pub mod timestamp;

pub use exam::{ApplicantResponse, QuestionRecord};
pub use loaders::{
    build_input_document, decode_input, encode_document, load_input_document, write_json_atomic,
    DecodedInput, InputDocument,
};
pub use result::{EvaluationDocument, EvaluationResult, JobMetadata};
pub use task::{EvaluationTask, QuestionType};
