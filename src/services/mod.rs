pub mod evaluator;
pub mod score_report;

pub use evaluator::{evaluate, normalize_answer, Verdict};
pub use score_report::{PointsLedger, ScoreReport, SessionScore};
