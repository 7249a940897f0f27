pub mod case_file_builder;
pub mod check_routines;
pub mod escalation;
pub mod forensic_validator;
pub mod lscore_calculator;
pub mod phase_gate;
pub mod situational_awareness;
pub mod verification_matrix;

pub use case_file_builder::{render_report, CaseFileBuilder, CaseFileParams};
pub use check_routines::{
    builtin_routines, CrossReferenceCheck, DefaultCheck, EvidenceCheck, StubDetectionCheck,
    TestPassRateCheck,
};
pub use escalation::EscalationPolicy;
pub use forensic_validator::ForensicValidator;
pub use lscore_calculator::LScoreCalculator;
pub use phase_gate::{handle_guilty_verdict, meets_phase_threshold, PhaseGate};
pub use situational_awareness::{SituationalAwarenessBuilder, NO_ACTIVITY_PLACEHOLDER};
pub use verification_matrix::{pass_rate, VerificationMatrixEngine};
