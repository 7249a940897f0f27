pub mod case_file;
pub mod config;
pub mod coordination;
pub mod gate;
pub mod lscore;
pub mod phase;
pub mod verification;

pub use case_file::{
    AdversarialFinding, CaseFile, ChainOfCustody, Confidence, CustodyEvent, InvestigationTier,
    Verdict,
};
pub use config::{
    AwarenessConfig, Config, EscalationConfig, LScoreConfig, LoggingConfig, VerdictConfig,
};
pub use coordination::{AgentProgress, AgentStatus, ClaimOperation, FileClaim, OutputSummary};
pub use gate::{
    AttemptRecord, GateState, PhaseAttempt, PhaseExecutionResult, PhaseValidation,
    ValidationContext, ValidationOutcome,
};
pub use lscore::{LScoreBreakdown, LScoreComponent, LScoreComponents};
pub use phase::{get_phase_threshold, Phase};
pub use verification::{
    CheckKind, CheckOutcome, ClassifiedCheck, EvidenceItem, EvidenceStatus, MatrixEntry,
    VerificationCheckResult, VerificationMatrix,
};
