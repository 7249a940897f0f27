//! Verification matrix domain model.
//!
//! A verification matrix is the set of (check, method, threshold) triples a
//! phase must clear. Method descriptors are free text; they are classified
//! exactly once, when the matrix is defined, into a [`CheckKind`] that names
//! the concrete routine family responsible for the check.

use serde::{Deserialize, Serialize};

use super::lscore::LScoreComponent;
use super::phase::Phase;

/// Status of one collected evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Present,
    Missing,
    Inconclusive,
    Contradicted,
}

impl EvidenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Missing => "missing",
            Self::Inconclusive => "inconclusive",
            Self::Contradicted => "contradicted",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "missing" => Some(Self::Missing),
            "inconclusive" => Some(Self::Inconclusive),
            "contradicted" => Some(Self::Contradicted),
            _ => None,
        }
    }

    /// How much this status supports a check, in [0,1].
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Present => 1.0,
            Self::Inconclusive => 0.5,
            Self::Missing | Self::Contradicted => 0.0,
        }
    }
}

/// A single piece of evidence produced by upstream collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Where the evidence came from (file, tool, agent).
    pub source: String,
    pub status: EvidenceStatus,
    #[serde(default)]
    pub notes: String,
    /// Opaque structured payload, interpreted only by specific routines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl EvidenceItem {
    pub fn new(source: impl Into<String>, status: EvidenceStatus) -> Self {
        Self {
            source: source.into(),
            status,
            notes: String::new(),
            payload: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// One row of a verification matrix as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub check: String,
    pub method: String,
    /// Threshold the routine compares its derived value against.
    pub expected: f64,
}

impl MatrixEntry {
    pub fn new(check: impl Into<String>, method: impl Into<String>, expected: f64) -> Self {
        Self {
            check: check.into(),
            method: method.into(),
            expected,
        }
    }
}

/// Family of concrete verification routine a check is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    // Understanding
    CrossReference,
    RequirementTrace,
    AmbiguityScan,
    // Exploration
    DependencyMap,
    PatternSurvey,
    CodebaseCoverage,
    // Architecture
    InterfaceContract,
    CouplingAnalysis,
    DesignConsistency,
    // Implementation
    CompilationCheck,
    StubDetection,
    CodeQuality,
    // Testing
    TestPassRate,
    TestCoverage,
    RegressionCheck,
    // Optimization
    SecurityScan,
    PerformanceProfile,
    ResourceUsage,
    // Delivery
    ReleaseReadiness,
    DocumentationCheck,
    ChangelogCheck,
    /// Fallback when no phase-specific keyword matches.
    Default,
}

impl CheckKind {
    /// Routing order per phase. The first kind whose keywords match wins.
    pub const fn candidates(phase: Phase) -> &'static [CheckKind] {
        match phase {
            Phase::Understanding => &[Self::CrossReference, Self::RequirementTrace, Self::AmbiguityScan],
            Phase::Exploration => &[Self::DependencyMap, Self::PatternSurvey, Self::CodebaseCoverage],
            Phase::Architecture => &[
                Self::InterfaceContract,
                Self::CouplingAnalysis,
                Self::DesignConsistency,
            ],
            Phase::Implementation => &[Self::CompilationCheck, Self::StubDetection, Self::CodeQuality],
            Phase::Testing => &[Self::TestPassRate, Self::TestCoverage, Self::RegressionCheck],
            Phase::Optimization => &[Self::SecurityScan, Self::PerformanceProfile, Self::ResourceUsage],
            Phase::Delivery => &[
                Self::ReleaseReadiness,
                Self::DocumentationCheck,
                Self::ChangelogCheck,
            ],
        }
    }

    /// Lower-case keywords matched against method descriptors and evidence sources.
    pub const fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::CrossReference => &["cross-reference", "cross reference", "crossref"],
            Self::RequirementTrace => &["requirement", "traceab", "trace"],
            Self::AmbiguityScan => &["ambigu", "clarif", "assumption"],
            Self::DependencyMap => &["dependenc", "import graph"],
            Self::PatternSurvey => &["pattern", "convention"],
            Self::CodebaseCoverage => &["coverage", "survey", "explor", "inventory"],
            Self::InterfaceContract => &["interface", "contract", "api"],
            Self::CouplingAnalysis => &["coupling", "cohesion", "layer"],
            Self::DesignConsistency => &["consisten", "design", "decision"],
            Self::CompilationCheck => &["compil", "build", "type-check", "typecheck"],
            Self::StubDetection => &["stub", "todo", "placeholder", "unimplemented"],
            Self::CodeQuality => &["lint", "quality", "maintainab", "complexity"],
            Self::TestPassRate => &["pass rate", "pass-rate", "passing", "test result"],
            Self::TestCoverage => &["coverage"],
            Self::RegressionCheck => &["regression", "flaky"],
            Self::SecurityScan => &["owasp", "security", "vulnerab", "cve"],
            Self::PerformanceProfile => &["performance", "latency", "benchmark", "throughput"],
            Self::ResourceUsage => &["memory", "resource", "allocation"],
            Self::ReleaseReadiness => &["release", "deploy", "readiness", "ship"],
            Self::DocumentationCheck => &["doc", "readme"],
            Self::ChangelogCheck => &["changelog", "version"],
            Self::Default => &[],
        }
    }

    /// L-Score component blended into this routine's signal, if any.
    pub const fn lscore_component(&self) -> Option<LScoreComponent> {
        match self {
            Self::CrossReference
            | Self::AmbiguityScan
            | Self::DesignConsistency
            | Self::CompilationCheck
            | Self::TestPassRate => Some(LScoreComponent::Accuracy),
            Self::RequirementTrace
            | Self::DependencyMap
            | Self::CodebaseCoverage
            | Self::StubDetection
            | Self::ReleaseReadiness => Some(LScoreComponent::Completeness),
            Self::PatternSurvey
            | Self::InterfaceContract
            | Self::CouplingAnalysis
            | Self::CodeQuality
            | Self::DocumentationCheck => Some(LScoreComponent::Maintainability),
            Self::TestCoverage | Self::RegressionCheck => Some(LScoreComponent::TestCoverage),
            Self::SecurityScan => Some(LScoreComponent::Security),
            Self::PerformanceProfile | Self::ResourceUsage => Some(LScoreComponent::Performance),
            Self::ChangelogCheck | Self::Default => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrossReference => "cross_reference",
            Self::RequirementTrace => "requirement_trace",
            Self::AmbiguityScan => "ambiguity_scan",
            Self::DependencyMap => "dependency_map",
            Self::PatternSurvey => "pattern_survey",
            Self::CodebaseCoverage => "codebase_coverage",
            Self::InterfaceContract => "interface_contract",
            Self::CouplingAnalysis => "coupling_analysis",
            Self::DesignConsistency => "design_consistency",
            Self::CompilationCheck => "compilation_check",
            Self::StubDetection => "stub_detection",
            Self::CodeQuality => "code_quality",
            Self::TestPassRate => "test_pass_rate",
            Self::TestCoverage => "test_coverage",
            Self::RegressionCheck => "regression_check",
            Self::SecurityScan => "security_scan",
            Self::PerformanceProfile => "performance_profile",
            Self::ResourceUsage => "resource_usage",
            Self::ReleaseReadiness => "release_readiness",
            Self::DocumentationCheck => "documentation_check",
            Self::ChangelogCheck => "changelog_check",
            Self::Default => "default",
        }
    }

    /// Whether `text` (already lower-cased) mentions any of this kind's keywords.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords().iter().any(|k| lowered.contains(k))
    }

    /// Classify a method descriptor for a phase.
    ///
    /// Runs once per entry at matrix-definition time. Unmatched descriptors
    /// fall back to [`CheckKind::Default`].
    pub fn classify(phase: Phase, method: &str) -> Self {
        let lowered = method.to_lowercase();
        Self::candidates(phase)
            .iter()
            .copied()
            .find(|kind| kind.matches(&lowered))
            .unwrap_or(Self::Default)
    }
}

/// A matrix entry together with the routine family it was classified into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCheck {
    pub entry: MatrixEntry,
    pub kind: CheckKind,
}

/// The full set of checks required to clear one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationMatrix {
    phase: Phase,
    checks: Vec<ClassifiedCheck>,
}

impl VerificationMatrix {
    /// Define a matrix, classifying each entry's method descriptor.
    pub fn define(phase: Phase, entries: Vec<MatrixEntry>) -> Self {
        let checks = entries
            .into_iter()
            .map(|entry| {
                let kind = CheckKind::classify(phase, &entry.method);
                ClassifiedCheck { entry, kind }
            })
            .collect();
        Self { phase, checks }
    }

    /// The standard three-check matrix for a phase.
    pub fn standard(phase: Phase) -> Self {
        let entries = match phase {
            Phase::Understanding => vec![
                MatrixEntry::new("Requirements corroborated", "Cross-reference requirements against sources", 0.75),
                MatrixEntry::new("Requirements traced", "Requirement traceability to user intent", 0.7),
                MatrixEntry::new("Ambiguities resolved", "Ambiguity and assumption review", 0.6),
            ],
            Phase::Exploration => vec![
                MatrixEntry::new("Dependencies mapped", "Dependency graph inventory", 0.75),
                MatrixEntry::new("Conventions identified", "Pattern and convention survey", 0.7),
                MatrixEntry::new("Codebase explored", "Exploration coverage of relevant modules", 0.7),
            ],
            Phase::Architecture => vec![
                MatrixEntry::new("Interfaces specified", "Interface contract review", 0.8),
                MatrixEntry::new("Coupling bounded", "Coupling and cohesion analysis", 0.7),
                MatrixEntry::new("Design consistent", "Design decision consistency check", 0.75),
            ],
            Phase::Implementation => vec![
                MatrixEntry::new("Code compiles", "Compile and type-check the workspace", 0.9),
                MatrixEntry::new("No stubs left", "Stub and placeholder detection", 0.9),
                MatrixEntry::new("Code quality", "Lint and complexity quality gate", 0.75),
            ],
            Phase::Testing => vec![
                MatrixEntry::new("Tests pass", "Test pass rate", 0.95),
                MatrixEntry::new("Coverage adequate", "Line coverage measurement", 0.8),
                MatrixEntry::new("No regressions", "Regression suite comparison", 0.85),
            ],
            Phase::Optimization => vec![
                MatrixEntry::new("Security audit", "OWASP top-10 security scan", 0.9),
                MatrixEntry::new("Performance budget", "Performance benchmark against budget", 0.8),
                MatrixEntry::new("Resource usage", "Memory and resource profiling", 0.75),
            ],
            Phase::Delivery => vec![
                MatrixEntry::new("Release ready", "Release readiness checklist", 0.9),
                MatrixEntry::new("Docs complete", "Documentation and README review", 0.85),
                MatrixEntry::new("Changelog updated", "Changelog and version bump", 0.8),
            ],
        };
        Self::define(phase, entries)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn checks(&self) -> &[ClassifiedCheck] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Value a concrete routine derived and whether it cleared the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub actual: f64,
    pub passed: bool,
}

impl CheckOutcome {
    /// Outcome for a check that could not evaluate its evidence.
    pub const fn unverifiable() -> Self {
        Self {
            actual: 0.0,
            passed: false,
        }
    }
}

/// Result of executing one matrix entry. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationCheckResult {
    pub check: String,
    pub method: String,
    pub expected: f64,
    pub actual: f64,
    pub passed: bool,
}
