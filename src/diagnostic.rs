use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::NodePath;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    UndefinedState,
    UndefinedAction,
    UndefinedStyle,
    UndefinedVariant,
    UndefinedImport,
    ComponentNotFound,
    ComponentPropMissing,
    ComponentCycle,
    ParamUndefined,
    SlotOutsideComponent,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UndefinedState => "UNDEFINED_STATE",
            DiagnosticCode::UndefinedAction => "UNDEFINED_ACTION",
            DiagnosticCode::UndefinedStyle => "UNDEFINED_STYLE",
            DiagnosticCode::UndefinedVariant => "UNDEFINED_VARIANT",
            DiagnosticCode::UndefinedImport => "UNDEFINED_IMPORT",
            DiagnosticCode::ComponentNotFound => "COMPONENT_NOT_FOUND",
            DiagnosticCode::ComponentPropMissing => "COMPONENT_PROP_MISSING",
            DiagnosticCode::ComponentCycle => "COMPONENT_CYCLE",
            DiagnosticCode::ParamUndefined => "PARAM_UNDEFINED",
            DiagnosticCode::SlotOutsideComponent => "SLOT_OUTSIDE_COMPONENT",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticContext {
    pub available_names: Vec<String>,
}

/// A single reported defect. Created once, never mutated after the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<DiagnosticContext>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, path: &NodePath) -> Self {
        Self::with_details(code, message, path, None, None)
    }

    pub fn with_details(
        code: DiagnosticCode,
        message: impl Into<String>,
        path: &NodePath,
        suggestion: Option<String>,
        available_names: Option<Vec<String>>,
    ) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            path: path.as_str().to_string(),
            suggestion,
            context: available_names.map(|available_names| DiagnosticContext { available_names }),
        }
    }

    /// Names visible at the failing reference, if the check recorded them.
    pub fn available_names(&self) -> Option<&[String]> {
        self.context.as_ref().map(|c| c.available_names.as_slice())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.path)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PASS RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one analyzer pass. Serializes as `{ "ok": true }` or
/// `{ "ok": false, "errors": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeResult {
    Ok,
    Failed(Vec<Diagnostic>),
}

impl AnalyzeResult {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            AnalyzeResult::Ok
        } else {
            AnalyzeResult::Failed(diagnostics)
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AnalyzeResult::Ok)
    }

    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            AnalyzeResult::Ok => &[],
            AnalyzeResult::Failed(errors) => errors,
        }
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        match self {
            AnalyzeResult::Ok => Vec::new(),
            AnalyzeResult::Failed(errors) => errors,
        }
    }
}

impl Serialize for AnalyzeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalyzeResult::Ok => {
                let mut state = serializer.serialize_struct("AnalyzeResult", 1)?;
                state.serialize_field("ok", &true)?;
                state.end()
            }
            AnalyzeResult::Failed(errors) => {
                let mut state = serializer.serialize_struct("AnalyzeResult", 2)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("errors", errors)?;
                state.end()
            }
        }
    }
}
