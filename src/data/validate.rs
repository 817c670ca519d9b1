use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::data::profile::{ConversionProfile, RoleModifiers, TierTargets, Tolerance};
use crate::data::role::CreatureRole;

pub const AC_TARGET_RANGE: RangeInclusive<i32> = 0..=100;
pub const HP_TARGET_RANGE: RangeInclusive<i32> = 1..=10_000;
pub const ATTACK_BONUS_TARGET_RANGE: RangeInclusive<i32> = 0..=100;
pub const MAX_DPR_TARGET: f64 = 10_000.0;
pub const MAX_ROLE_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Structural checks on a profile: identity fields present, tier targets in range and
/// non-decreasing, role factors positive and bounded, tolerances non-negative.
pub fn validate_profile(profile: &ConversionProfile) -> ValidationReport {
    let mut report = ValidationReport::default();
    let base_context = format!("profile '{}'", profile.id);

    for (field, value) in [
        ("id", &profile.id),
        ("version", &profile.version),
        ("display_name", &profile.display_name),
    ] {
        if value.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{base_context}.{field}"),
                format!("missing non-empty '{field}'"),
            );
        }
    }

    validate_tiers(&mut report, profile, &base_context);

    for role in CreatureRole::ALL {
        validate_role(
            &mut report,
            profile.role_modifiers.get(role),
            &format!("{base_context}.role_modifiers.{role}"),
        );
    }

    validate_tolerance(&mut report, &profile.tolerance, &base_context);

    report
}

fn validate_tiers(report: &mut ValidationReport, profile: &ConversionProfile, base_context: &str) {
    let mut previous: Option<&TierTargets> = None;
    let mut with_morale = 0usize;
    for (tier, targets) in profile.base_tier_targets.iter() {
        let context = format!("{base_context}.base_tier_targets.{tier}");
        for (column, value, range) in [
            ("ac_target", targets.ac_target, AC_TARGET_RANGE),
            ("hp_target", targets.hp_target, HP_TARGET_RANGE),
            ("attack_bonus_target", targets.attack_bonus_target, ATTACK_BONUS_TARGET_RANGE),
        ] {
            if !range.contains(&value) {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.{column}"),
                    format!("must be within {}..={}, got {value}", range.start(), range.end()),
                );
            }
        }
        if !targets.dpr_target.is_finite()
            || targets.dpr_target <= 0.0
            || targets.dpr_target > MAX_DPR_TARGET
        {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.dpr_target"),
                format!(
                    "must be a positive number up to {MAX_DPR_TARGET}, got {}",
                    targets.dpr_target
                ),
            );
        }
        if targets.morale_target.is_some() {
            with_morale += 1;
        }

        if let Some(prev) = previous {
            let columns = [
                ("ac_target", f64::from(prev.ac_target), f64::from(targets.ac_target)),
                ("hp_target", f64::from(prev.hp_target), f64::from(targets.hp_target)),
                (
                    "attack_bonus_target",
                    f64::from(prev.attack_bonus_target),
                    f64::from(targets.attack_bonus_target),
                ),
                ("dpr_target", prev.dpr_target, targets.dpr_target),
            ];
            for (column, lower, current) in columns {
                if current < lower {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.{column}"),
                        format!("decreases from previous tier ({lower} -> {current})"),
                    );
                }
            }
            if let (Some(lower), Some(current)) = (prev.morale_target, targets.morale_target) {
                if current < lower {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.morale_target"),
                        format!("decreases from previous tier ({lower} -> {current})"),
                    );
                }
            }
        }
        previous = Some(targets);
    }

    let tier_count = profile.base_tier_targets.iter().count();
    if with_morale != 0 && with_morale != tier_count {
        report.push(
            ValidationSeverity::Warning,
            format!("{base_context}.base_tier_targets"),
            "morale_target is set on some tiers but not others",
        );
    }
    if profile.show_morale && with_morale == 0 {
        report.push(
            ValidationSeverity::Warning,
            format!("{base_context}.show_morale"),
            "show_morale is set but no tier defines morale_target; cards will show morale 0",
        );
    }
    if !profile.show_morale && with_morale > 0 {
        report.push(
            ValidationSeverity::Info,
            format!("{base_context}.show_morale"),
            "morale targets are defined but hidden on cards",
        );
    }
}

fn validate_role(report: &mut ValidationReport, modifiers: &RoleModifiers, context: &str) {
    for (field, value) in [
        ("ac", modifiers.ac),
        ("hp", modifiers.hp),
        ("attack_bonus", modifiers.attack_bonus),
        ("dpr", modifiers.dpr),
    ] {
        if !value.is_finite() || value <= 0.0 || value > MAX_ROLE_FACTOR {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}"),
                format!("factor must be positive and at most {MAX_ROLE_FACTOR}, got {value}"),
            );
        }
    }
}

fn validate_tolerance(report: &mut ValidationReport, tolerance: &Tolerance, base_context: &str) {
    for (field, value) in [
        ("ac", tolerance.ac),
        ("hp", tolerance.hp),
        ("attack_bonus", tolerance.attack_bonus),
        ("dpr", tolerance.dpr),
    ] {
        if !value.is_finite() || value < 0.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{base_context}.tolerance.{field}"),
                format!("must be non-negative, got {value}"),
            );
        }
    }
    for (field, value) in [("hp", tolerance.hp), ("dpr", tolerance.dpr)] {
        if value >= 1.0 {
            report.push(
                ValidationSeverity::Warning,
                format!("{base_context}.tolerance.{field}"),
                format!("fractional tolerance {value} accepts anything from zero upward"),
            );
        }
    }
}
