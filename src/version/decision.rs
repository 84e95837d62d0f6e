//! Update decision for a single module
//!
//! Rules, first applicable wins:
//! 1. Unpinned sources are skipped unless the policy allows pinning them.
//! 2. Sources pinned to a non-version ref are skipped.
//! 3. The target is the explicit version, or else the remote latest refined by
//!    the constraint when one matches.
//! 4. Already at the target: nothing to do.
//! 5. The target is lower than the current pin and downgrades are not allowed: skip.
//! 6. Otherwise apply the target.

use std::fmt;

use tracing::debug;

use crate::version::constraint::Constraint;
use crate::version::error::PolicyError;
use crate::version::model::{ModuleVersion, VersionState};
use crate::version::semver::Tag;

/// How the target version is chosen
#[derive(Debug, Clone)]
pub enum UpdateStrategy {
    /// Use this version; it is not checked against remote tags
    ExplicitVersion(Tag),
    /// Highest remote tag satisfying the constraint, falling back to the latest tag
    Constraint(Constraint),
    /// Latest remote tag
    Latest,
}

#[derive(Debug, Clone)]
pub struct UpdatePolicy {
    pub strategy: UpdateStrategy,
    pub allow_downgrade: bool,
    /// Whether unpinned sources may be pinned by this run
    pub pin_unpinned: bool,
}

impl UpdatePolicy {
    /// Build a policy from user input
    ///
    /// `version` takes precedence over `constraint`; both are validated here so
    /// that bad input fails before any file is touched.
    pub fn from_input(
        version: Option<&str>,
        constraint: Option<&str>,
        allow_downgrade: bool,
        pin_unpinned: bool,
    ) -> Result<Self, PolicyError> {
        let strategy = match (version, constraint) {
            (Some(version), _) => UpdateStrategy::ExplicitVersion(Tag::parse(version).map_err(
                |source| PolicyError::InvalidExplicitVersion {
                    version: version.to_string(),
                    source,
                },
            )?),
            (None, Some(constraint)) => UpdateStrategy::Constraint(Constraint::parse(constraint)?),
            (None, None) => UpdateStrategy::Latest,
        };

        Ok(Self {
            strategy,
            allow_downgrade,
            pin_unpinned,
        })
    }

    /// Whether deciding under this policy needs remote tags
    pub fn needs_remote(&self) -> bool {
        !matches!(self.strategy, UpdateStrategy::ExplicitVersion(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unpinned,
    NonVersionRef(String),
    WouldDowngrade { current: String, target: Tag },
    RemoteNotResolved,
    NoRemoteTags,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unpinned => write!(
                f,
                "unpinned, not requested; re-run with --version-unpinned to pin it"
            ),
            SkipReason::NonVersionRef(name) => write!(f, "pinned to non-version ref {name}"),
            SkipReason::WouldDowngrade { current, target } => write!(
                f,
                "would downgrade: target version {target} is less than current version {current}"
            ),
            SkipReason::RemoteNotResolved => write!(f, "remote tags were not resolved"),
            SkipReason::NoRemoteTags => write!(f, "no remote tags"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Apply(Tag),
    NoOp,
}

/// Decide what to do with `module` under `policy`
///
/// Remote tags must already be set on the module unless the policy is an
/// explicit version.
pub fn decide(module: &ModuleVersion, policy: &UpdatePolicy) -> Decision {
    let decision = decide_inner(module, policy);
    debug!(
        "Decision for {} at {}: {:?}",
        module.canonical_url(),
        module.local_version_label(),
        decision
    );
    decision
}

fn decide_inner(module: &ModuleVersion, policy: &UpdatePolicy) -> Decision {
    match module.current_version() {
        VersionState::Unpinned if !policy.pin_unpinned => {
            return Decision::Skip(SkipReason::Unpinned);
        }
        VersionState::Ref(name) => {
            return Decision::Skip(SkipReason::NonVersionRef(name.clone()));
        }
        _ => {}
    }

    let target = match &policy.strategy {
        UpdateStrategy::ExplicitVersion(version) => version.clone(),
        UpdateStrategy::Latest | UpdateStrategy::Constraint(_) => {
            let Some(remote) = module.remote() else {
                return Decision::Skip(SkipReason::RemoteNotResolved);
            };
            let Some(latest) = remote.latest() else {
                return Decision::Skip(SkipReason::NoRemoteTags);
            };
            match &policy.strategy {
                UpdateStrategy::Constraint(constraint) => remote
                    .latest_matching(constraint)
                    .unwrap_or(latest)
                    .clone(),
                _ => latest.clone(),
            }
        }
    };

    if module.is_at_version(&target) {
        return Decision::NoOp;
    }

    if module.would_downgrade(&target) && !policy.allow_downgrade {
        return Decision::Skip(SkipReason::WouldDowngrade {
            current: module.local_version_label().to_string(),
            target,
        });
    }

    Decision::Apply(target)
}

/// Apply a decision to the module, returning whether it changed
pub fn apply(module: &mut ModuleVersion, decision: &Decision) -> bool {
    match decision {
        Decision::Apply(target) => {
            module.pin_to(target);
            true
        }
        Decision::Skip(_) | Decision::NoOp => false,
    }
}
