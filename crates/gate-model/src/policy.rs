//! Access policy domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a matching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Refuse access.
    Deny,
}

impl Effect {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }

    /// Parses the wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "allow" => Some(Self::Allow),
            "deny" => Some(Self::Deny),
            _ => None,
        }
    }
}

/// An access policy.
///
/// Subjects, resources and actions may be patterns; evaluating them is the
/// policy engine's job and not modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Policy identifier. Empty until the store assigns one.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Principals the rule applies to.
    pub subjects: Vec<String>,
    /// Allow or deny.
    pub effect: Effect,
    /// Resource patterns.
    pub resources: Vec<String>,
    /// Action patterns.
    pub actions: Vec<String>,
    /// When the policy was created.
    pub created_at: DateTime<Utc>,
}

impl Policy {
    /// Creates an empty policy with the given effect.
    #[must_use]
    pub fn new(effect: Effect) -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            subjects: Vec::new(),
            effect,
            resources: Vec::new(),
            actions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Adds a resource pattern.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Adds an action pattern.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Returns true if `subject` is listed verbatim.
    #[must_use]
    pub fn applies_to(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

/// A policy waiting for its subject.
///
/// The root policy must name the root client, whose identifier may only be
/// known once the store has created it. Stores call [`PolicyTemplate::bind`]
/// with the assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTemplate {
    /// Human-readable description.
    pub description: String,
    /// Allow or deny.
    pub effect: Effect,
    /// Resource patterns.
    pub resources: Vec<String>,
    /// Action patterns.
    pub actions: Vec<String>,
}

impl PolicyTemplate {
    /// Produces a policy whose only subject is `subject`.
    #[must_use]
    pub fn bind(&self, subject: impl Into<String>) -> Policy {
        Policy {
            id: String::new(),
            description: self.description.clone(),
            subjects: vec![subject.into()],
            effect: self.effect,
            resources: self.resources.clone(),
            actions: self.actions.clone(),
            created_at: Utc::now(),
        }
    }
}
