//! Input validation for registration fields

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// Letters, digits and hyphens; must start and end with a letter
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*[a-zA-Z]$").unwrap());

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Hex digits, '.' and ':' (textual IPv4 and IPv6)
static IP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9.:]+$").unwrap());

/// The kinds of value the validator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Username,
    Id,
    Ip,
}

impl FieldKind {
    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Username => &USERNAME_PATTERN,
            Self::Id => &ID_PATTERN,
            Self::Ip => &IP_PATTERN,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Id => write!(f, "id"),
            Self::Ip => write!(f, "ip"),
        }
    }
}

/// Length bounds for each field, in characters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub username_min_length: usize,
    pub username_max_length: usize,
    pub id_min_length: usize,
    pub id_max_length: usize,
    pub ip_min_length: usize,
    pub ip_max_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            username_min_length: 1,
            username_max_length: 45,
            id_min_length: 1,
            id_max_length: 9,
            ip_min_length: 1,
            ip_max_length: 39,
        }
    }
}

impl ValidationConfig {
    /// Inclusive `(min, max)` bounds for a field kind
    pub fn bounds(&self, kind: FieldKind) -> (usize, usize) {
        match kind {
            FieldKind::Username => (self.username_min_length, self.username_max_length),
            FieldKind::Id => (self.id_min_length, self.id_max_length),
            FieldKind::Ip => (self.ip_min_length, self.ip_max_length),
        }
    }

    /// Check that no min bound exceeds its max bound
    pub fn check(&self) -> Result<(), String> {
        for kind in [FieldKind::Username, FieldKind::Id, FieldKind::Ip] {
            let (min, max) = self.bounds(kind);

            if min > max {
                return Err(format!(
                    "{} min length {} exceeds max length {}",
                    kind, min, max
                ));
            }
        }

        Ok(())
    }
}

/// Why a value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Missing,
    Length { length: usize, min: usize, max: usize },
    Characters,
}

/// Stateless validator over configured bounds
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Returns true when `value` is present, within bounds and fully
    /// matches the pattern for `kind`
    pub fn validate(&self, kind: FieldKind, value: Option<&str>) -> bool {
        match self.check(kind, value) {
            Ok(()) => true,
            Err(rejection) => {
                debug!(field = %kind, ?rejection, "Input rejected");
                false
            }
        }
    }

    pub fn validate_username(&self, username: Option<&str>) -> bool {
        self.validate(FieldKind::Username, username)
    }

    pub fn validate_id(&self, id: Option<&str>) -> bool {
        self.validate(FieldKind::Id, id)
    }

    pub fn validate_ip(&self, ip: Option<&str>) -> bool {
        self.validate(FieldKind::Ip, ip)
    }

    /// Same check as `validate`, reporting the reason
    pub fn check(&self, kind: FieldKind, value: Option<&str>) -> Result<(), Rejection> {
        let value = value.ok_or(Rejection::Missing)?;
        let (min, max) = self.config.bounds(kind);
        let length = value.chars().count();

        if length < min || length > max {
            return Err(Rejection::Length { length, min, max });
        }

        if !kind.pattern().is_match(value) {
            return Err(Rejection::Characters);
        }

        Ok(())
    }
}
