//! Value Objects - Equal when their values are equal
//!
//! Construction always runs normalize first, then validate:
//!
//! - normalize unifies representation (trimming, case folding, dedup) and
//!   has no side effects
//! - validate rejects values that break a domain rule
//!
//! After construction a value object never changes.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainResult;

/// Value object with any number of fields
///
/// Build instances through [`ValueObject::finalize`] so the rules run.
pub trait ValueObject: Sized {
    fn normalize(self) -> Self {
        self
    }

    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    /// Normalize, then validate
    fn finalize(self) -> DomainResult<Self> {
        let normalized = self.normalize();
        normalized.validate()?;
        Ok(normalized)
    }
}

/// Rules for a [`SingleValueObject`]
pub trait SingleValueRule {
    type Value: Clone + PartialEq;

    fn normalize_value(value: Self::Value) -> Self::Value {
        value
    }

    fn validate_value(_value: &Self::Value) -> DomainResult<()> {
        Ok(())
    }
}

/// Value object wrapping exactly one value
///
/// ```ignore
/// struct NameRule;
/// impl SingleValueRule for NameRule { type Value = String; /* ... */ }
/// type Name = SingleValueObject<NameRule>;
/// ```
pub struct SingleValueObject<R: SingleValueRule> {
    value: R::Value,
    _rule: PhantomData<fn() -> R>,
}

impl<R: SingleValueRule> SingleValueObject<R> {
    pub fn new(value: R::Value) -> DomainResult<Self> {
        Self {
            value,
            _rule: PhantomData,
        }
        .finalize()
    }

    pub fn value(&self) -> &R::Value {
        &self.value
    }

    /// Raw value for serialization, storage or transport
    pub fn as_primitive(&self) -> R::Value {
        self.value.clone()
    }

    pub fn into_inner(self) -> R::Value {
        self.value
    }
}

impl<R: SingleValueRule> ValueObject for SingleValueObject<R> {
    fn normalize(self) -> Self {
        Self {
            value: R::normalize_value(self.value),
            _rule: PhantomData,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        R::validate_value(&self.value)
    }
}

impl<R: SingleValueRule> Clone for SingleValueObject<R> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _rule: PhantomData,
        }
    }
}

impl<R: SingleValueRule> PartialEq for SingleValueObject<R> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<R: SingleValueRule> Eq for SingleValueObject<R> where R::Value: Eq {}

impl<R: SingleValueRule> Hash for SingleValueObject<R>
where
    R::Value: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<R: SingleValueRule> fmt::Debug for SingleValueObject<R>
where
    R::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SingleValueObject").field(&self.value).finish()
    }
}

impl<R: SingleValueRule> fmt::Display for SingleValueObject<R>
where
    R::Value: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<R: SingleValueRule> Serialize for SingleValueObject<R>
where
    R::Value: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, R: SingleValueRule> Deserialize<'de> for SingleValueObject<R>
where
    R::Value: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = R::Value::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::model::timestamp::Timestamp;
    use chrono::{Duration, FixedOffset, TimeZone};

    struct NameRule;

    impl SingleValueRule for NameRule {
        type Value = String;

        fn normalize_value(value: String) -> String {
            value.trim().to_string()
        }

        fn validate_value(value: &String) -> DomainResult<()> {
            if value.is_empty() {
                return Err(DomainError::validation("Name empty."));
            }
            Ok(())
        }
    }

    type Name = SingleValueObject<NameRule>;

    struct ObservedAtRule;

    impl SingleValueRule for ObservedAtRule {
        type Value = Timestamp;
    }

    type ObservedAt = SingleValueObject<ObservedAtRule>;

    #[derive(Debug, Clone, PartialEq)]
    struct Period {
        start: Timestamp,
        end: Timestamp,
    }

    impl ValueObject for Period {
        fn validate(&self) -> DomainResult<()> {
            if self.end < self.start {
                return Err(DomainError::validation("End before start."));
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Slug {
        text: String,
    }

    impl ValueObject for Slug {
        fn normalize(self) -> Self {
            Slug {
                text: self.text.trim().to_lowercase(),
            }
        }
    }

    fn t0() -> Timestamp {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .unwrap()
            .into()
    }

    #[test]
    fn test_trims_whitespace() {
        let n = Name::new("  Alice  ".to_string()).unwrap();
        assert_eq!(n.value(), "Alice");
    }

    #[test]
    fn test_rejects_empty() {
        let err = Name::new("   ".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Name empty.");
    }

    #[test]
    fn test_rejects_naive_datetime_at_boundary() {
        let err = serde_json::from_str::<ObservedAt>("\"2025-01-01T00:00:00\"").unwrap_err();
        assert!(err.to_string().contains("timezone-aware"));
    }

    #[test]
    fn test_accepts_aware_datetime() {
        let v = ObservedAt::new(t0()).unwrap();
        assert_eq!(v.value(), &t0());
    }

    #[test]
    fn test_as_primitive_and_display() {
        let n = Name::new("Alice".to_string()).unwrap();
        assert_eq!(n.as_primitive(), "Alice");
        assert_eq!(n.to_string(), "Alice");
        assert_eq!(n.into_inner(), "Alice");
    }

    #[test]
    fn test_value_equality() {
        let a = Name::new(" Bob".to_string()).unwrap();
        let b = Name::new("Bob ".to_string()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_runs_rules() {
        let n: Name = serde_json::from_str("\"  Carol \"").unwrap();
        assert_eq!(n.value(), "Carol");
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"Carol\"");
        assert!(serde_json::from_str::<Name>("\"\"").is_err());
    }

    #[test]
    fn test_period_rejects_backward_range() {
        let err = Period {
            start: t0(),
            end: t0() - Duration::hours(1),
        }
        .finalize()
        .unwrap_err();
        assert_eq!(err, DomainError::validation("End before start."));
    }

    #[test]
    fn test_period_accepts_empty_range() {
        let p = Period { start: t0(), end: t0() }.finalize().unwrap();
        assert_eq!(p.start, p.end);
    }

    #[test]
    fn test_slug_normalize_lower_and_trim() {
        let s = Slug {
            text: "  HeLLo ".to_string(),
        }
        .finalize()
        .unwrap();
        assert_eq!(s.text, "hello");
    }
}
