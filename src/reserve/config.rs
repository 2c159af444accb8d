//! Reserve matching rules.

/// Policy knobs for [`ReserveMatcher`](super::ReserveMatcher).
///
/// # Examples
///
/// ```
/// use u_roster::reserve::ReserveRules;
///
/// let rules = ReserveRules::default()
///     .with_acceptable_score(2)
///     .with_overflow(false);
/// assert_eq!(rules.acceptable_score, 2);
/// assert!(!rules.overflow);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReserveRules {
    /// Lowest score a non-favorite weapon may have to be used when joining
    /// a multi-B team.
    pub acceptable_score: i64,

    /// Let category-B reserves switch away from a weapon held by a
    /// single-B team's category-B main. Category-A reserves always switch.
    pub switch_any_category: bool,

    /// Enable the last-resort tiers that may put a second reserve on a team
    /// or a reserve on an all-A team.
    ///
    /// On by default, so placement succeeds whenever a team exists. With it
    /// off, a reserve with no eligible team is an error.
    pub overflow: bool,
}

impl Default for ReserveRules {
    fn default() -> Self {
        Self {
            acceptable_score: 3,
            switch_any_category: false,
            overflow: true,
        }
    }
}

impl ReserveRules {
    pub fn with_acceptable_score(mut self, score: i64) -> Self {
        self.acceptable_score = score;
        self
    }

    pub fn with_switch_any_category(mut self, enabled: bool) -> Self {
        self.switch_any_category = enabled;
        self
    }

    pub fn with_overflow(mut self, enabled: bool) -> Self {
        self.overflow = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = ReserveRules::default();
        assert_eq!(rules.acceptable_score, 3);
        assert!(!rules.switch_any_category);
        assert!(rules.overflow);
    }

    #[test]
    fn test_builders() {
        let rules = ReserveRules::default()
            .with_acceptable_score(1)
            .with_switch_any_category(true)
            .with_overflow(false);
        assert_eq!(rules.acceptable_score, 1);
        assert!(rules.switch_any_category);
        assert!(!rules.overflow);
    }
}
