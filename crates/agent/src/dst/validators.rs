//! Field Validator Registry
//!
//! One pure rule per slot. Dispatch is an exhaustive match over `SlotName`,
//! so adding a slot without a rule does not compile.

use once_cell::sync::Lazy;
use regex::Regex;

use intake_config::constants::{bounds, choices};
use intake_config::{fold, MessagesConfig};
use intake_core::{Choice, ChoiceCard, SlotName};

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[0-9]{{{}}}$", bounds::PHONE_DIGITS)).expect("valid phone pattern")
});

/// Prompt issued when a slot is re-elicited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reprompt {
    pub message: String,
    /// Buttons offered alongside the message (choice slots only)
    pub choices: Option<ChoiceCard>,
}

impl Reprompt {
    fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            choices: None,
        }
    }
}

/// Result of running a rule against a slot value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected(Reprompt),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

/// Rule shapes used by the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Any non-blank value
    Presence,
    /// Exactly `PHONE_DIGITS` ASCII digits, nothing around them
    Phone,
    /// Integer within an inclusive range
    IntegerRange { min: i64, max: i64 },
    /// One of a fixed set of folded values, offered as buttons
    Choice {
        accepted: &'static [&'static str],
        labels: &'static [&'static str],
    },
}

impl FieldRule {
    /// Whether `value` passes this rule
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            FieldRule::Presence => !value.trim().is_empty(),
            FieldRule::Phone => PHONE_PATTERN.is_match(value),
            FieldRule::IntegerRange { min, max } => value
                .trim()
                .parse::<i64>()
                .map(|n| (*min..=*max).contains(&n))
                .unwrap_or(false),
            FieldRule::Choice { accepted, .. } => {
                let folded = fold(value);
                accepted.iter().any(|option| *option == folded)
            }
        }
    }
}

/// Per-slot rules plus the texts used when a rule rejects
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    messages: MessagesConfig,
}

impl ValidatorRegistry {
    pub fn new(messages: MessagesConfig) -> Self {
        Self { messages }
    }

    /// Rule bound to a slot
    pub fn rule(slot: SlotName) -> FieldRule {
        match slot {
            SlotName::ContactName | SlotName::ChildName | SlotName::Confirmation => {
                FieldRule::Presence
            }
            SlotName::PhoneNumber => FieldRule::Phone,
            SlotName::ChildAge => FieldRule::IntegerRange {
                min: bounds::MIN_CHILD_AGE,
                max: bounds::MAX_CHILD_AGE,
            },
            SlotName::DaysPerWeek => FieldRule::IntegerRange {
                min: bounds::MIN_DAYS_PER_WEEK,
                max: bounds::MAX_DAYS_PER_WEEK,
            },
            SlotName::HoursPerDay => FieldRule::IntegerRange {
                min: bounds::MIN_HOURS_PER_DAY,
                max: bounds::MAX_HOURS_PER_DAY,
            },
            SlotName::SchoolLevel => FieldRule::Choice {
                accepted: &choices::SCHOOL_LEVELS,
                labels: &choices::SCHOOL_LEVEL_LABELS,
            },
            SlotName::Shift => FieldRule::Choice {
                accepted: &choices::SHIFTS,
                labels: &choices::SHIFT_LABELS,
            },
        }
    }

    /// Validate a slot value.
    ///
    /// An unset value is always `Rejected` with the base prompt; choice slots
    /// attach their button card to it.
    pub fn validate(&self, slot: SlotName, value: Option<&str>) -> Outcome {
        let rule = Self::rule(slot);

        match value {
            Some(v) if rule.accepts(v) => Outcome::Accepted,
            Some(v) => {
                tracing::debug!(slot = %slot, value = v, "Slot value rejected");
                Outcome::Rejected(self.rejection(slot, &rule))
            }
            None => Outcome::Rejected(self.prompt(slot)),
        }
    }

    /// Base prompt for a slot that has no value yet
    pub fn prompt(&self, slot: SlotName) -> Reprompt {
        let prompts = &self.messages.prompts;
        let message = match slot {
            SlotName::ContactName => &prompts.contact_name,
            SlotName::PhoneNumber => &prompts.phone_number,
            SlotName::ChildName => &prompts.child_name,
            SlotName::ChildAge => &prompts.child_age,
            SlotName::SchoolLevel => &prompts.school_level,
            SlotName::DaysPerWeek => &prompts.days_per_week,
            SlotName::HoursPerDay => &prompts.hours_per_day,
            SlotName::Shift => &prompts.shift,
            SlotName::Confirmation => &self.messages.confirmation.card_title,
        };

        Reprompt {
            message: message.clone(),
            choices: self.options_card(&Self::rule(slot)),
        }
    }

    fn rejection(&self, slot: SlotName, rule: &FieldRule) -> Reprompt {
        let rejections = &self.messages.rejections;
        match slot {
            SlotName::PhoneNumber => Reprompt::text(&rejections.phone_number),
            SlotName::ChildAge => Reprompt::text(&rejections.child_age),
            SlotName::DaysPerWeek => Reprompt::text(&rejections.days_per_week),
            SlotName::HoursPerDay => Reprompt::text(&rejections.hours_per_day),
            // Choice slots re-ask with the base prompt and their buttons
            SlotName::SchoolLevel | SlotName::Shift => Reprompt {
                message: self.prompt(slot).message,
                choices: self.options_card(rule),
            },
            SlotName::ContactName | SlotName::ChildName | SlotName::Confirmation => {
                self.prompt(slot)
            }
        }
    }

    fn options_card(&self, rule: &FieldRule) -> Option<ChoiceCard> {
        match rule {
            FieldRule::Choice { labels, .. } => Some(ChoiceCard::new(
                self.messages.closing.options_title.clone(),
                labels.iter().map(|label| Choice::new(*label, *label)).collect(),
            )),
            _ => None,
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new(MessagesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::default()
    }

    fn accepts(slot: SlotName, value: &str) -> bool {
        registry().validate(slot, Some(value)).is_accepted()
    }

    #[test]
    fn test_phone_rule() {
        assert!(accepts(SlotName::PhoneNumber, "1234567890"));
        assert!(!accepts(SlotName::PhoneNumber, "123"));
        assert!(!accepts(SlotName::PhoneNumber, "12345678901"));
        assert!(!accepts(SlotName::PhoneNumber, "12a4567890"));
        assert!(!accepts(SlotName::PhoneNumber, "١٢٣٤٥٦٧٨٩٠"));
    }

    #[test]
    fn test_phone_rejects_surrounding_whitespace() {
        assert!(!accepts(SlotName::PhoneNumber, " 1234567890 "));
        assert!(!accepts(SlotName::PhoneNumber, "1234567890\n"));
        assert!(!accepts(SlotName::PhoneNumber, "300 123 4567"));
    }

    #[test]
    fn test_phone_rejection_message() {
        let outcome = registry().validate(SlotName::PhoneNumber, Some("123"));
        match outcome {
            Outcome::Rejected(reprompt) => {
                assert!(reprompt.message.contains("10 dígitos"));
                assert!(reprompt.choices.is_none());
            }
            Outcome::Accepted => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_age_rule() {
        assert!(accepts(SlotName::ChildAge, "2"));
        assert!(accepts(SlotName::ChildAge, "12"));
        assert!(accepts(SlotName::ChildAge, " 7 "));
        assert!(!accepts(SlotName::ChildAge, "1"));
        assert!(!accepts(SlotName::ChildAge, "13"));
        assert!(!accepts(SlotName::ChildAge, "abc"));
        assert!(!accepts(SlotName::ChildAge, "7.5"));
    }

    #[test]
    fn test_days_and_hours_bounds() {
        assert!(accepts(SlotName::DaysPerWeek, "1"));
        assert!(accepts(SlotName::DaysPerWeek, "5"));
        assert!(!accepts(SlotName::DaysPerWeek, "0"));
        assert!(!accepts(SlotName::DaysPerWeek, "6"));
        assert!(accepts(SlotName::HoursPerDay, "4"));
        assert!(!accepts(SlotName::HoursPerDay, "5"));
        assert!(!accepts(SlotName::HoursPerDay, "-1"));
    }

    #[test]
    fn test_school_level_any_case() {
        assert!(accepts(SlotName::SchoolLevel, "Preescolar"));
        assert!(accepts(SlotName::SchoolLevel, "primaria"));
        assert!(accepts(SlotName::SchoolLevel, "PRIMARIA"));
        assert!(!accepts(SlotName::SchoolLevel, "secundaria"));
    }

    #[test]
    fn test_school_level_rejection_has_two_buttons() {
        let outcome = registry().validate(SlotName::SchoolLevel, Some("universidad"));
        let Outcome::Rejected(reprompt) = outcome else {
            panic!("expected rejection");
        };
        let card = reprompt.choices.expect("buttons");
        let labels: Vec<_> = card.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Preescolar", "Primaria"]);
    }

    #[test]
    fn test_shift_accent_insensitive() {
        assert!(accepts(SlotName::Shift, "Mañana"));
        assert!(accepts(SlotName::Shift, "manana"));
        assert!(accepts(SlotName::Shift, "TARDE"));
        assert!(!accepts(SlotName::Shift, "noche"));
    }

    #[test]
    fn test_unset_choice_slot_carries_buttons() {
        for slot in [SlotName::SchoolLevel, SlotName::Shift] {
            let Outcome::Rejected(reprompt) = registry().validate(slot, None) else {
                panic!("unset slot must be rejected");
            };
            assert_eq!(reprompt.choices.map(|c| c.buttons.len()), Some(2));
        }
    }

    #[test]
    fn test_unset_text_slot_uses_base_prompt() {
        let Outcome::Rejected(reprompt) = registry().validate(SlotName::ContactName, None) else {
            panic!("unset slot must be rejected");
        };
        assert_eq!(reprompt.message, "¿Cuál es tu nombre?");
        assert!(reprompt.choices.is_none());
    }

    #[test]
    fn test_names_are_presence_only() {
        assert!(accepts(SlotName::ContactName, "X"));
        assert!(accepts(SlotName::ChildName, "María José 2"));
    }

    proptest! {
        #[test]
        fn prop_validation_is_idempotent(value in ".{0,16}") {
            let registry = registry();
            for slot in intake_core::DATA_SLOTS {
                let first = registry.validate(slot, Some(&value));
                let second = registry.validate(slot, Some(&value));
                prop_assert_eq!(first, second);
            }
        }

        #[test]
        fn prop_age_accepts_exactly_the_range(n in -100i64..100) {
            let expected = (bounds::MIN_CHILD_AGE..=bounds::MAX_CHILD_AGE).contains(&n);
            prop_assert_eq!(accepts(SlotName::ChildAge, &n.to_string()), expected);
        }

        #[test]
        fn prop_ten_digit_strings_are_valid_phones(digits in "[0-9]{10}") {
            prop_assert!(accepts(SlotName::PhoneNumber, &digits));
        }
    }
}
