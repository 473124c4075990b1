//! Built-in emergency signatures, in registration order.

use signa_types::Symbol::{A, B, C, D};
use signa_types::{PatternDefinition, Severity};

pub fn definitions() -> Vec<PatternDefinition> {
    vec![
        PatternDefinition::new(
            "domestic_violence",
            vec![A, B, C],
            Severity::Critical,
            "contact_local_authorities",
            "International signal against domestic violence",
        ),
        PatternDefinition::new(
            "medical_emergency",
            vec![D; 5],
            Severity::High,
            "contact_medical_services",
            "Silent medical emergency - unable to speak",
        ),
        PatternDefinition::new(
            "kidnapping",
            vec![A; 5],
            Severity::Critical,
            "activate_kidnapping_protocol",
            "Distress signal for kidnapping or forced detention",
        ),
        PatternDefinition::new(
            "urgent_help",
            vec![B; 5],
            Severity::High,
            "notify_emergency_contacts",
            "Urgent help needed - discreet signal",
        ),
        PatternDefinition::new(
            "imminent_danger",
            vec![A, C, A, C, A, C],
            Severity::Critical,
            "activate_maximum_alert",
            "Imminent danger - immediate help needed",
        ),
    ]
}
