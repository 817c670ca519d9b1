use serde_json::json;
use statcard::conversion::engine::convert;
use statcard::conversion::reference::{compare_with_reference, FieldMatchStatus};
use statcard::conversion::settings::default_settings;
use statcard::data::creature::OutputCreatureData;
use statcard::parser::parse_stat_block;

const OGRE: &str = "Ogre\nAC 11, HP 59\nSpeed 40 ft.\nCR 2\n\
                    Greatclub. Melee Weapon Attack: +6 to hit, reach 5 ft., one target. Hit: 13 (2d8 + 4) bludgeoning damage.";

fn converted_ogre() -> OutputCreatureData {
    convert(&parse_stat_block(OGRE, None).data, &default_settings())
}

#[test]
fn missing_reference_is_reported_not_scored() {
    let output = converted_ogre();
    for reference in [None, Some(""), Some("  \n ")] {
        let report = compare_with_reference(&output, reference);
        assert!(!report.has_reference);
        assert_eq!(report.accuracy_score, 0);
        assert!(report.diffs.is_empty());
        assert_eq!(
            report.summary,
            "No reference provided. Paste the target stat block to verify accuracy."
        );
    }
}

#[test]
fn matching_reference_scores_full_accuracy() {
    let output = converted_ogre();
    assert_eq!((output.ac, output.hp, output.morale), (12, 5, 7));

    let reference = "Ogre\nAC 12, HP 5\nSpeed 40 ft.\nLevel 1\nMorale 7\n\
                     Greatclub. Melee Weapon Attack: +1 to hit, reach 5 ft., one target. Hit: 3 (2d8 - 6) bludgeoning damage.";
    let report = compare_with_reference(&output, Some(reference));

    assert!(report.has_reference);
    assert_eq!(report.accuracy_score, 100);
    let fields: Vec<&str> = report.diffs.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["ac", "hp", "morale", "threat_tier", "name", "movement", "attacks (count)"]
    );
    assert!(report.diffs.iter().all(|d| d.status == FieldMatchStatus::Match));
    assert!(report.diffs.iter().all(|d| d.suggested.is_none()));
    assert_eq!(report.summary, "All checked fields match the reference. Accuracy: 100%.");
}

#[test]
fn source_block_as_reference_flags_the_rebalanced_hp() {
    let output = converted_ogre();
    let report = compare_with_reference(&output, Some("Ogre\nAC 11, HP 59\nSpeed 40 ft.\nCR 2"));

    let fields: Vec<&str> = report.diffs.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["ac", "hp", "threat_tier", "name", "movement"]);

    // 12 against 11 is within 15%.
    assert_eq!(report.diffs[0].status, FieldMatchStatus::Match);
    let hp = &report.diffs[1];
    assert_eq!(hp.status, FieldMatchStatus::Mismatch);
    assert_eq!(hp.suggested, Some(json!(59.0)));
    assert_eq!(report.accuracy_score, 80);
    assert_eq!(report.summary, "1 field(s) differ from reference: hp. Accuracy: 80%.");
}

#[test]
fn blank_converted_text_counts_as_missing() {
    let mut output = converted_ogre();
    output.movement = String::new();
    output.name = "OGRE".to_string();
    let report = compare_with_reference(&output, Some("Ogre\nSpeed 40 ft."));

    let name = report.diffs.iter().find(|d| d.field == "name").unwrap();
    assert_eq!(name.status, FieldMatchStatus::Match);

    let movement = report.diffs.iter().find(|d| d.field == "movement").unwrap();
    assert_eq!(movement.status, FieldMatchStatus::Missing);
    assert_eq!(movement.converted, serde_json::Value::Null);
    assert_eq!(movement.suggested, Some(json!("40 ft.")));
    assert_eq!(report.accuracy_score, 50);
}

#[test]
fn report_serializes_lowercase_statuses() {
    let report = compare_with_reference(&converted_ogre(), Some("Ogre\nAC 11, HP 59"));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["has_reference"], true);
    assert_eq!(json["diffs"][1]["status"], "mismatch");
    assert!(json["diffs"][0].get("suggested").is_none());
}
